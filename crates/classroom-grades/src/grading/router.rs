use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{EventStore, RosterDirectory};
use super::service::{GradeService, GradeServiceError};

/// Router builder exposing the two report endpoints and the administrative
/// roster write endpoint.
pub fn grade_router<E, R>(service: Arc<GradeService<E, R>>) -> Router
where
    E: EventStore + 'static,
    R: RosterDirectory + 'static,
{
    Router::new()
        .route("/api/v1/grades/summary", get(summary_handler::<E, R>))
        .route("/api/v1/grades/detailed", get(detailed_handler::<E, R>))
        .route("/api/v1/roster", post(upsert_display_name_handler::<E, R>))
        .with_state(service)
}

pub(crate) async fn summary_handler<E, R>(
    State(service): State<Arc<GradeService<E, R>>>,
) -> Response
where
    E: EventStore + 'static,
    R: RosterDirectory + 'static,
{
    match service.summary() {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn detailed_handler<E, R>(
    State(service): State<Arc<GradeService<E, R>>>,
) -> Response
where
    E: EventStore + 'static,
    R: RosterDirectory + 'static,
{
    match service.detailed() {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(err) => service_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DisplayNameUpdate {
    pub(crate) student: String,
    pub(crate) display_name: String,
}

pub(crate) async fn upsert_display_name_handler<E, R>(
    State(service): State<Arc<GradeService<E, R>>>,
    axum::Json(update): axum::Json<DisplayNameUpdate>,
) -> Response
where
    E: EventStore + 'static,
    R: RosterDirectory + 'static,
{
    match service.record_display_name(&update.student, &update.display_name) {
        Ok(()) => {
            let payload = json!({ "student": update.student, "status": "saved" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: GradeServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
