use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::grading::router::grade_router;
use crate::grading::service::GradeService;

fn seeded_router() -> axum::Router {
    let events = vec![
        event("alice", "hw-activations-alice", "2025-02-10T21:00:00Z", "Points 9/10"),
        event("bob", "hw-weight-init-bob", "2025-02-12T10:00:00Z", "Points 7/10"),
    ];
    let service = Arc::new(build_service(events, course_rules()));
    grade_router(service)
}

#[tokio::test]
async fn summary_route_returns_one_row_per_student() {
    let response = seeded_router()
        .oneshot(
            Request::get("/api/v1/grades/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].get("student").and_then(Value::as_str),
        Some("alice")
    );
    assert!(rows[0].get("grade").is_some());
}

#[tokio::test]
async fn detailed_route_exposes_best_attempt_fields() {
    let response = seeded_router()
        .oneshot(
            Request::get("/api/v1/grades/detailed")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);

    // bob was a day and change late: tier 2.
    let bob = rows
        .iter()
        .find(|row| row.get("student").and_then(Value::as_str) == Some("bob"))
        .expect("bob present");
    assert_eq!(bob.get("penalty_days").and_then(Value::as_u64), Some(2));
    assert_eq!(
        bob.get("adjusted_points").and_then(Value::as_f64),
        Some(5.6)
    );
}

#[tokio::test]
async fn roster_route_saves_names_used_by_later_summaries() {
    let events = vec![event(
        "alice",
        "hw-activations-alice",
        "2025-02-10T21:00:00Z",
        "Points 9/10",
    )];
    let service = Arc::new(build_service(events, course_rules()));
    let router = grade_router(service);

    let update = serde_json::json!({
        "student": "alice",
        "display_name": "Alice Jensen",
    });
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/roster")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(update.to_string()))
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::get("/api/v1/grades/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    let payload = read_json_body(response).await;
    assert_eq!(
        payload[0].get("display_name").and_then(Value::as_str),
        Some("Alice Jensen")
    );
}

#[tokio::test]
async fn report_routes_surface_event_store_outages() {
    let service = Arc::new(
        GradeService::new(
            Arc::new(UnavailableEventStore),
            Arc::new(MemoryRoster::default()),
            course_rules(),
        )
        .expect("rules are unambiguous"),
    );
    let router = grade_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/grades/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("unavailable"));
}
