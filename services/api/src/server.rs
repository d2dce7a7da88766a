use crate::cli::ServeArgs;
use crate::infra::{default_course_rules, AppState, InMemoryEventStore, InMemoryRoster};
use crate::routes::with_grade_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use classroom_grades::config::AppConfig;
use classroom_grades::error::AppError;
use classroom_grades::grading::{read_events, GradeService, GradeServiceError};
use classroom_grades::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let event_store = match args.events.take() {
        Some(path) => {
            let file = std::fs::File::open(&path)?;
            let events = read_events(file).map_err(AppError::from)?;
            info!(events = events.len(), export = %path.display(), "loaded event export");
            Arc::new(InMemoryEventStore::with_events(events))
        }
        None => {
            warn!("no event export supplied, reports will be empty");
            Arc::new(InMemoryEventStore::default())
        }
    };
    let roster = Arc::new(InMemoryRoster::default());

    let service = GradeService::new(event_store, roster, default_course_rules())
        .map_err(|err| AppError::from(GradeServiceError::from(err)))?;

    let app = with_grade_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grade report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
