use crate::cli::ServeArgs;
use crate::infra::{build_catalog, seed_books, AppState, BooksHandle};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use funding_desk::config::AppConfig;
use funding_desk::error::AppError;
use funding_desk::store::MemoryStore;
use funding_desk::telemetry;
use funding_desk::wizard::router::IntakeState;
use funding_desk::wizard::IntakeService;

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

    let catalog = build_catalog(&config)?;
    let store = Arc::new(MemoryStore::new());
    seed_books(&store);
    let books: BooksHandle = store.clone();
    let service = IntakeService::new(store.clone(), store);
    let intake_state = Arc::new(IntakeState {
        service,
        programs: Arc::new(catalog),
    });

    let app = with_intake_routes(intake_state)
        .layer(Extension(app_state))
        .layer(Extension(books))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "funding application intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
