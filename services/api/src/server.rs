use crate::cli::ServeArgs;
use crate::infra::{load_garage, AppState, LogAnalyticsSink};
use crate::routes::with_sale_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use car_ledger::config::AppConfig;
use car_ledger::error::AppError;
use car_ledger::telemetry;
use car_ledger::workflows::sale_profile::SalePageService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset.take() {
        config.data.dataset_path = Some(dataset);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let garage = Arc::new(load_garage(config.data.dataset_path.as_deref())?);
    let sale_service = Arc::new(SalePageService::new(
        garage.clone(),
        garage,
        Arc::new(LogAnalyticsSink),
    ));

    let app = with_sale_routes(sale_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "car ledger sale pages ready");

    axum::serve(listener, app).await?;
    Ok(())
}
