use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reviewdeck::config::AppConfig;
use reviewdeck::error::AppError;
use reviewdeck::reviews::{FileApprovalStore, HostawayClient, ReviewDashboardService};
use reviewdeck::telemetry;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if !config.hostaway.has_credentials() {
        info!("no booking API credentials configured; the fixture dataset will be served");
    }

    let source = Arc::new(HostawayClient::new(config.hostaway.clone()));
    let approvals = Arc::new(FileApprovalStore::new(config.approvals.path.clone()));
    let service = Arc::new(ReviewDashboardService::new(source, approvals));

    let app = with_review_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "guest review dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
