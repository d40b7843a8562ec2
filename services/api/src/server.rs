use crate::cli::{ProfileList, ServeArgs};
use crate::infra::{build_resolver, profile_source, AppState, DescriptorConnector};
use crate::routes::api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use immigration_tracker::config::AppConfig;
use immigration_tracker::deadlines::DeadlinePlanner;
use immigration_tracker::error::AppError;
use immigration_tracker::storage::StorageConnector;
use immigration_tracker::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let overridden = args.profiles.take().map(|ProfileList(profiles)| profiles);
    if let Some(profiles) = &overridden {
        config.profiles = profiles.clone();
    }

    telemetry::init(&config.telemetry)?;

    let resolver = build_resolver(profile_source(overridden));
    let (resolution, binding) = resolver.resolve_with_binding();
    info!(report = %resolution.report, "deployment profiles resolved");

    match binding {
        Some(binding) => {
            info!("{}", binding.database_info());
            DescriptorConnector.connect(binding)?;
        }
        None => warn!("no registered profile active; storage left to the default configuration"),
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        resolver,
        planner: DeadlinePlanner::default(),
    };

    let app = api_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(profiles = ?config.profiles, %addr, "immigration tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
