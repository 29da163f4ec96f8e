use crate::cli::ServeArgs;
use crate::infra::{AppState, SummaryContext};
use crate::routes::with_summary_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use payroll_summary::config::{AppConfig, CollectionConfig};
use payroll_summary::error::AppError;
use payroll_summary::telemetry;
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

    // START_TIME describes a single batch run, not a long-lived server.
    let context = SummaryContext {
        dictionary: Arc::new(config.dictionary.clone()),
        collection: CollectionConfig {
            started_at: None,
            ..config.collection
        },
    };

    let app = with_summary_routes(context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        dictionary = %config.dictionary,
        "payroll summary service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
