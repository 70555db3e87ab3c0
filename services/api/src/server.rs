use crate::cli::ServeArgs;
use crate::infra::{apply_artifact_overrides, build_service, schema_ready, AppState};
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use churn_insight::config::AppConfig;
use churn_insight::error::AppError;
use churn_insight::telemetry;
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
    apply_artifact_overrides(&mut config, args.artifacts);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = build_service(&config)?;
    let ready = schema_ready(&service);

    let app = with_prediction_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(ready, Ordering::Release);

    info!(
        ?config.environment,
        ready,
        %addr,
        model = %config.artifacts.model_path.display(),
        scaler = %config.artifacts.scaler_path.display(),
        "churn insight service listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
