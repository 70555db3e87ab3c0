use crate::cli::ArtifactArgs;
use churn_insight::config::AppConfig;
use churn_insight::error::AppError;
use churn_insight::prediction::{
    ChurnPredictionService, LogisticRegression, ModelArtifacts, StandardScaler,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

pub(crate) type ChurnService = ChurnPredictionService<StandardScaler, LogisticRegression>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn apply_artifact_overrides(config: &mut AppConfig, overrides: ArtifactArgs) {
    if let Some(model) = overrides.model {
        config.artifacts.model_path = model;
    }
    if let Some(scaler) = overrides.scaler {
        config.artifacts.scaler_path = scaler;
    }
}

/// Load both artifacts once and wrap them in the shared prediction service.
pub(crate) fn build_service(config: &AppConfig) -> Result<Arc<ChurnService>, AppError> {
    let artifacts = ModelArtifacts::load(&config.artifacts)?;
    Ok(Arc::new(ChurnPredictionService::new(
        artifacts.scaler,
        artifacts.classifier,
        config.display.clone(),
    )))
}

/// Whether the loaded artifacts line up with the encoder. A service that
/// fails this check must not report ready.
pub(crate) fn schema_ready(service: &ChurnService) -> bool {
    match service.engine().verify_schema() {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "artifacts do not match the encoder layout; predictions will fail");
            false
        }
    }
}
