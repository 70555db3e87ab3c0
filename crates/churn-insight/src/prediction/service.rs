use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::artifacts::{Classifier, Normalizer, SchemaMismatch};
use super::decision::{ChurnAssessment, DecisionEngine};
use super::display::AssessmentDisplay;
use super::domain::{CustomerProfile, ProfileSubmission, RangeWarning};
use super::encoder::{encode, FeatureVector};
use super::intake::{IntakeError, IntakeGuard};
use crate::config::DisplayConfig;

/// Everything produced for one prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub profile: CustomerProfile,
    pub feature_vector: FeatureVector,
    pub assessment: ChurnAssessment,
    pub display: AssessmentDisplay,
    pub input_warnings: Vec<RangeWarning>,
    pub assessed_at: DateTime<Utc>,
}

/// Service composing intake validation, encoding, and the decision engine.
pub struct ChurnPredictionService<N: ?Sized, C: ?Sized> {
    guard: IntakeGuard,
    engine: DecisionEngine<N, C>,
    display: DisplayConfig,
}

impl<N, C> ChurnPredictionService<N, C>
where
    N: Normalizer + ?Sized + 'static,
    C: Classifier + ?Sized + 'static,
{
    pub fn new(normalizer: Arc<N>, classifier: Arc<C>, display: DisplayConfig) -> Self {
        Self {
            guard: IntakeGuard,
            engine: DecisionEngine::new(normalizer, classifier),
            display,
        }
    }

    pub fn engine(&self) -> &DecisionEngine<N, C> {
        &self.engine
    }

    /// Validate, encode, and score one customer.
    pub fn predict(
        &self,
        submission: ProfileSubmission,
    ) -> Result<PredictionReport, PredictionError> {
        let intake = self.guard.profile_from_submission(submission).map_err(|err| {
            warn!(error = %err, "rejected churn prediction input");
            err
        })?;

        for warning in &intake.warnings {
            warn!(
                field = warning.field,
                value = warning.value,
                "input outside training range; passing through"
            );
        }

        let feature_vector = encode(&intake.profile);
        let assessment = self.engine.assess(&feature_vector).map_err(|err| {
            warn!(error = %err, "feature schema mismatch");
            err
        })?;

        debug!(
            churn_probability = assessment.churn_probability,
            risk_level = assessment.risk_level.label(),
            "churn assessment computed"
        );

        let display = AssessmentDisplay::new(&assessment, &self.display);
        Ok(PredictionReport {
            profile: intake.profile,
            feature_vector,
            assessment,
            display,
            input_warnings: intake.warnings,
            assessed_at: Utc::now(),
        })
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
}

impl PredictionError {
    /// HTTP status for a failed prediction: bad input is the caller's
    /// fault, schema drift is the server's.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictionError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictionError::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
