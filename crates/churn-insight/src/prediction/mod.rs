//! Churn scoring for a single customer: intake validation, feature encoding,
//! the scaler/classifier pipeline, and the verdict shown to relationship
//! managers.

pub mod artifacts;
pub mod decision;
pub mod display;
pub mod domain;
pub mod encoder;
pub(crate) mod intake;
pub mod page;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactKind, ArtifactLoadError, ClassProbabilities, Classifier, LogisticRegression,
    ModelArtifacts, Normalizer, SchemaMismatch, StandardScaler,
};
pub use decision::{assess, interpret, ChurnAssessment, DecisionEngine, RiskLevel};
pub use display::{format_currency, format_probability, render_text, AssessmentDisplay};
pub use domain::{
    CustomerProfile, Gender, Geography, InvalidCategoryError, ProfileSubmission, RangeWarning,
};
pub use encoder::{encode, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
pub use intake::{IntakeError, IntakeOutcome};
pub use router::prediction_router;
pub use service::{ChurnPredictionService, PredictionError, PredictionReport};
