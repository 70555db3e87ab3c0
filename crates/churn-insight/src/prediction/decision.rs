use std::sync::Arc;

use serde::Serialize;

use super::artifacts::{verify_columns, ArtifactKind, Classifier, Normalizer, SchemaMismatch};
use super::encoder::{FeatureVector, FEATURE_COLUMNS};

/// Probabilities strictly above this are high risk; exactly 0.5 is low.
pub const HIGH_RISK_THRESHOLD: f64 = 0.5;

pub const RETENTION_OFFER: &str =
    "Consider offering a loyalty bonus or tenure-based interest rate upgrade.";
pub const NO_ACTION_NEEDED: &str = "This customer is likely to stay. No immediate action needed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    pub fn from_probability(churn_probability: f64) -> Self {
        if churn_probability > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Low => "LOW",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::High => RETENTION_OFFER,
            RiskLevel::Low => NO_ACTION_NEEDED,
        }
    }
}

/// Verdict for a single customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnAssessment {
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_at_risk: Option<f64>,
    pub recommendation: &'static str,
}

/// Map a churn probability to a verdict. `balance` is only carried over
/// when the customer is likely to leave.
pub fn interpret(churn_probability: f64, balance: f64) -> ChurnAssessment {
    let risk_level = RiskLevel::from_probability(churn_probability);
    let balance_at_risk = match risk_level {
        RiskLevel::High => Some(balance),
        RiskLevel::Low => None,
    };

    ChurnAssessment {
        churn_probability,
        risk_level,
        balance_at_risk,
        recommendation: risk_level.recommendation(),
    }
}

fn verify_artifacts<N, C>(normalizer: &N, classifier: &C) -> Result<(), SchemaMismatch>
where
    N: Normalizer + ?Sized,
    C: Classifier + ?Sized,
{
    verify_columns(
        ArtifactKind::Scaler,
        normalizer.n_features(),
        normalizer.feature_names(),
        &FEATURE_COLUMNS,
    )?;
    verify_columns(
        ArtifactKind::Classifier,
        classifier.n_features(),
        classifier.feature_names(),
        &FEATURE_COLUMNS,
    )
}

/// Normalize, classify, and interpret one encoded customer.
pub fn assess<N, C>(
    vector: &FeatureVector,
    normalizer: &N,
    classifier: &C,
) -> Result<ChurnAssessment, SchemaMismatch>
where
    N: Normalizer + ?Sized,
    C: Classifier + ?Sized,
{
    verify_artifacts(normalizer, classifier)?;

    let scaled = normalizer.transform(&vector.to_ordered())?;
    let probabilities = classifier.predict_proba(&scaled)?;

    Ok(interpret(probabilities.churn, vector.balance))
}

/// Holds the injected artifact handles for the lifetime of the process.
pub struct DecisionEngine<N: ?Sized, C: ?Sized> {
    normalizer: Arc<N>,
    classifier: Arc<C>,
}

impl<N: ?Sized, C: ?Sized> Clone for DecisionEngine<N, C> {
    fn clone(&self) -> Self {
        Self {
            normalizer: self.normalizer.clone(),
            classifier: self.classifier.clone(),
        }
    }
}

impl<N, C> DecisionEngine<N, C>
where
    N: Normalizer + ?Sized,
    C: Classifier + ?Sized,
{
    pub fn new(normalizer: Arc<N>, classifier: Arc<C>) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    pub fn assess(&self, vector: &FeatureVector) -> Result<ChurnAssessment, SchemaMismatch> {
        assess(vector, self.normalizer.as_ref(), self.classifier.as_ref())
    }

    /// Check both artifacts against the encoder's column layout without
    /// scoring anything.
    pub fn verify_schema(&self) -> Result<(), SchemaMismatch> {
        verify_artifacts(self.normalizer.as_ref(), self.classifier.as_ref())
    }
}
