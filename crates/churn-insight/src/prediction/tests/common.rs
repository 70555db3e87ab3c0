use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::DisplayConfig;
use crate::prediction::artifacts::{
    ClassProbabilities, Classifier, LogisticRegression, SchemaMismatch, StandardScaler,
};
use crate::prediction::domain::{CustomerProfile, Gender, Geography, ProfileSubmission};
use crate::prediction::encoder::{FEATURE_COLUMNS, FEATURE_COUNT};
use crate::prediction::{prediction_router, ChurnPredictionService};

pub(super) fn column_names() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|column| column.to_string()).collect()
}

pub(super) fn submission() -> ProfileSubmission {
    ProfileSubmission::form_defaults()
}

pub(super) fn profile() -> CustomerProfile {
    CustomerProfile {
        credit_score: 650,
        age: 40,
        tenure_years: 3,
        balance: 50_000.0,
        num_products: 2,
        has_card: true,
        is_active: true,
        salary: 50_000.0,
        geography: Geography::France,
        gender: Gender::Male,
    }
}

pub(super) fn identity_scaler() -> StandardScaler {
    StandardScaler::new(
        Some(column_names()),
        vec![0.0; FEATURE_COUNT],
        vec![1.0; FEATURE_COUNT],
    )
    .expect("identity scaler is valid")
}

/// Logistic model that only looks at one encoded column.
pub(super) fn single_feature_model(column: usize, weight: f64, intercept: f64) -> LogisticRegression {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[column] = weight;
    LogisticRegression::new(Some(column_names()), coefficients, intercept)
        .expect("model is valid")
}

/// Classifier stub that always reports the same churn probability.
pub(super) struct FixedClassifier {
    pub(super) churn: f64,
}

impl Classifier for FixedClassifier {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, SchemaMismatch> {
        if features.len() != FEATURE_COUNT {
            return Err(SchemaMismatch::Length {
                artifact: crate::prediction::ArtifactKind::Classifier,
                expected: FEATURE_COUNT,
                found: features.len(),
            });
        }
        Ok(ClassProbabilities {
            retain: 1.0 - self.churn,
            churn: self.churn,
        })
    }
}

pub(super) fn fixed_service(churn: f64) -> ChurnPredictionService<StandardScaler, FixedClassifier> {
    ChurnPredictionService::new(
        Arc::new(identity_scaler()),
        Arc::new(FixedClassifier { churn }),
        DisplayConfig::default(),
    )
}

pub(super) fn router_with_churn(churn: f64) -> axum::Router {
    prediction_router(Arc::new(fixed_service(churn)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
