use std::sync::Arc;

use super::common::*;
use crate::config::DisplayConfig;
use crate::prediction::artifacts::LogisticRegression;
use crate::prediction::decision::RiskLevel;
use crate::prediction::domain::Geography;
use crate::prediction::intake::IntakeError;
use crate::prediction::{render_text, ChurnPredictionService, PredictionError};
use axum::http::StatusCode;

#[test]
fn predict_returns_low_risk_report_for_loyal_customer() {
    let service = fixed_service(0.12);

    let report = service.predict(submission()).expect("prediction succeeds");

    assert_eq!(report.assessment.risk_level, RiskLevel::Low);
    assert_eq!(report.display.probability, "12.00%");
    assert!(report.display.balance_at_risk.is_none());
    assert!(report.input_warnings.is_empty());
    assert_eq!(
        report.feature_vector.to_ordered(),
        [650.0, 40.0, 3.0, 50_000.0, 2.0, 1.0, 1.0, 50_000.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn predict_puts_balance_at_risk_for_likely_churner() {
    let service = fixed_service(0.7342);

    let report = service.predict(submission()).expect("prediction succeeds");

    assert_eq!(report.assessment.risk_level, RiskLevel::High);
    assert_eq!(report.assessment.balance_at_risk, Some(50_000.0));
    assert_eq!(report.display.balance_at_risk.as_deref(), Some("$50,000.00"));
    assert_eq!(report.display.probability, "73.42%");
}

#[test]
fn predict_uses_configured_currency_symbol() {
    let service = ChurnPredictionService::new(
        Arc::new(identity_scaler()),
        Arc::new(FixedClassifier { churn: 0.9 }),
        DisplayConfig {
            currency_symbol: "€".to_string(),
        },
    );
    let mut submission = submission();
    submission.balance = 1_250_000.0;

    let report = service.predict(submission).expect("prediction succeeds");

    assert_eq!(
        report.display.balance_at_risk.as_deref(),
        Some("€1,250,000.00")
    );
}

#[test]
fn predict_rejects_unknown_geography() {
    let service = fixed_service(0.9);
    let mut submission = submission();
    submission.geography = "Italy".to_string();

    let err = service.predict(submission).expect_err("italy rejected");

    match err {
        PredictionError::Intake(IntakeError::InvalidCategory(category)) => {
            assert_eq!(category.value, "Italy");
        }
        other => panic!("expected invalid category, got {other:?}"),
    }
}

#[test]
fn predict_flags_out_of_range_inputs_in_report() {
    let service = fixed_service(0.3);
    let mut submission = submission();
    submission.credit_score = 900;
    submission.num_products = 6;

    let report = service.predict(submission).expect("out of range is not fatal");

    assert_eq!(report.feature_vector.credit_score, 900.0);
    assert_eq!(report.feature_vector.num_products, 6.0);
    let fields: Vec<_> = report.input_warnings.iter().map(|w| w.field).collect();
    assert_eq!(fields, vec!["credit_score", "num_products"]);
}

#[test]
fn predict_surfaces_schema_mismatch() {
    let narrow = LogisticRegression::new(None, vec![0.5; 9], 0.0).expect("valid model");
    let service = ChurnPredictionService::new(
        Arc::new(identity_scaler()),
        Arc::new(narrow),
        DisplayConfig::default(),
    );

    let err = service.predict(submission()).expect_err("9 features");

    assert!(matches!(err, PredictionError::Schema(_)));
    assert!(err.to_string().contains("expects 9 features"));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn rejected_input_maps_to_unprocessable() {
    let mut submission = submission();
    submission.gender = "Unknown".to_string();

    let err = fixed_service(0.5)
        .predict(submission)
        .expect_err("unknown gender");

    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn text_verdict_lists_input_warnings() {
    let mut submission = submission();
    submission.age = 104;

    let report = fixed_service(0.3)
        .predict(submission)
        .expect("out of range is not fatal");
    let text = render_text(&report);

    assert!(text.contains("Input warnings:\n"));
    assert!(text.contains(
        "- age 104 is outside the training range 18-100; the model is extrapolating"
    ));
}

#[test]
fn report_echoes_validated_profile() {
    let service = fixed_service(0.2);
    let mut submission = submission();
    submission.geography = "Germany".to_string();

    let report = service.predict(submission).expect("prediction succeeds");

    assert_eq!(report.profile.geography, Geography::Germany);
    assert_eq!(report.feature_vector.geo_germany, 1.0);
}
