use super::common::*;
use crate::prediction::domain::{Geography, AGE_RANGE};
use crate::prediction::intake::{IntakeError, IntakeGuard};

#[test]
fn valid_submission_produces_profile_without_warnings() {
    let outcome = IntakeGuard
        .profile_from_submission(submission())
        .expect("defaults are valid");

    assert_eq!(outcome.profile, profile());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn unknown_geography_is_not_encoded_as_france() {
    let mut submission = submission();
    submission.geography = "Italy".to_string();

    let err = IntakeGuard
        .profile_from_submission(submission)
        .expect_err("italy rejected");

    match err {
        IntakeError::InvalidCategory(category) => {
            assert_eq!(category.field, "geography");
            assert_eq!(category.value, "Italy");
        }
        other => panic!("expected invalid category, got {other:?}"),
    }
}

#[test]
fn unknown_gender_is_rejected() {
    let mut submission = submission();
    submission.gender = "Unspecified".to_string();

    let err = IntakeGuard
        .profile_from_submission(submission)
        .expect_err("gender rejected");

    assert!(matches!(err, IntakeError::InvalidCategory(ref c) if c.field == "gender"));
}

#[test]
fn category_labels_are_case_insensitive() {
    let mut submission = submission();
    submission.geography = "spain".to_string();

    let outcome = IntakeGuard
        .profile_from_submission(submission)
        .expect("spain accepted");

    assert_eq!(outcome.profile.geography, Geography::Spain);
}

#[test]
fn out_of_range_numbers_pass_through_with_warnings() {
    let mut submission = submission();
    submission.age = 120;
    submission.balance = -10.0;

    let outcome = IntakeGuard
        .profile_from_submission(submission)
        .expect("range issues are not fatal");

    assert_eq!(outcome.profile.age, 120);
    assert_eq!(outcome.profile.balance, -10.0);
    let fields: Vec<_> = outcome.warnings.iter().map(|w| w.field).collect();
    assert_eq!(fields, vec!["age", "balance"]);
    assert_eq!(outcome.warnings[0].range, AGE_RANGE);
    assert!(outcome.warnings[0].message().contains("18-100"));
}

#[test]
fn non_finite_amounts_are_rejected() {
    let mut submission = submission();
    submission.salary = f64::NAN;

    let err = IntakeGuard
        .profile_from_submission(submission)
        .expect_err("nan rejected");

    assert_eq!(err, IntakeError::NonFinite { field: "salary" });
}
