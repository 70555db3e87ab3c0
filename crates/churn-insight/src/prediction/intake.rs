use super::domain::{
    CustomerProfile, Gender, Geography, InputRange, InvalidCategoryError, ProfileSubmission,
    RangeWarning, AGE_RANGE, BALANCE_RANGE, CREDIT_SCORE_RANGE, NUM_PRODUCTS_RANGE,
    SALARY_RANGE, TENURE_RANGE,
};

/// Validation errors raised while turning a submission into a profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    InvalidCategory(#[from] InvalidCategoryError),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

/// A validated profile plus any out-of-range observations.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    pub profile: CustomerProfile,
    pub warnings: Vec<RangeWarning>,
}

/// Converts raw submissions into [`CustomerProfile`]s. Categories must be
/// members of the closed sets; numeric ranges are only flagged.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn profile_from_submission(
        &self,
        submission: ProfileSubmission,
    ) -> Result<IntakeOutcome, IntakeError> {
        let geography: Geography = submission.geography.parse()?;
        let gender: Gender = submission.gender.parse()?;

        if !submission.balance.is_finite() {
            return Err(IntakeError::NonFinite { field: "balance" });
        }
        if !submission.salary.is_finite() {
            return Err(IntakeError::NonFinite { field: "salary" });
        }

        let observed = [
            (CREDIT_SCORE_RANGE, f64::from(submission.credit_score)),
            (AGE_RANGE, f64::from(submission.age)),
            (TENURE_RANGE, f64::from(submission.tenure_years)),
            (BALANCE_RANGE, submission.balance),
            (NUM_PRODUCTS_RANGE, f64::from(submission.num_products)),
            (SALARY_RANGE, submission.salary),
        ];
        let warnings = observed
            .into_iter()
            .filter_map(|(range, value)| out_of_range(range, value))
            .collect();

        Ok(IntakeOutcome {
            profile: CustomerProfile {
                credit_score: submission.credit_score,
                age: submission.age,
                tenure_years: submission.tenure_years,
                balance: submission.balance,
                num_products: submission.num_products,
                has_card: submission.has_card,
                is_active: submission.is_active,
                salary: submission.salary,
                geography,
                gender,
            },
            warnings,
        })
    }
}

fn out_of_range(range: InputRange, value: f64) -> Option<RangeWarning> {
    if range.contains(value) {
        None
    } else {
        Some(RangeWarning {
            field: range.field,
            value,
            range,
        })
    }
}
