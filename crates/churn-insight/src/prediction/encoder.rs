use serde::Serialize;

use super::domain::{CustomerProfile, Gender, Geography};

pub const FEATURE_COUNT: usize = 11;

/// Column names, in the order the scaler and classifier were fitted on.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "CreditScore",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
    "Geography_Germany",
    "Geography_Spain",
    "Gender_Male",
];

/// Model input with every column named. Only [`FeatureVector::to_ordered`]
/// knows the positional layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub credit_score: f64,
    pub age: f64,
    pub tenure_years: f64,
    pub balance: f64,
    pub num_products: f64,
    pub has_card: f64,
    pub is_active: f64,
    pub salary: f64,
    pub geo_germany: f64,
    pub geo_spain: f64,
    pub gender_male: f64,
}

impl FeatureVector {
    /// Flatten into the positional form matching [`FEATURE_COLUMNS`].
    pub fn to_ordered(&self) -> [f64; FEATURE_COUNT] {
        let FeatureVector {
            credit_score,
            age,
            tenure_years,
            balance,
            num_products,
            has_card,
            is_active,
            salary,
            geo_germany,
            geo_spain,
            gender_male,
        } = *self;

        [
            credit_score,
            age,
            tenure_years,
            balance,
            num_products,
            has_card,
            is_active,
            salary,
            geo_germany,
            geo_spain,
            gender_male,
        ]
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_COLUMNS.into_iter().zip(self.to_ordered())
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode a validated profile. No scaling or clamping happens here; values
/// outside the documented ranges are passed through as-is.
pub fn encode(profile: &CustomerProfile) -> FeatureVector {
    FeatureVector {
        credit_score: f64::from(profile.credit_score),
        age: f64::from(profile.age),
        tenure_years: f64::from(profile.tenure_years),
        balance: profile.balance,
        num_products: f64::from(profile.num_products),
        has_card: flag(profile.has_card),
        is_active: flag(profile.is_active),
        salary: profile.salary,
        geo_germany: flag(profile.geography == Geography::Germany),
        geo_spain: flag(profile.geography == Geography::Spain),
        gender_male: flag(profile.gender == Gender::Male),
    }
}
