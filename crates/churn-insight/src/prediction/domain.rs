use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Country of the customer's home branch. France is the reference category
/// of the trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Geography {
    France,
    Germany,
    Spain,
}

impl Geography {
    pub const ALL: [Geography; 3] = [Geography::France, Geography::Germany, Geography::Spain];

    pub const fn label(self) -> &'static str {
        match self {
            Geography::France => "France",
            Geography::Germany => "Germany",
            Geography::Spain => "Spain",
        }
    }
}

impl FromStr for Geography {
    type Err = InvalidCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InvalidCategoryError {
                field: "geography",
                value: raw.to_string(),
                expected: "France, Germany, Spain",
            })
    }
}

impl fmt::Display for Geography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidCategoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InvalidCategoryError {
                field: "gender",
                value: raw.to_string(),
                expected: "Male, Female",
            })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A categorical value outside the closed set the model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} '{value}' is not a recognized category (expected one of {expected})")]
pub struct InvalidCategoryError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Raw customer attributes as submitted by the form or JSON API, before the
/// categorical fields have been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    pub credit_score: i32,
    pub age: i32,
    pub tenure_years: i32,
    pub balance: f64,
    pub num_products: i32,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub has_card: bool,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_active: bool,
    pub salary: f64,
    pub geography: String,
    pub gender: String,
}

impl ProfileSubmission {
    /// Values the intake form is prefilled with.
    pub fn form_defaults() -> Self {
        Self {
            credit_score: 650,
            age: 40,
            tenure_years: 3,
            balance: 50_000.0,
            num_products: 2,
            has_card: true,
            is_active: true,
            salary: 50_000.0,
            geography: Geography::France.label().to_string(),
            gender: Gender::Male.label().to_string(),
        }
    }
}

/// Validated customer attributes. Categorical fields are closed enums so an
/// unknown country can never be encoded as the reference category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerProfile {
    pub credit_score: i32,
    pub age: i32,
    pub tenure_years: i32,
    pub balance: f64,
    pub num_products: i32,
    pub has_card: bool,
    pub is_active: bool,
    pub salary: f64,
    pub geography: Geography,
    pub gender: Gender,
}

/// Documented training range for a numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputRange {
    pub field: &'static str,
    pub min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl InputRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

pub const CREDIT_SCORE_RANGE: InputRange = InputRange {
    field: "credit_score",
    min: 300.0,
    max: Some(850.0),
};
pub const AGE_RANGE: InputRange = InputRange {
    field: "age",
    min: 18.0,
    max: Some(100.0),
};
pub const TENURE_RANGE: InputRange = InputRange {
    field: "tenure_years",
    min: 0.0,
    max: Some(10.0),
};
pub const BALANCE_RANGE: InputRange = InputRange {
    field: "balance",
    min: 0.0,
    max: None,
};
pub const NUM_PRODUCTS_RANGE: InputRange = InputRange {
    field: "num_products",
    min: 1.0,
    max: Some(4.0),
};
pub const SALARY_RANGE: InputRange = InputRange {
    field: "salary",
    min: 0.0,
    max: None,
};

pub const INPUT_RANGES: [InputRange; 6] = [
    CREDIT_SCORE_RANGE,
    AGE_RANGE,
    TENURE_RANGE,
    BALANCE_RANGE,
    NUM_PRODUCTS_RANGE,
    SALARY_RANGE,
];

/// Numeric input outside its training range. The value is still sent to
/// the model unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeWarning {
    pub field: &'static str,
    pub value: f64,
    pub range: InputRange,
}

impl RangeWarning {
    pub fn message(&self) -> String {
        let bounds = match self.range.max {
            Some(max) => format!("{}-{}", self.range.min, max),
            None => format!(">= {}", self.range.min),
        };
        format!(
            "{} {} is outside the training range {}; the model is extrapolating",
            self.field, self.value, bounds
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CheckboxValue {
    Flag(bool),
    Text(String),
}

/// Accepts JSON booleans as well as HTML checkbox payloads, where a checked
/// box posts `on` and an unchecked box posts nothing.
fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match CheckboxValue::deserialize(deserializer)? {
        CheckboxValue::Flag(flag) => Ok(flag),
        CheckboxValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Ok(true),
            "off" | "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "'{other}' is not a checkbox value"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_from_labels() {
        assert_eq!("Germany".parse::<Geography>(), Ok(Geography::Germany));
        assert_eq!(" spain ".parse::<Geography>(), Ok(Geography::Spain));
        assert_eq!("FEMALE".parse::<Gender>(), Ok(Gender::Female));
    }

    #[test]
    fn unknown_geography_is_rejected_not_defaulted() {
        let err = "Italy".parse::<Geography>().expect_err("italy rejected");
        assert_eq!(err.field, "geography");
        assert_eq!(err.value, "Italy");
        assert!(err.to_string().contains("France, Germany, Spain"));
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let err = "".parse::<Gender>().expect_err("blank rejected");
        assert_eq!(err.field, "gender");
    }

    #[test]
    fn open_ended_ranges_only_bound_below() {
        assert!(BALANCE_RANGE.contains(1.0e9));
        assert!(!BALANCE_RANGE.contains(-0.01));
        assert!(AGE_RANGE.contains(18.0));
        assert!(AGE_RANGE.contains(100.0));
        assert!(!AGE_RANGE.contains(101.0));
    }

    #[test]
    fn json_submission_accepts_booleans() {
        let submission: ProfileSubmission = serde_json::from_value(serde_json::json!({
            "credit_score": 700,
            "age": 33,
            "tenure_years": 4,
            "balance": 1200.5,
            "num_products": 1,
            "has_card": false,
            "is_active": true,
            "salary": 64000.0,
            "geography": "Spain",
            "gender": "Female"
        }))
        .expect("submission parses");

        assert!(!submission.has_card);
        assert!(submission.is_active);
    }

    #[test]
    fn missing_checkbox_means_unchecked() {
        let submission: ProfileSubmission = serde_json::from_value(serde_json::json!({
            "credit_score": 700,
            "age": 33,
            "tenure_years": 4,
            "balance": 0.0,
            "num_products": 1,
            "is_active": "on",
            "salary": 0.0,
            "geography": "France",
            "gender": "Male"
        }))
        .expect("submission parses");

        assert!(!submission.has_card);
        assert!(submission.is_active);
    }
}
