use std::fmt::Write as _;

use serde::Serialize;

use super::decision::{ChurnAssessment, RiskLevel};
use super::PredictionReport;
use crate::config::DisplayConfig;

/// `0.7342` renders as `73.42%`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Thousands-separated amount with two decimals, e.g. `$125,000.50`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let rounds_to_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction}")
}

impl RiskLevel {
    pub const fn headline(self) -> &'static str {
        match self {
            RiskLevel::High => "High churn risk",
            RiskLevel::Low => "Low churn risk",
        }
    }
}

/// Display strings for an assessment, shared by the HTML page, the JSON
/// API and the terminal output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentDisplay {
    pub probability: String,
    pub headline: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_at_risk: Option<String>,
    pub recommendation: &'static str,
}

impl AssessmentDisplay {
    pub fn new(assessment: &ChurnAssessment, config: &DisplayConfig) -> Self {
        Self {
            probability: format_probability(assessment.churn_probability),
            headline: assessment.risk_level.headline(),
            balance_at_risk: assessment
                .balance_at_risk
                .map(|balance| format_currency(balance, &config.currency_symbol)),
            recommendation: assessment.recommendation,
        }
    }
}

/// Plain-text verdict for terminals.
pub fn render_text(report: &PredictionReport) -> String {
    let display = &report.display;
    let mut out = String::new();

    let _ = writeln!(out, "Churn probability: {}", display.probability);
    let _ = writeln!(
        out,
        "Risk level: {} ({})",
        report.assessment.risk_level.label(),
        display.headline
    );
    if let Some(balance) = &display.balance_at_risk {
        let _ = writeln!(out, "Balance at risk: {balance}");
    }
    let _ = writeln!(out, "Recommendation: {}", display.recommendation);

    if !report.input_warnings.is_empty() {
        let _ = writeln!(out, "Input warnings:");
        for warning in &report.input_warnings {
            let _ = writeln!(out, "- {}", warning.message());
        }
    }

    out
}
