use std::fmt::Write as _;

use super::decision::RiskLevel;
use super::domain::{
    Gender, Geography, InputRange, ProfileSubmission, AGE_RANGE, CREDIT_SCORE_RANGE,
    NUM_PRODUCTS_RANGE, TENURE_RANGE,
};
use super::service::PredictionReport;

/// What to show underneath the form.
#[derive(Debug, Clone, Copy)]
pub enum PageOutcome<'a> {
    Blank,
    Report(&'a PredictionReport),
    Error(&'a str),
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn banner_colors(level: RiskLevel) -> (&'static str, &'static str) {
    match level {
        RiskLevel::High => ("#fdecea", "#d93025"),
        RiskLevel::Low => ("#e6f4ea", "#188038"),
    }
}

fn bound(range: &InputRange) -> String {
    range.max.map(|max| max.to_string()).unwrap_or_default()
}

fn number_field(out: &mut String, label: &str, name: &str, value: f64, min: f64, step: &str) {
    let _ = writeln!(
        out,
        r#"<label>{label}<input type="number" name="{name}" min="{min}" step="{step}" value="{value}" required></label>"#
    );
}

fn bounded_number_field(out: &mut String, label: &str, range: &InputRange, value: i32) {
    let _ = writeln!(
        out,
        r#"<label>{label}<input type="number" name="{name}" min="{min}" max="{max}" step="1" value="{value}" required></label>"#,
        name = range.field,
        min = range.min,
        max = bound(range),
    );
}

fn slider_field(out: &mut String, label: &str, range: &InputRange, value: i32) {
    let _ = writeln!(
        out,
        r#"<label>{label} <output>{value}</output><input type="range" name="{name}" min="{min}" max="{max}" step="1" value="{value}" oninput="this.previousElementSibling.value=this.value"></label>"#,
        name = range.field,
        min = range.min,
        max = bound(range),
    );
}

fn checkbox_field(out: &mut String, label: &str, name: &str, checked: bool) {
    let checked = if checked { " checked" } else { "" };
    let _ = writeln!(
        out,
        r#"<label class="check"><input type="checkbox" name="{name}" value="on"{checked}> {label}</label>"#
    );
}

fn select_field(out: &mut String, label: &str, name: &str, options: &[&str], selected: &str) {
    let _ = writeln!(out, r#"<label>{label}<select name="{name}">"#);
    for option in options {
        let marker = if option.eq_ignore_ascii_case(selected.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(out, r#"<option value="{option}"{marker}>{option}</option>"#);
    }
    let _ = writeln!(out, "</select></label>");
}

fn render_form(out: &mut String, form: &ProfileSubmission) {
    out.push_str("<form method=\"post\" action=\"/predict\">\n");
    bounded_number_field(out, "Credit Score", &CREDIT_SCORE_RANGE, form.credit_score);
    slider_field(out, "Age", &AGE_RANGE, form.age);
    slider_field(out, "Tenure (Years)", &TENURE_RANGE, form.tenure_years);
    number_field(out, "Account Balance", "balance", form.balance, 0.0, "0.01");
    slider_field(out, "Number of Products", &NUM_PRODUCTS_RANGE, form.num_products);
    checkbox_field(out, "Has Credit Card?", "has_card", form.has_card);
    checkbox_field(out, "Is Active Member?", "is_active", form.is_active);
    number_field(out, "Estimated Salary", "salary", form.salary, 0.0, "0.01");

    let geographies = Geography::ALL.map(Geography::label);
    select_field(out, "Geography", "geography", &geographies, &form.geography);
    let genders = Gender::ALL.map(Gender::label);
    select_field(out, "Gender", "gender", &genders, &form.gender);

    out.push_str("<button type=\"submit\">Predict Churn Risk</button>\n</form>\n");
}

fn render_report(out: &mut String, report: &PredictionReport) {
    let display = &report.display;
    let (background, border) = banner_colors(report.assessment.risk_level);

    let _ = writeln!(out, "<section class=\"result\">");
    let _ = writeln!(
        out,
        "<p class=\"probability\">Churn probability: <strong>{}</strong></p>",
        display.probability
    );
    let _ = writeln!(
        out,
        r#"<div class="banner" style="background:{background};border-left:6px solid {border}"><strong>{}</strong> ({})</div>"#,
        display.headline,
        report.assessment.risk_level.label()
    );
    if let Some(balance) = &display.balance_at_risk {
        let _ = writeln!(
            out,
            "<p class=\"balance\">Balance at risk: <strong>{}</strong></p>",
            escape_html(balance)
        );
    }
    let _ = writeln!(
        out,
        "<p class=\"recommendation\">{}</p>",
        display.recommendation
    );

    if !report.input_warnings.is_empty() {
        let _ = writeln!(out, "<ul class=\"warnings\">");
        for warning in &report.input_warnings {
            let _ = writeln!(out, "<li>{}</li>", escape_html(&warning.message()));
        }
        let _ = writeln!(out, "</ul>");
    }
    let _ = writeln!(out, "</section>");
}

/// Full single-screen page: the intake form and, after a submit, the verdict.
pub fn render_page(form: &ProfileSubmission, outcome: PageOutcome<'_>) -> String {
    let mut out = String::from(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Customer Churn Prediction Dashboard</title>\n<style>\n\
         body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\n\
         label{display:block;margin:.6rem 0}\ninput[type=number],select{display:block;width:100%}\n\
         input[type=range]{display:block;width:100%}\nlabel.check{display:flex;gap:.4rem}\n\
         .banner{padding:.8rem;margin:.8rem 0}\n.error{color:#d93025}\n</style>\n</head>\n<body>\n\
         <h1>Customer Churn Prediction Dashboard</h1>\n\
         <p>Enter customer details to predict churn risk:</p>\n",
    );

    render_form(&mut out, form);

    match outcome {
        PageOutcome::Blank => {}
        PageOutcome::Report(report) => render_report(&mut out, report),
        PageOutcome::Error(message) => {
            let _ = writeln!(
                out,
                "<div class=\"banner error\" role=\"alert\">Prediction failed: {}</div>",
                escape_html(message)
            );
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}
