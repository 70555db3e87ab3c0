use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use super::artifacts::{Classifier, Normalizer};
use super::domain::{ProfileSubmission, INPUT_RANGES};
use super::encoder::FEATURE_COLUMNS;
use super::page::{render_page, PageOutcome};
use super::service::{ChurnPredictionService, PredictionError};

/// Router builder exposing the intake form and the JSON scoring API.
pub fn prediction_router<N, C>(service: Arc<ChurnPredictionService<N, C>>) -> Router
where
    N: Normalizer + ?Sized + 'static,
    C: Classifier + ?Sized + 'static,
{
    Router::new()
        .route("/", get(form_handler))
        .route("/predict", post(form_submit_handler::<N, C>))
        .route("/api/v1/churn/predict", post(predict_handler::<N, C>))
        .route("/api/v1/churn/schema", get(schema_handler))
        .with_state(service)
}

pub(crate) async fn form_handler() -> Html<String> {
    Html(render_page(
        &ProfileSubmission::form_defaults(),
        PageOutcome::Blank,
    ))
}

pub(crate) async fn form_submit_handler<N, C>(
    State(service): State<Arc<ChurnPredictionService<N, C>>>,
    Form(submission): Form<ProfileSubmission>,
) -> Response
where
    N: Normalizer + ?Sized + 'static,
    C: Classifier + ?Sized + 'static,
{
    match service.predict(submission.clone()) {
        Ok(report) => {
            Html(render_page(&submission, PageOutcome::Report(&report))).into_response()
        }
        Err(error) => {
            let message = error.to_string();
            let page = render_page(&submission, PageOutcome::Error(&message));
            (error.status_code(), Html(page)).into_response()
        }
    }
}

pub(crate) async fn predict_handler<N, C>(
    State(service): State<Arc<ChurnPredictionService<N, C>>>,
    Json(submission): Json<ProfileSubmission>,
) -> Response
where
    N: Normalizer + ?Sized + 'static,
    C: Classifier + ?Sized + 'static,
{
    match service.predict(submission) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => {
            let kind = match &error {
                PredictionError::Intake(_) => "invalid_input",
                PredictionError::Schema(_) => "schema_mismatch",
            };
            let payload = json!({
                "error": error.to_string(),
                "kind": kind,
            });
            (error.status_code(), Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler() -> Json<serde_json::Value> {
    Json(json!({
        "feature_columns": FEATURE_COLUMNS,
        "input_ranges": INPUT_RANGES,
    }))
}
