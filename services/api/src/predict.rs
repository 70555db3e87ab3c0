use crate::cli::ArtifactArgs;
use crate::infra::{apply_artifact_overrides, build_service};
use churn_insight::config::AppConfig;
use churn_insight::error::AppError;
use churn_insight::prediction::{render_text, ProfileSubmission};
use churn_insight::telemetry;
use clap::{ArgAction, Args};

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Credit score (training range 300-850)
    #[arg(long, default_value_t = 650, allow_negative_numbers = true)]
    pub(crate) credit_score: i32,
    /// Age in years (training range 18-100)
    #[arg(long, default_value_t = 40, allow_negative_numbers = true)]
    pub(crate) age: i32,
    /// Tenure with the bank in years (training range 0-10)
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    pub(crate) tenure: i32,
    /// Account balance
    #[arg(long, default_value_t = 50_000.0, allow_negative_numbers = true)]
    pub(crate) balance: f64,
    /// Number of bank products held (training range 1-4)
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    pub(crate) num_products: i32,
    /// Whether the customer holds a credit card
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) has_card: bool,
    /// Whether the customer is an active member
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) is_active: bool,
    /// Estimated yearly salary
    #[arg(long, default_value_t = 50_000.0, allow_negative_numbers = true)]
    pub(crate) salary: f64,
    /// France, Germany, or Spain
    #[arg(long, default_value = "France")]
    pub(crate) geography: String,
    /// Male or Female
    #[arg(long, default_value = "Male")]
    pub(crate) gender: String,
    /// Print the full prediction report as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

impl PredictArgs {
    pub(crate) fn submission(&self) -> ProfileSubmission {
        ProfileSubmission {
            credit_score: self.credit_score,
            age: self.age,
            tenure_years: self.tenure,
            balance: self.balance,
            num_products: self.num_products,
            has_card: self.has_card,
            is_active: self.is_active,
            salary: self.salary,
            geography: self.geography.clone(),
            gender: self.gender.clone(),
        }
    }
}

/// Configuration for a one-off prediction, with logging installed.
fn predict_config(artifacts: ArtifactArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    apply_artifact_overrides(&mut config, artifacts);
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = predict_config(args.artifacts.clone())?;

    let service = build_service(&config)?;
    let report = service.predict(args.submission())?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Prediction payload unavailable: {err}"),
        }
    } else {
        println!("Customer churn prediction");
        print!("{}", render_text(&report));
    }

    Ok(())
}
