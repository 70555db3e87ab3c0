use churn_insight_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("churn-insight error: {err}");
        std::process::exit(1);
    }
}
