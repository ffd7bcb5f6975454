//! FraudLens Analytics Core - Main Entry Point
//!
//! Drives one dashboard session against the scoring backend from the
//! console. Frontend shells embed `api::commands` directly instead.

mod api;
mod logic;
pub mod constants;

use std::path::PathBuf;
use std::time::Duration;

use api::commands::{self, DashboardContext};
use logic::config::DashboardConfig;
use logic::scoring::PaymentForm;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "🚀 Starting {} Analytics Core v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let args: Vec<String> = std::env::args().skip(1).collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime for dashboard session");

    let config = DashboardConfig::default();
    log::info!("   Backend: {}", config.api_base_url);
    log::info!("   Timeout: {}s", config.request_timeout_secs);
    let ctx = DashboardContext::from_config(config);

    if let Err(message) = runtime.block_on(run(&ctx, &args)) {
        log::error!("{}", message);
        std::process::exit(1);
    }
}

async fn run(ctx: &DashboardContext, args: &[String]) -> Result<(), String> {
    let command = args.first().map(String::as_str).unwrap_or("dashboard");
    match command {
        "dashboard" => run_dashboard(ctx).await,
        "impact" => run_impact(ctx, args.get(1)).await,
        "score" => run_score(ctx, &args[1..]).await,
        "sample" => run_sample(ctx).await,
        "batch" => run_batch(ctx, args.get(1)).await,
        "health" => run_health(ctx).await,
        other => Err(format!(
            "Unknown command '{}'. Commands: dashboard | impact <step> | score <amount> [card] | sample | batch <file.csv> | health",
            other
        )),
    }
}

/// Default session: detached activation the way a UI tab click does it,
/// then a full slider sweep once the data arrives.
async fn run_dashboard(ctx: &DashboardContext) -> Result<(), String> {
    log::info!("Dashboard session {}", ctx.controller.session_id());
    commands::activate_analytics_detached(ctx);

    while commands::dashboard_phase(ctx) == "loading" {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    if commands::dashboard_phase(ctx) != "loaded" {
        return Err(ctx
            .controller
            .last_error()
            .unwrap_or_else(|| "Analytics load failed".to_string()));
    }

    let details = commands::get_model_details(ctx)?;
    log::info!(
        "Model details: precision {:.3}, F1 {:.3}, ROC {} points, PR {} points",
        details.precision,
        details.f1,
        details.roc_points,
        details.pr_points
    );
    if let Some(eda) = &details.eda {
        log::info!(
            "Dataset: {} transactions, {} fraud ({:.4}% fraud rate)",
            eda.total_transactions,
            eda.fraud_count,
            eda.fraud_rate
        );
    }
    if let Some(matrix) = &details.trained_matrix {
        log::info!(
            "Evaluation matrix: TN {}, FP {}, FN {}, TP {}",
            matrix.true_negatives,
            matrix.false_positives,
            matrix.false_negatives,
            matrix.true_positives
        );
    }

    // Walk the slider across its full range; each step logs its impact.
    for step in constants::THRESHOLD_STEP_MIN..=constants::THRESHOLD_STEP_MAX {
        commands::set_threshold_step(ctx, step)?;
    }

    Ok(())
}

/// One-shot impact query at a single slider step.
async fn run_impact(ctx: &DashboardContext, step: Option<&String>) -> Result<(), String> {
    let step: u8 = step
        .ok_or_else(|| "Usage: impact <step 1-9>".to_string())?
        .parse()
        .map_err(|_| "Slider step must be a number between 1 and 9".to_string())?;

    commands::activate_analytics(ctx).await?;
    let snapshot = commands::set_threshold_step(ctx, step)?;

    log::info!(
        "Threshold {:.1}: recall {}, {} false alarms, {} missed frauds (TN {}, TP {})",
        snapshot.selected_threshold,
        snapshot.impact.recall_label(),
        snapshot.impact.false_positives,
        snapshot.impact.false_negatives,
        snapshot.impact.matrix.true_negatives,
        snapshot.impact.matrix.true_positives
    );
    Ok(())
}

async fn run_score(ctx: &DashboardContext, args: &[String]) -> Result<(), String> {
    let amount: f64 = args
        .first()
        .ok_or_else(|| "Usage: score <amount> [card-number]".to_string())?
        .parse()
        .map_err(|_| "Amount must be a number".to_string())?;

    // Demo card unless the operator supplies one.
    let form = PaymentForm {
        card_number: args
            .get(1)
            .cloned()
            .unwrap_or_else(|| "4111 1111 1111 1111".to_string()),
        expiry_date: "12/30".to_string(),
        cvv: "123".to_string(),
        amount,
    };

    let verdict = commands::score_payment(ctx, &form).await?;
    log::info!(
        "Verdict: {} ({:.1}% fraud probability, threshold {:.2}, model {})",
        verdict.label,
        verdict.probability * 100.0,
        verdict.threshold,
        verdict.model
    );
    if !verdict.notes.is_empty() {
        log::info!("Notes: {}", verdict.notes);
    }
    log::info!("Scored in {:.1} ms", verdict.processing_time_ms);
    Ok(())
}

/// Pulls a random evaluation transaction and scores it as raw features.
async fn run_sample(ctx: &DashboardContext) -> Result<(), String> {
    let features = commands::load_random_sample(ctx).await?;
    log::info!(
        "Sample transaction: time {:.0}, amount {:.2}",
        features.time,
        features.amount
    );

    let verdict = commands::score_features(ctx, &features).await?;
    log::info!(
        "Verdict: {} ({:.1}% fraud probability)",
        verdict.label,
        verdict.probability * 100.0
    );
    Ok(())
}

async fn run_batch(ctx: &DashboardContext, path: Option<&String>) -> Result<(), String> {
    let path = PathBuf::from(path.ok_or_else(|| "Usage: batch <file.csv>".to_string())?);
    let summary = commands::score_batch_file(ctx, &path).await?;

    log::info!(
        "Batch result: {} transactions, {} flagged as fraud ({:.2}%), {:.1} ms",
        summary.total_transactions,
        summary.fraud_count,
        summary.fraud_percentage,
        summary.processing_time_ms
    );
    Ok(())
}

async fn run_health(ctx: &DashboardContext) -> Result<(), String> {
    let health = commands::backend_health(ctx).await?;
    log::info!(
        "Backend status: {} (model loaded: {}, data loaded: {})",
        health.status,
        health.model_loaded,
        health.data_loaded
    );
    Ok(())
}
