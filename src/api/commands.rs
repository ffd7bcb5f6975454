#![allow(dead_code)]

//! Dashboard Commands - API cho Frontend
//!
//! Hỗ trợ analytics view, threshold slider, payment demo, expert mode và
//! batch CSV. Mỗi command là một wrapper mỏng quanh session context.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::constants;
use crate::logic::config::DashboardConfig;
use crate::logic::dashboard::{
    spawn_activate, DashboardController, DashboardPhase, DashboardSnapshot, LogSink,
};
use crate::logic::metrics::fetch::HttpMetricsFetcher;
use crate::logic::metrics::payload::{ConfusionMatrix, EdaStats};
use crate::logic::metrics::store::MetricsStore;
use crate::logic::scoring::{
    read_csv_upload, BackendHealth, BatchSummary, PaymentForm, PredictionResponse, ScoringClient,
    TransactionFeatures,
};

// ============================================================================
// SESSION CONTEXT
// ============================================================================

/// Everything one dashboard session owns. Dropped when the session ends;
/// any fetch still in flight then resolves against a dead weak handle.
pub struct DashboardContext {
    pub controller: Arc<DashboardController>,
    pub scoring: Arc<ScoringClient>,
}

impl DashboardContext {
    pub fn from_config(config: DashboardConfig) -> Self {
        let fetcher = Arc::new(HttpMetricsFetcher::new(&config));
        let store = Arc::new(MetricsStore::new(fetcher));
        let controller = Arc::new(DashboardController::new(
            store,
            Arc::new(LogSink),
            config.default_threshold,
        ));
        let scoring = Arc::new(ScoringClient::new(&config));

        Self {
            controller,
            scoring,
        }
    }

    /// Cho phép test và embedder tự cung cấp controller / client riêng.
    pub fn new(controller: Arc<DashboardController>, scoring: Arc<ScoringClient>) -> Self {
        Self {
            controller,
            scoring,
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Nội dung panel "model details" của dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDetails {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub auc: f64,
    pub roc_points: usize,
    pub pr_points: usize,
    /// Matrix at the training-time evaluation threshold, if published.
    pub trained_matrix: Option<ConfusionMatrix>,
    pub eda: Option<EdaStats>,
}

// ============================================================================
// ANALYTICS COMMANDS
// ============================================================================

/// Kích hoạt analytics view và chờ kết quả tải.
pub async fn activate_analytics(ctx: &DashboardContext) -> Result<DashboardSnapshot, String> {
    match ctx.controller.activate().await {
        DashboardPhase::Loaded => ctx
            .controller
            .snapshot()
            .ok_or_else(|| "Analytics state changed during activation".to_string()),
        _ => Err(ctx
            .controller
            .last_error()
            .unwrap_or_else(|| "Analytics not loaded".to_string())),
    }
}

/// Fire-and-forget activation for UI event handlers; poll
/// `dashboard_phase` to observe the outcome.
pub fn activate_analytics_detached(ctx: &DashboardContext) {
    spawn_activate(&ctx.controller);
}

/// Lấy phase hiện tại: "unloaded" | "loading" | "loaded" | "error".
pub fn dashboard_phase(ctx: &DashboardContext) -> String {
    ctx.controller.phase().as_str().to_string()
}

pub fn get_dashboard_snapshot(ctx: &DashboardContext) -> Result<DashboardSnapshot, String> {
    ctx.controller
        .snapshot()
        .ok_or_else(|| "Analytics not loaded".to_string())
}

/// Handles a slider notch (1..=9), mapped to a threshold of notch/10.
pub fn set_threshold_step(ctx: &DashboardContext, step: u8) -> Result<DashboardSnapshot, String> {
    if !(constants::THRESHOLD_STEP_MIN..=constants::THRESHOLD_STEP_MAX).contains(&step) {
        return Err(format!(
            "Slider step {} out of range ({}..={})",
            step,
            constants::THRESHOLD_STEP_MIN,
            constants::THRESHOLD_STEP_MAX
        ));
    }

    let value = f64::from(step) / 10.0;
    if !ctx.controller.set_threshold(value) {
        return Err("Analytics not loaded".to_string());
    }
    get_dashboard_snapshot(ctx)
}

pub fn get_model_details(ctx: &DashboardContext) -> Result<ModelDetails, String> {
    let payload = ctx
        .controller
        .payload()
        .ok_or_else(|| "Analytics not loaded".to_string())?;

    Ok(ModelDetails {
        accuracy: payload.accuracy,
        precision: payload.precision,
        recall: payload.recall,
        f1: payload.f1,
        auc: payload.auc,
        roc_points: payload.roc_curve.fpr.len(),
        pr_points: payload.pr_curve.precision.len(),
        trained_matrix: payload.confusion_matrix,
        eda: payload.eda.clone(),
    })
}

// ============================================================================
// SCORING COMMANDS
// ============================================================================

/// Chấm điểm form thanh toán (demo mode).
pub async fn score_payment(
    ctx: &DashboardContext,
    form: &PaymentForm,
) -> Result<PredictionResponse, String> {
    let request = form.normalize().map_err(|e| e.to_string())?;
    ctx.scoring
        .predict_payment(&request)
        .await
        .map_err(|e| e.to_string())
}

/// Chấm điểm vector đặc trưng thô (expert mode).
pub async fn score_features(
    ctx: &DashboardContext,
    features: &TransactionFeatures,
) -> Result<PredictionResponse, String> {
    ctx.scoring
        .predict_features(features)
        .await
        .map_err(|e| e.to_string())
}

/// Uploads a CSV and returns the aggregate batch verdict.
pub async fn score_batch_file(
    ctx: &DashboardContext,
    path: &Path,
) -> Result<BatchSummary, String> {
    let (file_name, bytes) = read_csv_upload(path).map_err(|e| e.to_string())?;
    ctx.scoring
        .predict_batch(&file_name, bytes)
        .await
        .map_err(|e| e.to_string())
}

/// Lấy một giao dịch ngẫu nhiên để điền sẵn form expert mode.
pub async fn load_random_sample(ctx: &DashboardContext) -> Result<TransactionFeatures, String> {
    let columns = ctx.scoring.random_sample().await.map_err(|e| e.to_string())?;
    Ok(TransactionFeatures::from_sample(&columns))
}

pub async fn backend_health(ctx: &DashboardContext) -> Result<BackendHealth, String> {
    ctx.scoring.health().await.map_err(|e| e.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
