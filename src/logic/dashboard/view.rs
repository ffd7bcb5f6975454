//! View Types & Rendering Boundary
//!
//! The per-session selection state, the snapshot handed to the renderer
//! and the boundary trait itself.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::analytics::ThresholdImpact;
use crate::logic::metrics::payload::{FeatureWeight, RocCurve, ThresholdRow};

/// Trạng thái lựa chọn của phiên làm việc, chỉ tồn tại khi đã có dữ liệu.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Raw operator selection. Kept as chosen, independent of which
    /// sampled row it resolves to.
    pub selected_threshold: f64,
    /// Nearest sampled row for the current selection.
    pub active_row: ThresholdRow,
}

/// Everything one render needs, computed in full before it is published.
///
/// Counts and curve coordinates are raw values; locale formatting is the
/// renderer's job.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub accuracy: f64,
    pub auc: f64,
    /// Model-level recall from training-time evaluation.
    pub recall: f64,
    pub roc_curve: RocCurve,
    pub feature_importance: Vec<FeatureWeight>,
    pub selected_threshold: f64,
    pub impact: ThresholdImpact,
    pub published_at: DateTime<Utc>,
}

/// Rendering boundary. Implementations must treat `render` as idempotent:
/// the controller may publish the same series again after a no-op event.
pub trait RenderSink: Send + Sync {
    fn render(&self, snapshot: &DashboardSnapshot);
    fn render_error(&self, message: &str);
}

/// Headless sink for console runs: writes a compact summary to the log.
pub struct LogSink;

impl RenderSink for LogSink {
    fn render(&self, snapshot: &DashboardSnapshot) {
        log::info!(
            "📊 Model: accuracy {:.1}%, AUC {:.3}, recall {:.1}%",
            snapshot.accuracy * 100.0,
            snapshot.auc,
            snapshot.recall * 100.0
        );
        log::info!(
            "   Threshold {:.2} -> recall {}, {} false alarms, {} missed frauds",
            snapshot.selected_threshold,
            snapshot.impact.recall_label(),
            snapshot.impact.false_positives,
            snapshot.impact.false_negatives
        );
    }

    fn render_error(&self, message: &str) {
        log::error!("Dashboard error: {}", message);
    }
}
