//! Evaluation Payload - Wire Model
//!
//! Shape served by the scoring backend at GET /analytics/metrics. Field
//! names follow the backend's JSON keys; the confusion-matrix counts use
//! serde renames because `fn` is reserved in Rust.

use serde::{Deserialize, Serialize};

use super::MetricsError;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Một hàng trong bảng phân tích ngưỡng: chỉ số mô hình tại một ngưỡng đã lấy mẫu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRow {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "tn")]
    pub true_negatives: u64,
    #[serde(rename = "fp")]
    pub false_positives: u64,
    #[serde(rename = "fn")]
    pub false_negatives: u64,
    #[serde(rename = "tp")]
    pub true_positives: u64,
}

impl ThresholdRow {
    pub fn matrix(&self) -> ConfusionMatrix {
        ConfusionMatrix {
            true_negatives: self.true_negatives,
            false_positives: self.false_positives,
            false_negatives: self.false_negatives,
            true_positives: self.true_positives,
        }
    }

    /// Total transactions covered by this row.
    pub fn total(&self) -> u64 {
        self.matrix().total()
    }
}

/// Four-cell confusion matrix. Counts, not rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    #[serde(rename = "tn")]
    pub true_negatives: u64,
    #[serde(rename = "fp")]
    pub false_positives: u64,
    #[serde(rename = "fn")]
    pub false_negatives: u64,
    #[serde(rename = "tp")]
    pub true_positives: u64,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u64 {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }
}

/// ROC curve as parallel coordinate vectors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
}

/// Precision-recall curve as parallel coordinate vectors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

/// Ranked feature importance entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub importance: f64,
}

/// Dataset profile computed during training (exploratory stats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdaStats {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub fraud_rate: f64,
    pub avg_amount_legit: f64,
    pub avg_amount_fraud: f64,
}

/// Evaluation artifact produced when the classifier was trained.
///
/// Bất biến sau khi tải: mọi phép phân tích ngưỡng chỉ đọc dữ liệu này,
/// không bao giờ ghi lại.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsPayload {
    pub accuracy: f64,
    #[serde(default)]
    pub precision: f64,
    pub recall: f64,
    #[serde(default)]
    pub f1: f64,
    pub auc: f64,
    /// Matrix at the threshold the model was evaluated with upstream.
    pub confusion_matrix: Option<ConfusionMatrix>,
    pub roc_curve: RocCurve,
    #[serde(default)]
    pub pr_curve: PrCurve,
    pub threshold_analysis: Vec<ThresholdRow>,
    #[serde(default)]
    pub feature_importance: Vec<FeatureWeight>,
    pub eda: Option<EdaStats>,
}

// ============================================================================
// VALIDATION
// ============================================================================

impl MetricsPayload {
    /// Total transactions behind the threshold table, if present.
    pub fn total_transactions(&self) -> Option<u64> {
        self.threshold_analysis.first().map(|row| row.total())
    }

    /// Checks the structural invariants the analytics engine relies on.
    ///
    /// A payload that fails here is rejected before caching: the upstream
    /// pipeline must recompute it, the dashboard never repairs data.
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.threshold_analysis.is_empty() {
            return Err(MetricsError::EmptyThresholdTable);
        }

        if self.roc_curve.fpr.len() != self.roc_curve.tpr.len() {
            return Err(MetricsError::MalformedPayload(format!(
                "ROC curve length mismatch: {} fpr vs {} tpr points",
                self.roc_curve.fpr.len(),
                self.roc_curve.tpr.len()
            )));
        }

        let expected_total = self.threshold_analysis[0].total();
        for row in &self.threshold_analysis {
            if !row.threshold.is_finite() || row.threshold <= 0.0 || row.threshold >= 1.0 {
                return Err(MetricsError::MalformedPayload(format!(
                    "threshold {} outside (0, 1)",
                    row.threshold
                )));
            }
            if !(0.0..=1.0).contains(&row.recall) {
                return Err(MetricsError::MalformedPayload(format!(
                    "recall {} outside [0, 1] at threshold {}",
                    row.recall, row.threshold
                )));
            }
            if row.total() != expected_total {
                return Err(MetricsError::MalformedPayload(format!(
                    "confusion counts at threshold {} sum to {}, expected {}",
                    row.threshold,
                    row.total(),
                    expected_total
                )));
            }
        }

        Ok(())
    }
}
