//! Impact Projection
//!
//! Turns a resolved threshold row into the numbers the dashboard displays.

use serde::{Deserialize, Serialize};

use crate::logic::metrics::payload::{ConfusionMatrix, ThresholdRow};

/// Chỉ số hiển thị cho một ngưỡng đã chọn.
///
/// Counts stay raw; thousands separators and similar locale formatting
/// belong to the renderer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdImpact {
    /// Recall as a percentage, already rounded to one decimal place.
    pub recall_pct: f64,
    /// Legitimate transactions that would be flagged (false alarms).
    pub false_positives: u64,
    /// Fraudulent transactions that would slip through (missed fraud).
    pub false_negatives: u64,
    pub matrix: ConfusionMatrix,
}

impl ThresholdImpact {
    /// Display label, e.g. `87.3%`.
    pub fn recall_label(&self) -> String {
        format!("{:.1}%", self.recall_pct)
    }
}

pub fn project(row: &ThresholdRow) -> ThresholdImpact {
    ThresholdImpact {
        recall_pct: round_to_tenth(row.recall * 100.0),
        false_positives: row.false_positives,
        false_negatives: row.false_negatives,
        matrix: row.matrix(),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================
