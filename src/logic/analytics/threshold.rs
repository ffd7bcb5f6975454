//! Nearest-Row Threshold Resolution
//!
//! The payload samples thresholds at coarse steps while the operator can
//! request any value in between. The resolver picks the sampled row with
//! the smallest absolute distance; on an exact tie the earliest row wins,
//! which keeps repeated renders of the same selection stable.

use crate::logic::metrics::payload::ThresholdRow;

/// The threshold table had no rows to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTableError;

impl std::fmt::Display for EmptyTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "threshold analysis table is empty")
    }
}

impl std::error::Error for EmptyTableError {}

/// Resolves an operator-selected threshold to the nearest sampled row.
///
/// Total for every finite `target`, including values outside the sampled
/// range (clamps to the closest endpoint row). Does not assume the table
/// is sorted. Linear scan: the table stays small (single-digit rows).
pub fn nearest_row(rows: &[ThresholdRow], target: f64) -> Result<&ThresholdRow, EmptyTableError> {
    let mut best = rows.first().ok_or(EmptyTableError)?;
    let mut best_distance = (best.threshold - target).abs();

    for row in &rows[1..] {
        let distance = (row.threshold - target).abs();
        // Strict comparison: ties keep the earlier row.
        if distance < best_distance {
            best = row;
            best_distance = distance;
        }
    }

    Ok(best)
}

// ============================================================================
// TESTS
// ============================================================================
