//! Analytics Module - Threshold Resolution & Impact Projection
//!
//! Tách logic tính toán ngưỡng khỏi phần hiển thị: pure functions over
//! the loaded payload, no I/O, no shared state.

pub mod impact;
pub mod threshold;

pub use impact::{project, ThresholdImpact};
pub use threshold::{nearest_row, EmptyTableError};
