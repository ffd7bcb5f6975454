//! Metrics Module - Evaluation Payload & Session Cache
//!
//! Dữ liệu metrics được tải đúng một lần cho mỗi phiên làm việc và
//! giữ bất biến trong bộ nhớ đệm cho đến khi phiên kết thúc.

pub mod fetch;
pub mod payload;
pub mod store;


pub use fetch::{FetchFuture, HttpMetricsFetcher, MetricsFetcher};
pub use payload::{ConfusionMatrix, MetricsPayload, ThresholdRow};
pub use store::MetricsStore;

/// Errors raised while acquiring or vetting the metrics payload.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// Transport-level failure (DNS, refused connection, timeout).
    NetworkError(String),
    /// Backend answered with a non-success HTTP status.
    ServerError(u16),
    /// Body was not the JSON shape the dashboard expects.
    ParseError(String),
    /// Payload arrived without a single threshold row.
    EmptyThresholdTable,
    /// Payload violates a structural invariant and must be recomputed upstream.
    MalformedPayload(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::NetworkError(e) => write!(f, "Network error: {}", e),
            MetricsError::ServerError(code) => write!(f, "Server error: HTTP {}", code),
            MetricsError::ParseError(e) => write!(f, "Parse error: {}", e),
            MetricsError::EmptyThresholdTable => {
                write!(f, "Threshold table is empty (recompute metrics upstream)")
            }
            MetricsError::MalformedPayload(e) => {
                write!(f, "Malformed metrics payload: {} (recompute metrics upstream)", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}
