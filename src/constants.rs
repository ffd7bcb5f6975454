//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point the dashboard at another backend, only edit this file.

/// Default scoring backend URL
///
/// This is the fallback URL when no environment variable is set.
/// The FastAPI backend serves on port 8000 in development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Default HTTP timeout for backend requests (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Decision threshold shown when the analytics view first loads
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Slider domain: the operator picks a notch 1..=9, mapped to 0.1..=0.9
pub const THRESHOLD_STEP_MIN: u8 = 1;
pub const THRESHOLD_STEP_MAX: u8 = 9;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "FraudLens";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("FRAUDLENS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_request_timeout_secs() -> u64 {
    std::env::var("FRAUDLENS_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
}

/// Get the initial threshold from environment, clamped to the slider domain
pub fn get_default_threshold() -> f64 {
    std::env::var("FRAUDLENS_DEFAULT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|t| t.is_finite())
        .map(|t| t.clamp(0.1, 0.9))
        .unwrap_or(DEFAULT_DECISION_THRESHOLD)
}
