use serde::{Deserialize, Serialize};

use crate::constants;

/// Connection settings plus the initial analytics state.
///
/// `Default` reads the environment so embedders can construct a session
/// without wiring their own settings source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the scoring backend.
    pub api_base_url: String,
    /// Timeout applied to every backend request (seconds).
    pub request_timeout_secs: u64,
    /// Threshold selected when the analytics view first loads.
    pub default_threshold: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::get_api_url(),
            request_timeout_secs: constants::get_request_timeout_secs(),
            default_threshold: constants::get_default_threshold(),
        }
    }
}
