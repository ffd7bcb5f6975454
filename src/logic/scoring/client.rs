//! Scoring API Client
//!
//! HTTP client for the backend's prediction endpoints. The dashboard
//! relays requests and responses as-is; classification happens server-side.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::forms::TransactionFeatures;
use crate::logic::config::DashboardConfig;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone)]
pub enum ScoringError {
    /// Transport-level failure (DNS, refused connection, timeout).
    NetworkError(String),
    /// Backend answered with a non-success status; `detail` carries its
    /// error message when one was present in the body.
    ServerError { status: u16, detail: String },
    /// Body was not the JSON shape the dashboard expects.
    ParseError(String),
    /// Operator input rejected before any request was sent.
    InvalidForm(String),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::NetworkError(e) => write!(f, "Network error: {}", e),
            ScoringError::ServerError { status, detail } => {
                write!(f, "Server error: HTTP {} - {}", status, detail)
            }
            ScoringError::ParseError(e) => write!(f, "Parse error: {}", e),
            ScoringError::InvalidForm(e) => write!(f, "Invalid form: {}", e),
        }
    }
}

impl std::error::Error for ScoringError {}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Normalized payment submitted to POST /predict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub amount: f64,
}

/// Kết quả chấm điểm cho một giao dịch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// "FRAUD" or "LEGITIMATE".
    pub label: String,
    pub probability: f64,
    /// Decision threshold the backend applied.
    pub threshold: f64,
    pub model: String,
    pub notes: String,
    pub processing_time_ms: f64,
}

/// Aggregate result of a CSV batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_transactions: u64,
    pub fraud_count: u64,
    pub fraud_percentage: f64,
    pub processing_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    pub model_loaded: bool,
    pub data_loaded: bool,
}

/// Flat column map returned by GET /random-sample (includes the ground
/// truth `Class` column, which the feature form ignores).
pub type SampleColumns = BTreeMap<String, f64>;

// ============================================================================
// CLIENT
// ============================================================================

pub struct ScoringClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ScoringClient {
    pub fn new(config: &DashboardConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.api_base_url.clone(),
            http_client,
        }
    }

    pub async fn health(&self) -> Result<BackendHealth, ScoringError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Scores one payment-style submission.
    pub async fn predict_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PredictionResponse, ScoringError> {
        let url = format!("{}/predict", self.base_url);
        log::debug!("POST {} (amount {:.2})", url, request.amount);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Scores a raw feature vector (expert mode form).
    pub async fn predict_features(
        &self,
        features: &TransactionFeatures,
    ) -> Result<PredictionResponse, ScoringError> {
        let url = format!("{}/predict-features", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&features.to_payload())
            .send()
            .await
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Uploads a CSV of transactions and returns the batch summary.
    pub async fn predict_batch(
        &self,
        file_name: &str,
        csv_bytes: Vec<u8>,
    ) -> Result<BatchSummary, ScoringError> {
        let url = format!("{}/predict-batch", self.base_url);
        log::info!("Uploading batch '{}' ({} bytes)", file_name, csv_bytes.len());

        let part = reqwest::multipart::Part::bytes(csv_bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Pulls a random transaction from the backend's evaluation data, for
    /// pre-filling the feature form.
    pub async fn random_sample(&self) -> Result<SampleColumns, ScoringError> {
        let url = format!("{}/random-sample", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ScoringError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ScoringError::ParseError(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ScoringError::ServerError {
                status: status.as_u16(),
                detail: error_detail(&body),
            })
        }
    }
}

/// Extracts FastAPI's `{"detail": ...}` message, falling back to the raw
/// body when the shape differs.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail").map(|d| match d.as_str() {
                Some(s) => s.to_string(),
                None => d.to_string(),
            })
        })
        .unwrap_or_else(|| body.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
