//! Metrics Fetch Transport
//!
//! The store only knows the `MetricsFetcher` trait, so tests swap the
//! HTTP client for scripted fakes without touching the cache logic.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::payload::MetricsPayload;
use super::MetricsError;
use crate::logic::config::DashboardConfig;

/// Boxed future returned by `MetricsFetcher::fetch_metrics`.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<MetricsPayload, MetricsError>> + Send + 'a>>;

/// Source of the evaluation payload. One fetch per call, no caching here.
pub trait MetricsFetcher: Send + Sync {
    fn fetch_metrics(&self) -> FetchFuture<'_>;
}

/// Production fetcher: GET /analytics/metrics on the scoring backend.
pub struct HttpMetricsFetcher {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpMetricsFetcher {
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

    async fn fetch(&self) -> Result<MetricsPayload, MetricsError> {
        let url = format!("{}/analytics/metrics", self.base_url);
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| MetricsError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            response
                .json::<MetricsPayload>()
                .await
                .map_err(|e| MetricsError::ParseError(e.to_string()))
        } else {
            Err(MetricsError::ServerError(response.status().as_u16()))
        }
    }
}

impl MetricsFetcher for HttpMetricsFetcher {
    fn fetch_metrics(&self) -> FetchFuture<'_> {
        Box::pin(self.fetch())
    }
}
