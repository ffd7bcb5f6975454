#![allow(dead_code)]

//! Metrics Store - Session Cache
//!
//! Quản lý bộ nhớ đệm metrics trong một phiên làm việc. Fetch-once: the
//! first successful load pins the payload for the session's lifetime,
//! and concurrent callers share one in-flight fetch.

use std::sync::Arc;

use parking_lot::RwLock;

use super::fetch::MetricsFetcher;
use super::payload::MetricsPayload;
use super::MetricsError;

pub struct MetricsStore {
    fetcher: Arc<dyn MetricsFetcher>,
    /// Immutable once filled; only `clear` ever empties it again.
    cached: RwLock<Option<Arc<MetricsPayload>>>,
    /// Serializes fetches so at most one request is outstanding.
    fetch_gate: tokio::sync::Mutex<()>,
}

impl MetricsStore {
    pub fn new(fetcher: Arc<dyn MetricsFetcher>) -> Self {
        Self {
            fetcher,
            cached: RwLock::new(None),
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the session payload, fetching it on first use.
    ///
    /// Kết quả lỗi không ghi đè bộ nhớ đệm: a failed refetch leaves any
    /// previously cached payload untouched.
    pub async fn load(&self) -> Result<Arc<MetricsPayload>, MetricsError> {
        if let Some(payload) = self.cached() {
            log::debug!("Metrics cache hit, no fetch issued");
            return Ok(payload);
        }

        let _gate = self.fetch_gate.lock().await;

        // A concurrent caller may have filled the cache while this task
        // waited on the gate.
        if let Some(payload) = self.cached() {
            log::debug!("Metrics cache filled while waiting, reusing it");
            return Ok(payload);
        }

        log::info!("Fetching analytics metrics from backend...");
        let payload = self.fetcher.fetch_metrics().await?;
        payload.validate()?;

        let payload = Arc::new(payload);
        *self.cached.write() = Some(payload.clone());
        log::info!(
            "Metrics payload cached: {} threshold rows, {} ROC points",
            payload.threshold_analysis.len(),
            payload.roc_curve.fpr.len()
        );

        Ok(payload)
    }

    pub fn cached(&self) -> Option<Arc<MetricsPayload>> {
        self.cached.read().clone()
    }

    /// Drops the cached payload so the next `load` fetches again.
    /// Không được gọi trong luồng dashboard hiện tại, giữ lại cho phần test.
    pub fn clear(&self) {
        *self.cached.write() = None;
        log::debug!("Metrics cache cleared");
    }
}
