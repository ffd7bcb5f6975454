use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::controller::{spawn_activate, DashboardController, DashboardPhase};
use super::view::{DashboardSnapshot, RenderSink};
use crate::logic::metrics::fetch::{FetchFuture, MetricsFetcher};
use crate::logic::metrics::payload::{ConfusionMatrix, MetricsPayload, RocCurve, ThresholdRow};
use crate::logic::metrics::store::MetricsStore;
use crate::logic::metrics::MetricsError;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn sample_row(threshold: f64, recall: f64, tn: u64, fp: u64, fn_: u64, tp: u64) -> ThresholdRow {
    ThresholdRow {
        threshold,
        precision: 0.75,
        recall,
        true_negatives: tn,
        false_positives: fp,
        false_negatives: fn_,
        true_positives: tp,
    }
}

fn sample_payload() -> MetricsPayload {
    MetricsPayload {
        accuracy: 0.999,
        precision: 0.75,
        recall: 0.90,
        f1: 0.82,
        auc: 0.97,
        confusion_matrix: None,
        roc_curve: RocCurve {
            fpr: vec![0.0, 0.1, 1.0],
            tpr: vec![0.0, 0.8, 1.0],
        },
        pr_curve: Default::default(),
        threshold_analysis: vec![
            sample_row(0.1, 0.98, 900, 80, 1, 19),
            sample_row(0.5, 0.90, 950, 30, 5, 15),
            sample_row(0.9, 0.60, 975, 5, 8, 12),
        ],
        feature_importance: Vec::new(),
        eda: None,
    }
}

#[derive(Default)]
struct RecordingSink {
    rendered: Mutex<Vec<DashboardSnapshot>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn rendered_count(&self) -> usize {
        self.rendered.lock().len()
    }

    fn last_rendered(&self) -> DashboardSnapshot {
        self.rendered.lock().last().cloned().unwrap()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, snapshot: &DashboardSnapshot) {
        self.rendered.lock().push(snapshot.clone());
    }

    fn render_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

struct CountingFetcher {
    payload: MetricsPayload,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn new(payload: MetricsPayload) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsFetcher for CountingFetcher {
    fn fetch_metrics(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        })
    }
}

struct SlowFetcher {
    payload: MetricsPayload,
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowFetcher {
    fn new(payload: MetricsPayload, delay: Duration) -> Self {
        Self {
            payload,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsFetcher for SlowFetcher {
    fn fetch_metrics(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self.payload.clone())
        })
    }
}

struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<MetricsPayload, MetricsError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(script: Vec<Result<MetricsPayload, MetricsError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsFetcher for ScriptedFetcher {
    fn fetch_metrics(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| panic!("fetcher called more often than scripted"))
        })
    }
}

fn controller_with(
    fetcher: Arc<dyn MetricsFetcher>,
) -> (Arc<DashboardController>, Arc<RecordingSink>, Arc<MetricsStore>) {
    let store = Arc::new(MetricsStore::new(fetcher));
    let sink = Arc::new(RecordingSink::default());
    let controller = Arc::new(DashboardController::new(store.clone(), sink.clone(), 0.5));
    (controller, sink, store)
}

// ============================================================================
// ACTIVATION
// ============================================================================

#[tokio::test]
async fn test_activation_loads_and_publishes_default_view() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    assert_eq!(controller.phase(), DashboardPhase::Unloaded);
    let phase = controller.activate().await;

    assert_eq!(phase, DashboardPhase::Loaded);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(sink.rendered_count(), 1);

    let snapshot = sink.last_rendered();
    assert_eq!(snapshot.selected_threshold, 0.5);
    assert_eq!(snapshot.impact.recall_label(), "90.0%");
    assert_eq!(
        snapshot.impact.matrix,
        ConfusionMatrix {
            true_negatives: 950,
            false_positives: 30,
            false_negatives: 5,
            true_positives: 15,
        }
    );
    assert_eq!(snapshot.accuracy, 0.999);
    assert_eq!(snapshot.roc_curve.fpr.len(), snapshot.roc_curve.tpr.len());
}

#[tokio::test]
async fn test_concurrent_activations_fetch_once() {
    let fetcher = Arc::new(SlowFetcher::new(
        sample_payload(),
        Duration::from_millis(20),
    ));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    let (a, b) = tokio::join!(controller.activate(), controller.activate());

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(sink.rendered_count(), 1);
    // One call drove the load to completion, the other was dropped early.
    assert!(a == DashboardPhase::Loaded || b == DashboardPhase::Loaded);
    assert_eq!(controller.phase(), DashboardPhase::Loaded);
}

#[tokio::test]
async fn test_reactivation_after_load_is_a_noop() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    controller.activate().await;
    assert!(controller.set_threshold(0.9));

    let phase = controller.activate().await;

    assert_eq!(phase, DashboardPhase::Loaded);
    assert_eq!(fetcher.calls(), 1);
    // Selection survives, nothing new is published.
    assert_eq!(sink.rendered_count(), 2);
    assert_eq!(sink.last_rendered().selected_threshold, 0.9);
}

#[tokio::test]
async fn test_failed_load_reports_error_without_partial_view() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Err(MetricsError::ServerError(
        500,
    ))]));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    let phase = controller.activate().await;

    assert_eq!(phase, DashboardPhase::Error);
    assert_eq!(sink.rendered_count(), 0);
    assert_eq!(sink.errors.lock().len(), 1);
    assert!(sink.errors.lock()[0].contains("500"));
    assert!(controller.snapshot().is_none());
    assert!(controller.last_error().is_some());
}

#[tokio::test]
async fn test_retry_after_error_recovers() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Err(MetricsError::NetworkError("connection refused".to_string())),
        Ok(sample_payload()),
    ]));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    assert_eq!(controller.activate().await, DashboardPhase::Error);
    assert_eq!(controller.activate().await, DashboardPhase::Loaded);

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(sink.rendered_count(), 1);
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn test_prior_session_cache_survives_new_controller() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let store = Arc::new(MetricsStore::new(fetcher.clone()));

    let first_sink = Arc::new(RecordingSink::default());
    let first = DashboardController::new(store.clone(), first_sink.clone(), 0.5);
    first.activate().await;
    drop(first);

    // A later session over the same store starts from the cached payload.
    let second_sink = Arc::new(RecordingSink::default());
    let second = DashboardController::new(store, second_sink.clone(), 0.5);
    assert_eq!(second.activate().await, DashboardPhase::Loaded);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(second_sink.rendered_count(), 1);
}

// ============================================================================
// THRESHOLD EVENTS
// ============================================================================

#[tokio::test]
async fn test_threshold_change_republishes_impact() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let (controller, sink, _store) = controller_with(fetcher);

    controller.activate().await;
    assert!(controller.set_threshold(0.9));

    assert_eq!(sink.rendered_count(), 2);
    let snapshot = sink.last_rendered();
    assert_eq!(snapshot.selected_threshold, 0.9);
    assert_eq!(snapshot.impact.recall_label(), "60.0%");
    assert_eq!(snapshot.impact.false_positives, 5);
    assert_eq!(snapshot.impact.false_negatives, 8);
}

#[tokio::test]
async fn test_threshold_between_samples_resolves_nearest_row() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let (controller, sink, _store) = controller_with(fetcher);

    controller.activate().await;
    assert!(controller.set_threshold(0.47));

    let snapshot = sink.last_rendered();
    // Selection keeps the raw value, impact comes from the 0.5 row.
    assert_eq!(snapshot.selected_threshold, 0.47);
    assert_eq!(snapshot.impact.recall_label(), "90.0%");
    assert_eq!(snapshot.impact.false_positives, 30);
}

#[tokio::test]
async fn test_threshold_change_before_load_is_ignored() {
    let fetcher = Arc::new(CountingFetcher::new(sample_payload()));
    let (controller, sink, _store) = controller_with(fetcher);

    assert!(!controller.set_threshold(0.5));
    assert_eq!(sink.rendered_count(), 0);
    assert_eq!(controller.phase(), DashboardPhase::Unloaded);
}

#[tokio::test]
async fn test_threshold_change_during_error_is_ignored() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Err(MetricsError::ServerError(
        503,
    ))]));
    let (controller, sink, _store) = controller_with(fetcher);

    controller.activate().await;
    assert!(!controller.set_threshold(0.3));
    assert_eq!(sink.rendered_count(), 0);
}

// ============================================================================
// DETACHED ACTIVATION
// ============================================================================

#[tokio::test]
async fn test_detached_activation_completes_in_background() {
    let fetcher = Arc::new(SlowFetcher::new(
        sample_payload(),
        Duration::from_millis(10),
    ));
    let (controller, sink, _store) = controller_with(fetcher);

    spawn_activate(&controller);
    assert_eq!(controller.phase(), DashboardPhase::Loading);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(controller.phase(), DashboardPhase::Loaded);
    assert_eq!(sink.rendered_count(), 1);
}

#[tokio::test]
async fn test_duplicate_detached_activation_is_dropped() {
    let fetcher = Arc::new(SlowFetcher::new(
        sample_payload(),
        Duration::from_millis(10),
    ));
    let (controller, sink, _store) = controller_with(fetcher.clone());

    spawn_activate(&controller);
    spawn_activate(&controller);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(sink.rendered_count(), 1);
}

#[tokio::test]
async fn test_late_result_after_session_drop_is_discarded() {
    let fetcher = Arc::new(SlowFetcher::new(
        sample_payload(),
        Duration::from_millis(30),
    ));
    let (controller, sink, store) = controller_with(fetcher.clone());

    spawn_activate(&controller);
    drop(controller);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // The fetch ran to completion but nothing was published.
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(sink.rendered_count(), 0);
    assert_eq!(sink.errors.lock().len(), 0);
    assert!(store.cached().is_some());
}

// ============================================================================
// PHASE NAMES
// ============================================================================

#[test]
fn test_phase_strings() {
    assert_eq!(DashboardPhase::Unloaded.as_str(), "unloaded");
    assert_eq!(DashboardPhase::Loading.as_str(), "loading");
    assert_eq!(DashboardPhase::Loaded.as_str(), "loaded");
    assert_eq!(DashboardPhase::Error.as_str(), "error");
}
