//! Dashboard Controller - Session State Machine
//!
//! Owns the load state machine (Unloaded -> Loading -> Loaded / Error) and
//! pushes complete snapshots to the rendering boundary. One controller per
//! dashboard session; no global state.

use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::view::{DashboardSnapshot, RenderSink, ViewState};
use crate::logic::analytics::{self, threshold};
use crate::logic::metrics::payload::MetricsPayload;
use crate::logic::metrics::store::MetricsStore;
use crate::logic::metrics::MetricsError;

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Externally visible load phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    Unloaded,
    Loading,
    Loaded,
    Error,
}

impl DashboardPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardPhase::Unloaded => "unloaded",
            DashboardPhase::Loading => "loading",
            DashboardPhase::Loaded => "loaded",
            DashboardPhase::Error => "error",
        }
    }
}

/// Internal state. `Loaded` owns the payload and the selection, so the
/// view state cannot exist without data behind it.
enum ControllerState {
    Unloaded,
    Loading,
    Loaded {
        payload: Arc<MetricsPayload>,
        view: ViewState,
    },
    Error(String),
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct DashboardController {
    session_id: Uuid,
    store: Arc<MetricsStore>,
    sink: Arc<dyn RenderSink>,
    /// Threshold selected when the view first loads.
    default_threshold: f64,
    state: RwLock<ControllerState>,
}

impl DashboardController {
    pub fn new(store: Arc<MetricsStore>, sink: Arc<dyn RenderSink>, default_threshold: f64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            store,
            sink,
            default_threshold,
            state: RwLock::new(ControllerState::Unloaded),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> DashboardPhase {
        match &*self.state.read() {
            ControllerState::Unloaded => DashboardPhase::Unloaded,
            ControllerState::Loading => DashboardPhase::Loading,
            ControllerState::Loaded { .. } => DashboardPhase::Loaded,
            ControllerState::Error(_) => DashboardPhase::Error,
        }
    }

    /// Message of the failure that put the controller in `Error`, if any.
    pub fn last_error(&self) -> Option<String> {
        match &*self.state.read() {
            ControllerState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Payload phiên hiện tại, chỉ có khi đã ở trạng thái Loaded.
    pub fn payload(&self) -> Option<Arc<MetricsPayload>> {
        match &*self.state.read() {
            ControllerState::Loaded { payload, .. } => Some(payload.clone()),
            _ => None,
        }
    }

    /// Rebuilds the current snapshot without publishing it.
    pub fn snapshot(&self) -> Option<DashboardSnapshot> {
        match &*self.state.read() {
            ControllerState::Loaded { payload, view } => {
                Some(Self::build_snapshot(payload, view))
            }
            _ => None,
        }
    }

    /// Handles an analytics-activation event and waits for the outcome.
    ///
    /// Idempotent: while a load is in flight or data is already cached,
    /// further activations change nothing and issue no fetch.
    pub async fn activate(&self) -> DashboardPhase {
        if !self.begin_load() {
            return self.phase();
        }

        let result = self.store.load().await;
        self.complete_load(result)
    }

    /// Handles a threshold-change event. Synchronous: resolve, update the
    /// selection, publish. Returns false when the event was ignored
    /// because no data is loaded.
    pub fn set_threshold(&self, value: f64) -> bool {
        let snapshot = {
            let mut state = self.state.write();
            match &mut *state {
                ControllerState::Loaded { payload, view } => {
                    match threshold::nearest_row(&payload.threshold_analysis, value) {
                        Ok(row) => {
                            view.selected_threshold = value;
                            view.active_row = row.clone();
                            Some(Self::build_snapshot(payload, view))
                        }
                        // Unreachable on a validated payload.
                        Err(_) => None,
                    }
                }
                _ => {
                    log::debug!(
                        "Threshold change to {} ignored: analytics not loaded",
                        value
                    );
                    None
                }
            }
        };

        match snapshot {
            Some(snapshot) => {
                self.sink.render(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Claims the Loading slot. False means the event is a no-op.
    fn begin_load(&self) -> bool {
        let mut state = self.state.write();
        match &*state {
            ControllerState::Unloaded => {
                log::info!("Loading analytics metrics (session {})...", self.session_id);
                *state = ControllerState::Loading;
                true
            }
            ControllerState::Loading => {
                log::debug!("Analytics activation ignored: load already in flight");
                false
            }
            ControllerState::Loaded { .. } => {
                log::debug!("Analytics already loaded, keeping session cache");
                false
            }
            ControllerState::Error(_) => {
                log::info!("Retrying analytics load (session {})...", self.session_id);
                *state = ControllerState::Loading;
                true
            }
        }
    }

    /// Applies a finished load. The snapshot is computed in full before
    /// anything is published, so the renderer never sees a partial view.
    fn complete_load(&self, result: Result<Arc<MetricsPayload>, MetricsError>) -> DashboardPhase {
        match result {
            Ok(payload) => {
                let row =
                    match threshold::nearest_row(&payload.threshold_analysis, self.default_threshold)
                    {
                        Ok(row) => row.clone(),
                        // Store validation rejects empty tables, but a
                        // broken fetcher must not panic the session.
                        Err(e) => return self.fail(e.to_string()),
                    };

                let view = ViewState {
                    selected_threshold: self.default_threshold,
                    active_row: row,
                };
                let snapshot = Self::build_snapshot(&payload, &view);

                log::info!(
                    "✅ Analytics loaded (session {}): {} threshold rows, {} transactions",
                    self.session_id,
                    payload.threshold_analysis.len(),
                    payload.total_transactions().unwrap_or(0)
                );

                *self.state.write() = ControllerState::Loaded { payload, view };
                self.sink.render(&snapshot);
                DashboardPhase::Loaded
            }
            Err(e) => {
                log::error!("Analytics load failed (session {}): {}", self.session_id, e);
                self.fail(e.to_string())
            }
        }
    }

    fn fail(&self, message: String) -> DashboardPhase {
        *self.state.write() = ControllerState::Error(message.clone());
        self.sink.render_error(&message);
        DashboardPhase::Error
    }

    fn build_snapshot(payload: &MetricsPayload, view: &ViewState) -> DashboardSnapshot {
        DashboardSnapshot {
            accuracy: payload.accuracy,
            auc: payload.auc,
            recall: payload.recall,
            roc_curve: payload.roc_curve.clone(),
            feature_importance: payload.feature_importance.clone(),
            selected_threshold: view.selected_threshold,
            impact: analytics::project(&view.active_row),
            published_at: Utc::now(),
        }
    }
}

// ============================================================================
// DETACHED ACTIVATION
// ============================================================================

/// Fire-and-forget activation, for callers that cannot await (UI event
/// handlers). Holds only a weak reference while the fetch is outstanding:
/// if the session ends first, the late result is dropped without effect.
pub fn spawn_activate(controller: &Arc<DashboardController>) {
    if !controller.begin_load() {
        return;
    }

    let store = controller.store.clone();
    let weak: Weak<DashboardController> = Arc::downgrade(controller);

    tokio::spawn(async move {
        let result = store.load().await;
        match weak.upgrade() {
            Some(controller) => {
                controller.complete_load(result);
            }
            None => {
                log::debug!("Analytics load finished after the session ended, result dropped");
            }
        }
    });
}
