//! Dashboard view-model store.
//!
//! Single owner of all session state. The pollers and the command dispatcher
//! funnel every mutation through the reducer methods here, which encode the
//! documented precedence rules; the presentation layer only reads snapshots.

use crate::client::RequestFailure;
use crate::model::{ConnectionState, HistoryEntry, ProcessingState, TrafficSnapshot};
use std::sync::RwLock;

/// Error surfaced when a status envelope arrives with `success: false`.
pub const UNSUCCESSFUL_RESPONSE: &str = "Backend returned unsuccessful response";
/// Error surfaced when a start command fails for any reason.
pub const START_FAILED: &str = "Failed to start processing";
/// Error surfaced when a stop command fails for any reason.
pub const STOP_FAILED: &str = "Failed to stop processing";

/// Result of one status poll tick, after envelope interpretation.
#[derive(Debug, Clone)]
pub enum StatusOutcome {
    /// `success: true`: the payload replaces the snapshot wholesale,
    /// including an absent payload.
    Snapshot(Option<TrafficSnapshot>),
    /// `success: false` envelope from a reachable backend.
    Unsuccessful,
    /// Classified request failure.
    Failed(RequestFailure),
}

/// The view model read by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Most recent snapshot; retained stale across failed polls.
    pub snapshot: Option<TrafficSnapshot>,
    /// Historical signal cycles, in backend order.
    pub history: Vec<HistoryEntry>,
    pub connection: ConnectionState,
    pub processing: ProcessingState,
    /// Single current-error slot; each new classification overwrites it.
    pub last_error: Option<String>,
}

/// Thread-safe store holding the view model for one dashboard session.
pub struct DashboardStore {
    state: RwLock<DashboardState>,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DashboardState::default()),
        }
    }

    /// Clone the current view model for rendering.
    pub fn state(&self) -> DashboardState {
        self.state.read().unwrap().clone()
    }

    /// Record the startup health probe. Advisory only: flips the connection
    /// flag but never touches the error slot.
    pub fn apply_health(&self, reachable: bool) {
        let mut state = self.state.write().unwrap();
        state.connection = if reachable {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
    }

    /// Apply one status poll outcome.
    ///
    /// Success replaces the snapshot wholesale, clears the error, and marks
    /// Connected. Both failure shapes mark Disconnected and surface a message
    /// while leaving the previous snapshot in place (stale-but-present
    /// display is acceptable). Outcomes are applied in completion order:
    /// whichever response lands last wins, even for an older request.
    pub fn apply_status(&self, outcome: StatusOutcome) {
        let mut state = self.state.write().unwrap();
        match outcome {
            StatusOutcome::Snapshot(snapshot) => {
                state.snapshot = snapshot;
                state.last_error = None;
                state.connection = ConnectionState::Connected;
            }
            StatusOutcome::Unsuccessful => {
                state.last_error = Some(UNSUCCESSFUL_RESPONSE.to_string());
                state.connection = ConnectionState::Disconnected;
            }
            StatusOutcome::Failed(failure) => {
                state.last_error = Some(failure.user_message());
                state.connection = ConnectionState::Disconnected;
            }
        }
    }

    /// Apply one history poll outcome. Success replaces the sequence
    /// wholesale; any failure leaves the existing history untouched and
    /// raises no user-visible error (history is secondary telemetry).
    pub fn apply_history(&self, result: Result<Vec<HistoryEntry>, RequestFailure>) {
        match result {
            Ok(entries) => {
                let mut state = self.state.write().unwrap();
                state.history = entries;
            }
            Err(failure) => {
                tracing::debug!(error = %failure, "history fetch failed, keeping previous entries");
            }
        }
    }

    /// Apply a start command outcome. Processing flips only on acknowledged
    /// success; any failure surfaces an error and leaves the state unchanged.
    pub fn apply_start(&self, acknowledged: bool) {
        let mut state = self.state.write().unwrap();
        if acknowledged {
            state.processing = ProcessingState::Processing;
            state.last_error = None;
        } else {
            state.last_error = Some(START_FAILED.to_string());
        }
    }

    /// Apply a stop command outcome, same non-optimistic rules as start.
    pub fn apply_stop(&self, acknowledged: bool) {
        let mut state = self.state.write().unwrap();
        if acknowledged {
            state.processing = ProcessingState::Idle;
            state.last_error = None;
        } else {
            state.last_error = Some(STOP_FAILED.to_string());
        }
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LaneId, TrafficSnapshot};

    fn make_snapshot(lane: LaneId, remaining: u32) -> TrafficSnapshot {
        TrafficSnapshot {
            current_lane: Some(lane),
            lane_counts: [(lane, 5)].into_iter().collect(),
            remaining_time: Some(remaining),
            signal_timings: [(lane, 30)].into_iter().collect(),
            timestamp: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let store = DashboardStore::new();
        let state = store.state();
        assert!(state.snapshot.is_none());
        assert!(state.history.is_empty());
        assert_eq!(state.connection, ConnectionState::Disconnected);
        assert_eq!(state.processing, ProcessingState::Idle);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_health_probe_flips_connection_only() {
        let store = DashboardStore::new();
        store.apply_health(true);
        assert_eq!(store.state().connection, ConnectionState::Connected);

        store.apply_health(false);
        let state = store.state();
        assert_eq!(state.connection, ConnectionState::Disconnected);
        // Health is advisory, never surfaces an error
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_status_success_replaces_snapshot_and_clears_error() {
        let store = DashboardStore::new();
        store.apply_status(StatusOutcome::Failed(RequestFailure::NetworkUnreachable));
        assert!(store.state().last_error.is_some());

        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::North, 12))));
        let state = store.state();
        assert_eq!(
            state.snapshot.as_ref().unwrap().current_lane,
            Some(LaneId::North)
        );
        assert!(state.last_error.is_none());
        assert_eq!(state.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_unsuccessful_envelope_keeps_stale_snapshot() {
        let store = DashboardStore::new();
        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::East, 8))));

        store.apply_status(StatusOutcome::Unsuccessful);
        let state = store.state();
        assert_eq!(state.last_error.as_deref(), Some(UNSUCCESSFUL_RESPONSE));
        assert_eq!(state.connection, ConnectionState::Disconnected);
        // Previous snapshot survives application-level failure
        assert_eq!(
            state.snapshot.as_ref().unwrap().current_lane,
            Some(LaneId::East)
        );
    }

    #[test]
    fn test_transport_failure_flips_disconnected_snapshot_unchanged() {
        let store = DashboardStore::new();
        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::South, 3))));

        store.apply_status(StatusOutcome::Failed(RequestFailure::NetworkUnreachable));
        let state = store.state();
        assert_eq!(state.connection, ConnectionState::Disconnected);
        assert!(state
            .last_error
            .as_deref()
            .unwrap()
            .contains("Cannot connect to backend server"));
        assert_eq!(
            state.snapshot.as_ref().unwrap().current_lane,
            Some(LaneId::South)
        );
    }

    #[test]
    fn test_last_completed_response_wins() {
        let store = DashboardStore::new();
        // Newer tick's response completes first...
        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::West, 20))));
        // ...then the older tick's response lands and overwrites it.
        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::North, 25))));

        let state = store.state();
        assert_eq!(
            state.snapshot.as_ref().unwrap().current_lane,
            Some(LaneId::North)
        );
        assert_eq!(state.snapshot.as_ref().unwrap().remaining_time, Some(25));
    }

    #[test]
    fn test_successful_envelope_without_payload_clears_snapshot() {
        let store = DashboardStore::new();
        store.apply_status(StatusOutcome::Snapshot(Some(make_snapshot(LaneId::North, 5))));

        // Wholesale replacement applies to an absent payload too
        store.apply_status(StatusOutcome::Snapshot(None));
        let state = store.state();
        assert!(state.snapshot.is_none());
        assert_eq!(state.connection, ConnectionState::Connected);
    }

    #[test]
    fn test_history_replaced_wholesale_on_success() {
        let store = DashboardStore::new();
        let entry = HistoryEntry {
            timestamp: None,
            lane: LaneId::North,
            north_count: 3,
            south_count: 0,
            east_count: 0,
            west_count: 0,
            signal_time: 30,
        };
        store.apply_history(Ok(vec![entry.clone(), entry]));
        assert_eq!(store.state().history.len(), 2);

        store.apply_history(Ok(vec![]));
        assert!(store.state().history.is_empty());
    }

    #[test]
    fn test_history_failure_is_silent_and_retains_entries() {
        let store = DashboardStore::new();
        let entry = HistoryEntry {
            timestamp: None,
            lane: LaneId::West,
            north_count: 0,
            south_count: 0,
            east_count: 0,
            west_count: 2,
            signal_time: 15,
        };
        store.apply_history(Ok(vec![entry]));

        store.apply_history(Err(RequestFailure::NoResponse));
        let state = store.state();
        assert_eq!(state.history.len(), 1);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_start_flips_processing_only_on_ack() {
        let store = DashboardStore::new();
        store.apply_start(false);
        let state = store.state();
        assert_eq!(state.processing, ProcessingState::Idle);
        assert_eq!(state.last_error.as_deref(), Some(START_FAILED));

        store.apply_start(true);
        let state = store.state();
        assert_eq!(state.processing, ProcessingState::Processing);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_stop_failure_leaves_processing_set() {
        let store = DashboardStore::new();
        store.apply_start(true);

        store.apply_stop(false);
        let state = store.state();
        assert_eq!(state.processing, ProcessingState::Processing);
        assert_eq!(state.last_error.as_deref(), Some(STOP_FAILED));

        store.apply_stop(true);
        let state = store.state();
        assert_eq!(state.processing, ProcessingState::Idle);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_error_slot_holds_one_message_at_a_time() {
        let store = DashboardStore::new();
        store.apply_status(StatusOutcome::Failed(RequestFailure::NoResponse));
        store.apply_status(StatusOutcome::Unsuccessful);
        assert_eq!(
            store.state().last_error.as_deref(),
            Some(UNSUCCESSFUL_RESPONSE)
        );
    }
}
