//! State synchronization layer.
//!
//! One [`DashboardSession`] owns the view-model store, the startup health
//! probe, the two recurring pollers, and the command dispatcher. Timers are
//! registered by [`DashboardSession::start`] and cancelled on
//! [`DashboardSession::dispose`] (or Drop), on every exit path.

use crate::client::{ControllerClient, RequestFailure};
use crate::config::PollConfig;
use crate::model::VideoSource;
use crate::store::{DashboardStore, StatusOutcome};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A live dashboard session against one controller.
///
/// All mutation of the view model funnels through this session; the
/// presentation layer only reads [`DashboardStore`] snapshots.
pub struct DashboardSession {
    store: Arc<DashboardStore>,
    client: Arc<ControllerClient>,
    poll: PollConfig,
    cancel: CancellationToken,
}

impl DashboardSession {
    pub fn new(client: ControllerClient, poll: PollConfig) -> Self {
        Self {
            store: Arc::new(DashboardStore::new()),
            client: Arc::new(client),
            poll,
            cancel: CancellationToken::new(),
        }
    }

    /// The view-model store this session mutates.
    pub fn store(&self) -> Arc<DashboardStore> {
        Arc::clone(&self.store)
    }

    /// Token that fires when the session is disposed; render loops can
    /// select on it.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// One-shot liveness probe, run once at session startup.
    ///
    /// Advisory only: flips the connection flag but never surfaces an error
    /// to the user error channel.
    pub async fn check_health(&self) {
        match self.client.health().await {
            Ok(health) if health.is_ok() => {
                tracing::debug!(message = %health.message, "backend health probe succeeded");
                self.store.apply_health(true);
            }
            Ok(health) => {
                tracing::warn!(status = %health.status, "backend health probe returned unexpected status");
                self.store.apply_health(false);
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "backend health probe failed");
                self.store.apply_health(false);
            }
        }
    }

    /// Fetch the current snapshot once and reduce it into the store.
    pub async fn poll_status_once(&self) {
        Self::fetch_status(&self.client, &self.store).await;
    }

    /// Fetch the history log once and reduce it into the store.
    pub async fn poll_history_once(&self) {
        Self::fetch_history(&self.client, &self.store).await;
    }

    /// Start the two recurring pollers.
    ///
    /// Each poller ticks at its fixed cadence for the life of the session,
    /// with the first tick firing immediately. Every tick spawns its fetch
    /// on its own task, so a slow request never delays the next tick:
    /// requests from the same poller may overlap, and whichever response
    /// completes last wins in the store.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let status_loop = {
            let client = Arc::clone(&self.client);
            let store = Arc::clone(&self.store);
            let cancel = self.cancel.clone();
            let period = self.poll.status_interval();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                tracing::info!(interval_seconds = period.as_secs(), "status poller started");
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::info!("status poller shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            let client = Arc::clone(&client);
                            let store = Arc::clone(&store);
                            tokio::spawn(async move {
                                Self::fetch_status(&client, &store).await;
                            });
                        }
                    }
                }
            })
        };

        let history_loop = {
            let client = Arc::clone(&self.client);
            let store = Arc::clone(&self.store);
            let cancel = self.cancel.clone();
            let period = self.poll.history_interval();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                tracing::info!(interval_seconds = period.as_secs(), "history poller started");
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::info!("history poller shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            let client = Arc::clone(&client);
                            let store = Arc::clone(&store);
                            tokio::spawn(async move {
                                Self::fetch_history(&client, &store).await;
                            });
                        }
                    }
                }
            })
        };

        vec![status_loop, history_loop]
    }

    /// Ask the controller to start processing `source`.
    ///
    /// The processing flag flips only on an acknowledged success; the next
    /// scheduled status tick picks up any controller-side effects.
    pub async fn start_processing(&self, source: VideoSource) {
        match self.client.start(&source).await {
            Ok(ack) if ack.success => {
                tracing::info!(message = %ack.message, "processing started");
                self.store.apply_start(true);
            }
            Ok(ack) => {
                tracing::warn!(message = %ack.message, "start command rejected by controller");
                self.store.apply_start(false);
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "start command failed");
                self.store.apply_start(false);
            }
        }
    }

    /// Ask the controller to stop processing.
    pub async fn stop_processing(&self) {
        match self.client.stop().await {
            Ok(ack) if ack.success => {
                tracing::info!(message = %ack.message, "processing stopped");
                self.store.apply_stop(true);
            }
            Ok(ack) => {
                tracing::warn!(message = %ack.message, "stop command rejected by controller");
                self.store.apply_stop(false);
            }
            Err(failure) => {
                tracing::warn!(error = %failure, "stop command failed");
                self.store.apply_stop(false);
            }
        }
    }

    /// Cancel both pollers. In-flight requests are abandoned without any
    /// explicit cancellation signal to the backend.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    async fn fetch_status(client: &ControllerClient, store: &DashboardStore) {
        let outcome = match client.status().await {
            Ok(envelope) if envelope.success => StatusOutcome::Snapshot(envelope.data),
            Ok(_) => StatusOutcome::Unsuccessful,
            Err(failure) => StatusOutcome::Failed(failure),
        };
        store.apply_status(outcome);
    }

    async fn fetch_history(client: &ControllerClient, store: &DashboardStore) {
        let result = match client.history().await {
            Ok(envelope) if envelope.success => Ok(envelope.data.unwrap_or_default()),
            Ok(_) => Err(RequestFailure::UnknownFailure(
                "unsuccessful history envelope".to_string(),
            )),
            Err(failure) => Err(failure),
        };
        store.apply_history(result);
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
