//! # Sync Status Reporter
//!
//! Presentation-side driver for the sync pipeline. The reporter keeps a
//! snapshot the UI can render on every frame and owns three behaviors that
//! are easy to get wrong in the view layer:
//!
//! - **Polling**: refresh the status immediately on start and every poll
//!   interval after that; [`SyncReporter::stop`] (or dropping the reporter)
//!   cancels the task so no timer outlives the screen
//! - **Forced sync**: [`SyncReporter::handle_sync`] runs one cycle at a
//!   time; taps while a cycle runs or while offline are ignored
//! - **Result display**: a finished cycle's outcome stays visible for a
//!   fixed window, with a status reload shortly after completion so the
//!   queue count on screen matches what the backend just accepted
//!
//! Status loads that fail are logged and swallowed; the last good snapshot
//! stays on screen rather than flickering to an error state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::status::{SyncResult, SyncStatus};
use super::{ProgressFn, StatusProvider, SyncConfig, SyncRunner};

/// Where the reporter is in the forced-sync lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SyncPhase {
    /// No sync running, nothing to show
    #[default]
    Idle,
    /// A forced sync cycle is in flight
    Syncing,
    /// A cycle finished; its outcome is on screen
    Displaying {
        /// The outcome being displayed
        result: SyncResult,
    },
}

/// Point-in-time view of the reporter, cheap to clone out per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    /// Last successfully loaded status, `None` until the first load lands
    pub status: Option<SyncStatus>,
    /// Forced-sync lifecycle phase
    pub phase: SyncPhase,
}

impl StatusSnapshot {
    /// What the status bar should show, or `None` when there is nothing
    /// worth pixels: online, empty queue, no recent result.
    pub fn banner(&self) -> Option<StatusBanner> {
        let status = self.status.as_ref()?;
        let queued = status.queued_operations;

        if let SyncPhase::Displaying { result } = &self.phase {
            return Some(StatusBanner {
                headline: summarize_result(result),
                offer_sync: status.is_online && queued > 0,
            });
        }

        if self.phase == SyncPhase::Syncing {
            return Some(StatusBanner {
                headline: "Syncing...".to_string(),
                offer_sync: false,
            });
        }

        if !status.is_online {
            let headline = if queued == 0 {
                "Offline".to_string()
            } else {
                format!("Offline, {} change{} waiting", queued, plural(queued))
            };
            return Some(StatusBanner {
                headline,
                offer_sync: false,
            });
        }

        if queued > 0 {
            return Some(StatusBanner {
                headline: format!("{} change{} waiting to sync", queued, plural(queued)),
                offer_sync: true,
            });
        }

        None
    }

    pub fn is_syncing(&self) -> bool {
        self.phase == SyncPhase::Syncing
    }

    /// The displayed result, while one is on screen.
    pub fn last_result(&self) -> Option<&SyncResult> {
        match &self.phase {
            SyncPhase::Displaying { result } => Some(result),
            _ => None,
        }
    }
}

/// Renderable summary derived from a [`StatusSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBanner {
    /// One-line text for the status bar
    pub headline: String,
    /// Whether a "sync now" affordance makes sense right now
    pub offer_sync: bool,
}

fn summarize_result(result: &SyncResult) -> String {
    if result.total == 0 {
        if let Some(entry) = result.errors.first() {
            return format!("Sync failed: {}", entry.message);
        }
        return "Nothing to sync".to_string();
    }
    if result.is_clean() {
        return format!(
            "Synced {} change{}",
            result.success_count,
            plural(result.success_count)
        );
    }
    format!(
        "Synced {}, {} failed",
        result.success_count, result.failed_count
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Snapshot plus the bookkeeping that decides which follow-up task owns
/// the displayed result. `display_generation` moves forward every time a
/// cycle publishes its outcome, under the same lock as the phase.
#[derive(Debug, Default)]
struct ReporterState {
    snapshot: StatusSnapshot,
    display_generation: u64,
}

/// Polls a [`StatusProvider`] and drives forced syncs through a
/// [`SyncRunner`].
///
/// Must live inside a tokio runtime; [`SyncReporter::start`] spawns the
/// polling task on the current runtime.
pub struct SyncReporter {
    provider: Arc<dyn StatusProvider>,
    runner: Arc<dyn SyncRunner>,
    config: SyncConfig,
    state: Arc<RwLock<ReporterState>>,
    syncing: AtomicBool,
    poll_task: StdMutex<Option<JoinHandle<()>>>,
    follow_task: StdMutex<Option<JoinHandle<()>>>,
}

impl SyncReporter {
    pub fn new(
        provider: Arc<dyn StatusProvider>,
        runner: Arc<dyn SyncRunner>,
        config: SyncConfig,
    ) -> Self {
        Self {
            provider,
            runner,
            config,
            state: Arc::new(RwLock::new(ReporterState::default())),
            syncing: AtomicBool::new(false),
            poll_task: StdMutex::new(None),
            follow_task: StdMutex::new(None),
        }
    }

    /// Begin polling: one status load immediately, then one per poll
    /// interval. Calling `start` while already polling is a no-op.
    pub fn start(&self) {
        let mut slot = match self.poll_task.lock() {
            Ok(slot) => slot,
            Err(_) => return,
        };
        if slot.is_some() {
            tracing::warn!("status reporter already polling");
            return;
        }

        let state = Arc::clone(&self.state);
        let provider = Arc::clone(&self.provider);
        let period = self.config.poll_interval;

        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_status(&state, provider.as_ref()).await;
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "status polling started");
    }

    /// Cancel polling and any pending result follow-up. Idempotent.
    pub fn stop(&self) {
        if let Ok(mut slot) = self.poll_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
                tracing::debug!("status polling stopped");
            }
        }
        if let Ok(mut slot) = self.follow_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }

    /// Whether the polling task is currently running.
    pub fn is_polling(&self) -> bool {
        self.poll_task
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Current view of the pipeline.
    pub async fn snapshot(&self) -> StatusSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Run a forced sync in response to a user tap.
    ///
    /// Ignored while offline (per the last loaded status) and while a
    /// cycle is already running, so rapid taps cost exactly one cycle. A
    /// runner failure is converted into a displayable [`SyncResult`]
    /// rather than surfaced as an error.
    pub async fn handle_sync(&self) {
        let online = {
            let state = self.state.read().await;
            state
                .snapshot
                .status
                .as_ref()
                .map(|status| status.is_online)
                .unwrap_or(false)
        };
        if !online {
            tracing::debug!("sync request ignored, offline");
            return;
        }
        if self.syncing.swap(true, Ordering::SeqCst) {
            tracing::debug!("sync request ignored, cycle already running");
            return;
        }

        self.state.write().await.snapshot.phase = SyncPhase::Syncing;

        let progress: ProgressFn = Box::new(|current, total| {
            tracing::debug!(current, total, "sync progress");
        });
        let result = match self.runner.force_sync(Some(progress)).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "forced sync failed");
                SyncResult::failure(err.to_string())
            }
        };

        let generation = {
            let mut state = self.state.write().await;
            state.snapshot.phase = SyncPhase::Displaying { result };
            state.display_generation += 1;
            state.display_generation
        };
        self.syncing.store(false, Ordering::SeqCst);

        self.schedule_result_follow_up(generation);
    }

    /// After a cycle completes: reload status once the backend has had a
    /// beat to settle, then take the result off screen when its display
    /// window ends.
    fn schedule_result_follow_up(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let provider = Arc::clone(&self.provider);
        let settle = self.config.settle_delay;
        let linger = self.config.result_display.saturating_sub(settle);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            refresh_status(&state, provider.as_ref()).await;

            tokio::time::sleep(linger).await;
            let mut state = state.write().await;
            // A newer cycle owns the screen once the generation moves on;
            // clear only the result this follow-up was scheduled for.
            if state.display_generation == generation
                && matches!(state.snapshot.phase, SyncPhase::Displaying { .. })
            {
                state.snapshot.phase = SyncPhase::Idle;
            }
        });

        if let Ok(mut slot) = self.follow_task.lock() {
            if let Some(old) = slot.replace(handle) {
                old.abort();
            }
        }
    }
}

impl Drop for SyncReporter {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn refresh_status(state: &RwLock<ReporterState>, provider: &dyn StatusProvider) {
    match provider.load_status().await {
        Ok(status) => {
            state.write().await.snapshot.status = Some(status);
        }
        Err(err) => {
            tracing::warn!(error = %err, "status load failed, keeping last snapshot");
        }
    }
}
