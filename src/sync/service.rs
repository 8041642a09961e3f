//! # Sync Service
//!
//! Owns the sync cycle: drain the offline queue through the transport, one
//! operation at a time in arrival order, and keep the bookkeeping other
//! components read back as [`SyncStatus`].
//!
//! ## Cycle semantics
//!
//! - A rejected operation is recorded and the cycle moves on to the next
//! - An unreachable backend aborts the cycle; unattempted operations keep
//!   their pending state untouched
//! - Completed operations leave the queue immediately, so a crash mid-cycle
//!   never replays what the backend already accepted
//! - At most one cycle runs at a time; overlapping requests are rejected
//!   with [`SyncError::SyncInProgress`]
//!
//! ## Background draining
//!
//! [`SyncService::spawn_auto_sync`] starts a loop that drains the backlog
//! whenever connectivity and queued work line up, which covers the
//! reconnect-after-offline case without the UI doing anything. The returned
//! [`AutoSyncTask`] aborts the loop when dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::metrics::SyncMetrics;
use super::network_monitor::NetworkMonitor;
use super::status::{SyncErrorEntry, SyncResult, SyncStatus};
use super::transport::SyncTransport;
use super::{ProgressFn, StatusProvider, SyncConfig, SyncRunner};
use crate::error::SyncError;
use crate::offline::{ItemCache, OperationQueue};

/// Drains the offline queue and answers status queries.
///
/// All collaborators are injected, so hosts and tests decide what the
/// service talks to.
pub struct SyncService {
    config: SyncConfig,
    queue: Arc<OperationQueue>,
    cache: Arc<ItemCache>,
    monitor: NetworkMonitor,
    transport: Arc<dyn SyncTransport>,
    last_sync_at: RwLock<Option<DateTime<Utc>>>,
    metrics: RwLock<SyncMetrics>,
    in_flight: AtomicBool,
}

impl SyncService {
    pub fn new(
        config: SyncConfig,
        queue: Arc<OperationQueue>,
        cache: Arc<ItemCache>,
        monitor: NetworkMonitor,
        transport: Arc<dyn SyncTransport>,
    ) -> Self {
        Self {
            config,
            queue,
            cache,
            monitor,
            transport,
            last_sync_at: RwLock::new(None),
            metrics: RwLock::new(SyncMetrics::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one sync cycle now.
    ///
    /// Returns [`SyncError::Offline`] without touching the queue when the
    /// network monitor reports no connectivity, and
    /// [`SyncError::SyncInProgress`] when a cycle is already running.
    pub async fn force_sync(
        &self,
        progress: Option<ProgressFn>,
    ) -> Result<SyncResult, SyncError> {
        if !self.monitor.is_online().await {
            return Err(SyncError::Offline);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SyncError::SyncInProgress);
        }

        let result = self.run_cycle(progress).await;
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(result)
    }

    async fn run_cycle(&self, mut progress: Option<ProgressFn>) -> SyncResult {
        let items = self.queue.pending().await;
        let total = items.len();
        self.metrics.write().await.record_cycle_start();
        tracing::debug!(total, "sync cycle started");

        let mut success_count = 0usize;
        let mut failed_count = 0usize;
        let mut errors = Vec::new();
        let mut aborted = false;

        for (index, item) in items.iter().enumerate() {
            if let Some(callback) = progress.as_mut() {
                callback(index + 1, total);
            }

            let op_id = item.operation.id();
            match self.transport.submit(item).await {
                Ok(()) => {
                    self.queue.complete(&op_id).await;
                    success_count += 1;
                }
                Err(err) => {
                    let message = err.to_string();
                    self.queue.fail(&op_id, message.clone()).await;
                    failed_count += 1;
                    errors.push(SyncErrorEntry::for_operation(op_id, message.clone()));

                    if err.is_connectivity() {
                        tracing::warn!(
                            %op_id,
                            error = %message,
                            "backend unreachable, aborting cycle"
                        );
                        aborted = true;
                        break;
                    }
                    tracing::debug!(%op_id, error = %message, "operation rejected");
                }
            }
        }

        *self.last_sync_at.write().await = Some(Utc::now());
        {
            let mut metrics = self.metrics.write().await;
            if aborted {
                metrics.record_cycle_aborted(success_count as u64, failed_count as u64);
            } else {
                metrics.record_cycle_completed(success_count as u64, failed_count as u64);
            }
        }

        tracing::info!(
            success = success_count,
            failed = failed_count,
            total,
            aborted,
            "sync cycle finished"
        );

        SyncResult {
            success_count,
            failed_count,
            total,
            errors,
        }
    }

    /// Assemble the current pipeline status.
    pub async fn load_status(&self) -> Result<SyncStatus, SyncError> {
        let queued = self.queue.len().await;
        Ok(SyncStatus {
            is_online: self.monitor.is_online().await,
            queued_operations: queued,
            last_sync_at: *self.last_sync_at.read().await,
            cache_size: self.cache.len().await,
            needs_sync: queued > 0,
        })
    }

    /// Whether a cycle is running right now.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Snapshot of the cycle metrics.
    pub async fn metrics(&self) -> SyncMetrics {
        self.metrics.read().await.clone()
    }

    /// Start the background loop that drains the backlog whenever the
    /// device is online and operations are queued. The loop stops when the
    /// returned task handle is aborted or dropped.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> AutoSyncTask {
        let service = Arc::clone(self);
        let period = self.config.auto_sync_interval;

        let handle = tokio::spawn(async move {
            tracing::info!(interval_secs = period.as_secs(), "auto-sync loop started");
            let mut interval = tokio::time::interval(period);
            let mut was_online = service.monitor.is_online().await;

            loop {
                interval.tick().await;

                let online = service.monitor.is_online().await;
                if online && !was_online {
                    tracing::info!("connectivity restored, checking for backlog");
                }
                was_online = online;

                if !online || service.queue.is_empty().await {
                    continue;
                }

                match service.force_sync(None).await {
                    Ok(result) => {
                        tracing::debug!(
                            success = result.success_count,
                            failed = result.failed_count,
                            "auto-sync cycle finished"
                        );
                    }
                    Err(SyncError::SyncInProgress) => {
                        tracing::debug!("auto-sync skipped, cycle already running");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "auto-sync cycle failed");
                    }
                }
            }
        });

        AutoSyncTask { handle }
    }
}

#[async_trait]
impl StatusProvider for SyncService {
    async fn load_status(&self) -> Result<SyncStatus, SyncError> {
        SyncService::load_status(self).await
    }
}

#[async_trait]
impl SyncRunner for SyncService {
    async fn force_sync(&self, progress: Option<ProgressFn>) -> Result<SyncResult, SyncError> {
        SyncService::force_sync(self, progress).await
    }
}

/// Handle to the background auto-sync loop.
pub struct AutoSyncTask {
    handle: JoinHandle<()>,
}

impl AutoSyncTask {
    /// Stop the loop immediately.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the loop has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoSyncTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
