//! # Sync Pipeline
//!
//! Everything between the offline queue and the inventory backend:
//!
//! - [`SyncService`] drains the queue through a [`SyncTransport`], one
//!   operation at a time, and answers status queries
//! - [`SyncReporter`] polls that status for the UI, runs forced syncs, and
//!   owns the short-lived result display
//! - [`NetworkMonitor`] holds the connectivity state the platform feeds in
//! - [`HttpTransport`] is the production transport; tests swap in fakes
//!   through the [`SyncTransport`] seam
//!
//! The reporter talks to the service only through the [`StatusProvider`]
//! and [`SyncRunner`] traits, so either side can be replaced independently.

pub mod http;
pub mod metrics;
pub mod network_monitor;
pub mod reporter;
pub mod service;
pub mod status;
pub mod transport;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SyncError;

pub use http::HttpTransport;
pub use metrics::SyncMetrics;
pub use network_monitor::{Connectivity, NetworkMonitor};
pub use reporter::{StatusBanner, StatusSnapshot, SyncPhase, SyncReporter};
pub use service::{AutoSyncTask, SyncService};
pub use status::{SyncErrorEntry, SyncResult, SyncStatus};
pub use transport::{SyncTransport, TransportError};

/// Timing knobs for the sync pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Window during which a repeat of the same barcode is dropped
    pub dedup_window: Duration,
    /// How often the reporter refreshes its status snapshot
    pub poll_interval: Duration,
    /// Pause after a forced sync before reloading status, letting
    /// backend-side counters settle
    pub settle_delay: Duration,
    /// How long a sync result stays on screen after the cycle completes
    pub result_display: Duration,
    /// How often the background task checks for a drainable backlog
    pub auto_sync_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dedup_window: Duration::from_millis(3000),
            poll_interval: Duration::from_millis(5000),
            settle_delay: Duration::from_millis(1000),
            result_display: Duration::from_millis(3000),
            auto_sync_interval: Duration::from_secs(30),
        }
    }
}

/// Progress callback invoked once per attempted operation with
/// `(current, total)`, 1-based.
pub type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;

/// Source of [`SyncStatus`] snapshots.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    /// Assemble the current pipeline status.
    ///
    /// Failures here are non-fatal by contract: callers keep whatever
    /// status they last saw.
    async fn load_status(&self) -> Result<SyncStatus, SyncError>;
}

/// Executes forced sync cycles.
#[async_trait]
pub trait SyncRunner: Send + Sync {
    /// Drain the queue now, reporting per-operation progress through
    /// `progress` when provided.
    async fn force_sync(&self, progress: Option<ProgressFn>) -> Result<SyncResult, SyncError>;
}
