//! Crate Error Types
//!
//! Error types shared by the scan/sync pipeline. The split mirrors how the
//! pipeline degrades: status-load failures are swallowed and logged by the
//! reporter, sync failures are converted into a displayable outcome, and
//! nothing here is fatal to the host application.
//!
//! # Error Categories
//!
//! - `Sync` - a forced synchronization could not run or collapsed entirely
//! - `StatusLoad` - the status provider could not produce a snapshot
//! - `SyncInProgress` - a sync cycle is already in flight
//! - `Offline` - sync was requested while the network is down
//! - `Serialization` - queue snapshot import/export failures
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can cross task boundaries freely.

use thiserror::Error;

/// Errors produced by the sync pipeline.
#[derive(Debug, Error, Clone)]
pub enum SyncError {
    /// A forced sync failed as a whole. The message is shown to the user
    /// verbatim, so it carries no prefix.
    #[error("{message}")]
    Sync {
        /// Human-readable failure message
        message: String,
    },

    /// The status provider failed to produce a snapshot.
    #[error("status load failed: {message}")]
    StatusLoad {
        /// Human-readable failure message
        message: String,
    },

    /// A sync cycle is already running; the new request was rejected.
    #[error("sync already in progress")]
    SyncInProgress,

    /// Sync was requested while the network monitor reports offline.
    #[error("network is offline")]
    Offline,

    /// Queue snapshot serialization or deserialization failed.
    #[error("serialization error: {message}")]
    Serialization {
        /// Human-readable failure message
        message: String,
    },
}

impl SyncError {
    /// Create a new whole-sync failure
    pub fn sync(message: impl Into<String>) -> Self {
        Self::Sync {
            message: message.into(),
        }
    }

    /// Create a new status-load failure
    pub fn status_load(message: impl Into<String>) -> Self {
        Self::StatusLoad {
            message: message.into(),
        }
    }

    /// Create a new serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
