//! # Sync Status Snapshots
//!
//! Read-only snapshots of the pipeline state and the outcome of a forced
//! sync. Both are plain data: the status provider assembles `SyncStatus`
//! each poll, and a sync cycle produces one transient `SyncResult` that the
//! reporter displays for a few seconds and then discards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of connectivity and queue state, assembled per poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncStatus {
    /// Whether the network monitor currently reports connectivity
    pub is_online: bool,
    /// Operations waiting in the offline queue
    pub queued_operations: usize,
    /// When the last sync cycle completed, if any
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Number of item records cached for offline display
    pub cache_size: usize,
    /// Whether a sync would transmit anything
    pub needs_sync: bool,
}

/// One failed operation inside a sync cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncErrorEntry {
    /// Failing operation, or `None` when the whole sync collapsed
    pub op_id: Option<Uuid>,
    /// Human-readable failure message
    pub message: String,
}

impl SyncErrorEntry {
    /// An entry for a single rejected operation.
    pub fn for_operation(op_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            op_id: Some(op_id),
            message: message.into(),
        }
    }

    /// An entry describing a whole-sync failure.
    pub fn whole_sync(message: impl Into<String>) -> Self {
        Self {
            op_id: None,
            message: message.into(),
        }
    }
}

/// Outcome of a forced sync cycle.
///
/// `success_count + failed_count` never exceeds `total`; it falls short when
/// a connectivity failure aborts the cycle and leaves operations
/// unattempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncResult {
    /// Operations transmitted and accepted
    pub success_count: usize,
    /// Operations attempted and rejected
    pub failed_count: usize,
    /// Operations eligible when the cycle started
    pub total: usize,
    /// Per-operation failures, in attempt order
    pub errors: Vec<SyncErrorEntry>,
}

impl SyncResult {
    /// Outcome of a cycle that had nothing to transmit.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Synthesized outcome for a sync that failed before accomplishing
    /// anything. Always displayable: zero counts plus a single error entry
    /// carrying the failure message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success_count: 0,
            failed_count: 0,
            total: 0,
            errors: vec![SyncErrorEntry::whole_sync(message)],
        }
    }

    /// Whether every attempted operation went through.
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && self.errors.is_empty()
    }

    /// Operations actually attempted during the cycle.
    pub fn attempted(&self) -> usize {
        self.success_count + self.failed_count
    }
}
