//! # Operation Queue
//!
//! Queues count operations for transmission when the backend is reachable.
//! Every accepted scan, adjustment, serial capture, and session close lands
//! here first; a sync cycle drains the queue in arrival order.
//!
//! ## Behavior
//!
//! - **FIFO**: operations are transmitted in the order they were accepted
//! - **Failure bookkeeping**: rejected operations stay queued with their
//!   attempt count and last error, eligible for the next cycle
//! - **Pruning**: stale failures can be dropped by age
//! - **Snapshots**: the full queue state round-trips through serde so hosts
//!   can persist it with their own storage layer
//!
//! ## Usage
//!
//! ```rust
//! use stocktake::offline::{CountOperation, OperationQueue};
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let queue = OperationQueue::new();
//!
//! let id = queue
//!     .enqueue(CountOperation::submit_count(
//!         Uuid::new_v4(),
//!         "4006381333931",
//!         3,
//!     ))
//!     .await;
//!
//! // A sync cycle drains pending operations...
//! for item in queue.pending().await {
//!     // transmit, then:
//!     queue.complete(&item.operation.id()).await;
//! }
//! # assert_eq!(queue.len().await, 0);
//! # let _ = id;
//! # });
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::SyncError;

/// Operations an operator can produce while counting offline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CountOperation {
    /// Submit a counted quantity for a barcode within a count session
    SubmitCount {
        /// Operation ID
        id: Uuid,
        /// Count session this tally belongs to
        session_id: Uuid,
        /// Scanned barcode
        barcode: String,
        /// Counted quantity
        quantity: u32,
    },
    /// Correct a previously submitted count
    AdjustCount {
        /// Operation ID
        id: Uuid,
        /// Count session this adjustment belongs to
        session_id: Uuid,
        /// Scanned barcode
        barcode: String,
        /// Corrected quantity
        quantity: u32,
        /// Optional supervisor note explaining the correction
        note: Option<String>,
    },
    /// Attach a captured serial number to a counted item
    AttachSerial {
        /// Operation ID
        id: Uuid,
        /// Count session the serial was captured in
        session_id: Uuid,
        /// Scanned barcode
        barcode: String,
        /// Captured serial number
        serial: String,
    },
    /// Mark a count session as finished
    CloseSession {
        /// Operation ID
        id: Uuid,
        /// Session being closed
        session_id: Uuid,
    },
}

impl CountOperation {
    /// Build a count submission with a fresh operation id.
    pub fn submit_count(session_id: Uuid, barcode: impl Into<String>, quantity: u32) -> Self {
        Self::SubmitCount {
            id: Uuid::new_v4(),
            session_id,
            barcode: barcode.into(),
            quantity,
        }
    }

    /// Build a count correction with a fresh operation id.
    pub fn adjust_count(
        session_id: Uuid,
        barcode: impl Into<String>,
        quantity: u32,
        note: Option<String>,
    ) -> Self {
        Self::AdjustCount {
            id: Uuid::new_v4(),
            session_id,
            barcode: barcode.into(),
            quantity,
            note,
        }
    }

    /// Build a serial attachment with a fresh operation id.
    pub fn attach_serial(
        session_id: Uuid,
        barcode: impl Into<String>,
        serial: impl Into<String>,
    ) -> Self {
        Self::AttachSerial {
            id: Uuid::new_v4(),
            session_id,
            barcode: barcode.into(),
            serial: serial.into(),
        }
    }

    /// Build a session close with a fresh operation id.
    pub fn close_session(session_id: Uuid) -> Self {
        Self::CloseSession {
            id: Uuid::new_v4(),
            session_id,
        }
    }

    /// Get operation ID
    pub fn id(&self) -> Uuid {
        match self {
            Self::SubmitCount { id, .. } => *id,
            Self::AdjustCount { id, .. } => *id,
            Self::AttachSerial { id, .. } => *id,
            Self::CloseSession { id, .. } => *id,
        }
    }

    /// Get the count session this operation belongs to
    pub fn session_id(&self) -> Uuid {
        match self {
            Self::SubmitCount { session_id, .. } => *session_id,
            Self::AdjustCount { session_id, .. } => *session_id,
            Self::AttachSerial { session_id, .. } => *session_id,
            Self::CloseSession { session_id, .. } => *session_id,
        }
    }

    /// Short operation name used in logs and wire payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SubmitCount { .. } => "submit_count",
            Self::AdjustCount { .. } => "adjust_count",
            Self::AttachSerial { .. } => "attach_serial",
            Self::CloseSession { .. } => "close_session",
        }
    }

    /// The barcode this operation concerns, when it has one.
    pub fn barcode(&self) -> Option<&str> {
        match self {
            Self::SubmitCount { barcode, .. } => Some(barcode),
            Self::AdjustCount { barcode, .. } => Some(barcode),
            Self::AttachSerial { barcode, .. } => Some(barcode),
            Self::CloseSession { .. } => None,
        }
    }
}

/// Transmission state of a queued operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OperationStatus {
    /// Waiting for its first transmission attempt
    Pending,
    /// Rejected at least once; still eligible for the next cycle
    Failed,
}

/// Queued operation with transmission metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedOperation {
    /// The operation itself
    pub operation: CountOperation,
    /// Current transmission state
    pub status: OperationStatus,
    /// Number of transmission attempts so far
    pub attempts: u32,
    /// When the operation was accepted into the queue
    pub queued_at: DateTime<Utc>,
    /// When the last transmission attempt happened
    pub last_attempt: Option<DateTime<Utc>>,
    /// Error message from the last failed attempt
    pub last_error: Option<String>,
}

impl QueuedOperation {
    fn new(operation: CountOperation) -> Self {
        Self {
            operation,
            status: OperationStatus::Pending,
            attempts: 0,
            queued_at: Utc::now(),
            last_attempt: None,
            last_error: None,
        }
    }
}

/// Queue statistics for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Total operations awaiting transmission
    pub total: usize,
    /// Operations never yet attempted
    pub pending: usize,
    /// Operations rejected on their last attempt
    pub failed: usize,
}

/// FIFO queue of count operations awaiting transmission.
#[derive(Debug, Default)]
pub struct OperationQueue {
    operations: RwLock<VecDeque<QueuedOperation>>,
}

impl OperationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            operations: RwLock::new(VecDeque::new()),
        }
    }

    /// Rebuild a queue from a previously taken snapshot.
    pub fn from_snapshot(items: Vec<QueuedOperation>) -> Self {
        Self {
            operations: RwLock::new(items.into()),
        }
    }

    /// Accept an operation into the queue. Returns its operation id.
    pub async fn enqueue(&self, operation: CountOperation) -> Uuid {
        let id = operation.id();
        tracing::debug!(kind = operation.kind(), %id, "queued offline operation");

        let mut operations = self.operations.write().await;
        operations.push_back(QueuedOperation::new(operation));
        id
    }

    /// All operations awaiting transmission, in arrival order. Failed
    /// operations are included; they stay eligible until completed or
    /// pruned.
    pub async fn pending(&self) -> Vec<QueuedOperation> {
        let operations = self.operations.read().await;
        operations.iter().cloned().collect()
    }

    /// Remove a transmitted operation from the queue.
    pub async fn complete(&self, operation_id: &Uuid) {
        let mut operations = self.operations.write().await;
        operations.retain(|item| item.operation.id() != *operation_id);
    }

    /// Record a failed transmission attempt. The operation stays queued.
    pub async fn fail(&self, operation_id: &Uuid, error: impl Into<String>) {
        let mut operations = self.operations.write().await;
        if let Some(item) = operations
            .iter_mut()
            .find(|item| item.operation.id() == *operation_id)
        {
            item.status = OperationStatus::Failed;
            item.attempts += 1;
            item.last_attempt = Some(Utc::now());
            item.last_error = Some(error.into());
        }
    }

    /// Number of operations awaiting transmission.
    pub async fn len(&self) -> usize {
        self.operations.read().await.len()
    }

    /// Whether the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.operations.read().await.is_empty()
    }

    /// Number of operations rejected on their last attempt.
    pub async fn count_failed(&self) -> usize {
        let operations = self.operations.read().await;
        operations
            .iter()
            .filter(|item| item.status == OperationStatus::Failed)
            .count()
    }

    /// Queue statistics for status displays.
    pub async fn stats(&self) -> QueueStats {
        let operations = self.operations.read().await;
        let failed = operations
            .iter()
            .filter(|item| item.status == OperationStatus::Failed)
            .count();

        QueueStats {
            total: operations.len(),
            pending: operations.len() - failed,
            failed,
        }
    }

    /// Drop failed operations older than `max_age`. Returns how many were
    /// removed. Pending operations are never pruned.
    pub async fn prune_failed(&self, max_age: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut operations = self.operations.write().await;

        let before = operations.len();
        operations.retain(|item| {
            item.status != OperationStatus::Failed || item.queued_at > cutoff
        });
        let removed = before - operations.len();

        if removed > 0 {
            tracing::info!(removed, "pruned stale failed operations");
        }
        removed
    }

    /// Remove all operations.
    pub async fn clear(&self) {
        self.operations.write().await.clear();
    }

    /// Clone the full queue state, for host-side persistence.
    pub async fn snapshot(&self) -> Vec<QueuedOperation> {
        self.operations.read().await.iter().cloned().collect()
    }

    /// Serialize the queue state to JSON for host-side persistence.
    pub async fn export_json(&self) -> Result<String, SyncError> {
        let snapshot = self.snapshot().await;
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuild a queue from JSON produced by [`export_json`].
    ///
    /// [`export_json`]: OperationQueue::export_json
    pub fn import_json(json: &str) -> Result<Self, SyncError> {
        let items: Vec<QueuedOperation> = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(items))
    }
}
