//! # Sync Transport
//!
//! The seam between the sync cycle and the backend. The service only cares
//! about one question per operation: did the backend accept it, reject it,
//! or could we not reach the backend at all? Connectivity failures abort
//! the cycle; rejections are recorded and the cycle moves on.

use async_trait::async_trait;
use thiserror::Error;

use crate::offline::QueuedOperation;

/// How a single submission went wrong.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The backend could not be reached. Retrying the rest of the queue
    /// right now would just fail the same way.
    #[error("backend unreachable: {message}")]
    Unreachable { message: String },

    /// The backend answered and said no. Specific to this operation, so
    /// the cycle continues with the next one.
    #[error("rejected by backend: {message}")]
    Rejected { message: String },
}

impl TransportError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Whether this failure means the backend is unreachable for every
    /// operation, not just the one that was submitted.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// Delivers queued operations to the backend, one at a time.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Submit a single queued operation.
    async fn submit(&self, item: &QueuedOperation) -> Result<(), TransportError>;
}
