//! Test doubles for the transport seam.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stocktake::offline::QueuedOperation;
use stocktake::sync::{SyncTransport, TransportError};
use uuid::Uuid;

/// Scriptable [`SyncTransport`] double.
///
/// Accepts everything by default. Individual barcodes can be scripted to
/// fail, or the whole backend can be flipped unreachable. Every submission
/// attempt lands in an ordered log, failed ones included.
pub struct TestTransport {
    outcomes: Mutex<HashMap<String, TransportError>>,
    unreachable: AtomicBool,
    delay: Duration,
    log: Mutex<Vec<Uuid>>,
}

impl TestTransport {
    pub fn accepting() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    /// A transport whose submissions take `delay` to complete.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(HashMap::new()),
            unreachable: AtomicBool::new(false),
            delay,
            log: Mutex::new(Vec::new()),
        })
    }

    /// Script a rejection for every submission carrying `barcode`.
    pub fn reject(&self, barcode: &str, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(barcode.to_string(), TransportError::rejected(message));
    }

    /// Script a connectivity failure for every submission carrying
    /// `barcode`.
    pub fn unreachable_on(&self, barcode: &str) {
        self.outcomes.lock().unwrap().insert(
            barcode.to_string(),
            TransportError::unreachable("connection refused"),
        );
    }

    /// Flip reachability of the whole backend.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Drop all scripted failures; everything is accepted again.
    pub fn accept_all(&self) {
        self.outcomes.lock().unwrap().clear();
        self.set_unreachable(false);
    }

    /// Operation ids in submission order, including failed attempts.
    pub fn submitted(&self) -> Vec<Uuid> {
        self.log.lock().unwrap().clone()
    }

    /// Number of submission attempts seen so far.
    pub fn submissions(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

#[async_trait]
impl SyncTransport for TestTransport {
    async fn submit(&self, item: &QueuedOperation) -> Result<(), TransportError> {
        self.log.lock().unwrap().push(item.operation.id());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(TransportError::unreachable("connection refused"));
        }

        let barcode = item.operation.barcode().unwrap_or_default().to_string();
        match self.outcomes.lock().unwrap().get(&barcode) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
