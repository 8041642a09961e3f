//! Stocktake - Offline-First Inventory Counting Core
//!
//! Stocktake is the sync and scan-handling core for warehouse inventory
//! counting devices: barcode scans are accepted or rejected locally, every
//! accepted change is queued while offline, and the queue drains to the
//! backend whenever connectivity allows.
//!
//! # Overview
//!
//! This library provides the pieces a counting app needs between the
//! scanner and the backend:
//!
//! - Duplicate-scan suppression with a short re-scan window
//! - An offline FIFO queue for count operations, with failure bookkeeping
//! - A sync service that drains the queue one operation at a time
//! - A status reporter that polls for UI display and runs forced syncs
//! - Background draining when connectivity returns
//!
//! # Module Structure
//!
//! - **`scan`** - Scan acceptance
//!   - Duplicate guard with a sliding re-scan window
//!
//! - **`offline`** - Local state while disconnected
//!   - FIFO operation queue with attempt tracking and JSON snapshots
//!   - Item cache backing offline lookups
//!
//! - **`sync`** - Getting queued work to the backend
//!   - `SyncService` (cycle execution), `SyncReporter` (UI-facing status)
//!   - `SyncTransport` seam with an HTTP implementation
//!   - Network monitor fed by the host platform
//!
//! - **`error`** - Error types shared across the pipeline
//!
//! # Usage
//!
//! ## Guarding scans
//!
//! ```rust
//! use stocktake::scan::ScanDeduplicator;
//!
//! let mut guard = ScanDeduplicator::new();
//!
//! let check = guard.check("4006381333931");
//! if !check.is_duplicate {
//!     guard.record("4006381333931");
//!     // accept the scan
//! }
//! ```
//!
//! ## Wiring the sync pipeline
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stocktake::offline::{CountOperation, ItemCache, OperationQueue};
//! use stocktake::scan::ScanDeduplicator;
//! use stocktake::sync::{
//!     HttpTransport, NetworkMonitor, SyncConfig, SyncReporter, SyncService,
//! };
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let config = SyncConfig::default();
//! let queue = Arc::new(OperationQueue::new());
//! let cache = Arc::new(ItemCache::new());
//! let monitor = NetworkMonitor::default();
//! let transport = Arc::new(HttpTransport::new("https://inventory.example.com"));
//!
//! let service = Arc::new(SyncService::new(
//!     config.clone(),
//!     Arc::clone(&queue),
//!     cache,
//!     monitor.clone(),
//!     transport,
//! ));
//!
//! // Counting works regardless of connectivity. Scans pass the duplicate
//! // guard, then queue locally.
//! let session = Uuid::new_v4();
//! let mut guard = ScanDeduplicator::with_window(config.dedup_window);
//! if !guard.check("4006381333931").is_duplicate {
//!     guard.record("4006381333931");
//!     queue
//!         .enqueue(CountOperation::submit_count(session, "4006381333931", 12))
//!         .await;
//! }
//!
//! // Drain in the background, report status to the UI.
//! let auto_sync = service.spawn_auto_sync();
//! let reporter = SyncReporter::new(service.clone(), service.clone(), config);
//! reporter.start();
//! # let _ = auto_sync;
//! # }
//! ```
//!
//! # Thread Safety
//!
//! All shared state lives behind `Arc<RwLock<>>` or atomics; the queue,
//! cache, monitor, service, and reporter can be shared freely across
//! tasks. Background work runs as tokio tasks whose handles abort on drop,
//! so nothing outlives its owner.
//!
//! # Error Handling
//!
//! Sync-path failures never take the pipeline down:
//!
//! - Status-load failures are logged and swallowed; the last good snapshot
//!   stays on screen
//! - Sync failures become displayable results instead of propagating
//! - Custom error types live in [`error`]

/// Crate error types
pub mod error;

/// Offline operation queue and item cache
pub mod offline;

/// Scan acceptance guards
pub mod scan;

/// Sync service, status reporter, and transport
pub mod sync;
