//! # Offline-First Storage
//!
//! Keeps count work usable with no connectivity: accepted scans become
//! queued operations that wait for transmission, and item details stay
//! readable from a local cache.
//!
//! ## Key Components
//!
//! - `queue.rs`: FIFO operation queue with failure bookkeeping
//! - `cache.rs`: in-memory item cache for offline display
//!
//! The queue owns no storage engine. Hosts that persist it across restarts
//! use the snapshot/JSON helpers and their own storage layer.

pub mod cache;
pub mod queue;

pub use cache::{ItemCache, ItemRecord};
pub use queue::{CountOperation, OperationQueue, OperationStatus, QueueStats, QueuedOperation};
