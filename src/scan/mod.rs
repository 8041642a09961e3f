//! # Barcode Scan Handling
//!
//! Scan-side logic that runs before anything touches the offline queue.
//! Currently this is the duplicate-read guard; barcode lookup and capture
//! UI belong to the host application.

pub mod dedup;

pub use dedup::{DuplicateCheck, ScanDeduplicator};
