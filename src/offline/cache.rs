//! # Offline Item Cache
//!
//! In-memory cache of item master data so scanned barcodes still resolve to
//! a name while offline. The host fills it from catalog lookups; the status
//! provider reports its size.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A cached item master record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    /// Stock-keeping unit / barcode the record was looked up by
    pub sku: String,
    /// Display name for offline rendering
    pub name: String,
    /// When the record entered the cache
    pub cached_at: DateTime<Utc>,
}

impl ItemRecord {
    /// Create a record stamped with the current time.
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            cached_at: Utc::now(),
        }
    }
}

/// Shared item cache keyed by SKU.
#[derive(Debug, Default)]
pub struct ItemCache {
    entries: RwLock<HashMap<String, ItemRecord>>,
}

impl ItemCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or refresh a record.
    pub async fn put(&self, record: ItemRecord) {
        let mut entries = self.entries.write().await;
        entries.insert(record.sku.clone(), record);
    }

    /// Look up a record by SKU.
    pub async fn get(&self, sku: &str) -> Option<ItemRecord> {
        let entries = self.entries.read().await;
        entries.get(sku).cloned()
    }

    /// Number of cached records.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop records older than `max_age`. Returns how many were removed.
    pub async fn prune(&self, max_age: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, record| record.cached_at > cutoff);
        before - entries.len()
    }

    /// Remove all records.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
