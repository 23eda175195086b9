//! Memory store - keeps records in an in-process map
//!
//! Used by tests and by dry local runs that want to inspect what would have
//! been written. A store can be switched into a failing mode to simulate an
//! unreachable endpoint.
//!
//! # Example
//!
//! ```ignore
//! use appsload_sinks::{MemoryStore, Store};
//!
//! let store = MemoryStore::new("idfa");
//! store.set("idfa:123", &payload).await?;
//! assert_eq!(store.get("idfa:123").as_deref(), Some(&payload[..]));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::{MetricsSnapshot, Result, SinkError, Store, StoreMetrics};

/// In-process key-value store
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    entries: Mutex<HashMap<String, Bytes>>,
    failing: AtomicBool,
    metrics: StoreMetrics,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: format!("memory:{}", name.into()),
            entries: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            metrics: StoreMetrics::new(),
        }
    }

    /// Create a store that rejects every set
    pub fn failing(name: impl Into<String>) -> Self {
        let store = Self::new(name);
        store.set_failing(true);
        store
    }

    /// Switch failure simulation on or off
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Get the stored value for a key
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.lock().get(key).cloned()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.failing.load(Ordering::Relaxed) {
            self.metrics.set_failed();
            return Err(SinkError::Closed);
        }

        self.entries
            .lock()
            .insert(key.to_string(), Bytes::copy_from_slice(value));
        self.metrics.set_ok(value.len() as u64);
        Ok(())
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
