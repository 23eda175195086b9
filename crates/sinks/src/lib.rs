//! Appsload - Sinks
//!
//! Key-value store clients that receive encoded installed-apps records.
//!
//! # Architecture
//!
//! Every destination implements the `Store` trait: a single `set(key, value)`
//! call per record. Stores are shared behind `Arc<dyn Store>` by all delivery
//! workers, so each implementation handles its own concurrency.
//!
//! ```text
//! [Delivery Worker] --set(key, payload)--> [Store] --> [memcached]
//! ```
//!
//! # Available Stores
//!
//! | Store | Purpose |
//! |-------|---------|
//! | `memcache` | Pooled memcached text-protocol client |
//! | `memory` | In-process map (tests, local runs) |
//!
//! # Example
//!
//! ```ignore
//! use appsload_sinks::{MemcacheConfig, MemcacheStore, Store};
//!
//! let store = MemcacheStore::new("idfa", MemcacheConfig::new("127.0.0.1:33013"));
//! store.set("idfa:123", &payload).await?;
//! ```

/// Memcached store - pooled text-protocol client
pub mod memcache;

/// Memory store - in-process map
pub mod memory;

/// Common types shared by all stores (errors, metrics)
mod common;

/// The `Store` trait
mod store;

pub use common::{MetricsSnapshot, Result, SinkError, StoreMetrics};
pub use memcache::{MemcacheConfig, MemcacheStore};
pub use memory::MemoryStore;
pub use store::Store;
