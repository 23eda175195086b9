//! Store abstraction
//!
//! The delivery worker only needs one operation from a destination, so the
//! trait is kept to `set` plus identification and metrics.

use async_trait::async_trait;

use crate::{MetricsSnapshot, Result};

/// A key-value store that accepts installed-apps records
///
/// Implementations must be safe to call concurrently from many workers.
/// A failed `set` is reported to the caller and never retried here.
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug {
    /// Human-readable name for logging (e.g. `memcache:idfa@127.0.0.1:33013`)
    fn name(&self) -> &str;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Point-in-time snapshot of this store's counters
    fn snapshot(&self) -> MetricsSnapshot;
}
