//! Memcached Store - pooled text-protocol client
//!
//! Writes installed-apps records to one memcached endpoint.
//!
//! # Protocol
//!
//! Uses the memcached text protocol `set` command with no flags and no
//! expiry:
//! ```text
//! set <key> 0 0 <bytes>\r\n
//! <payload>\r\n
//! ```
//! and expects `STORED\r\n`. `NOT_STORED` and any error reply
//! (`ERROR`, `CLIENT_ERROR ...`, `SERVER_ERROR ...`) fail the write.
//!
//! # Pooling
//!
//! Up to `max_pool_size` connections are opened lazily and shared by all
//! workers writing to this endpoint. Writes are not retried; a connection
//! that fails mid-exchange is discarded.
//!
//! # Example
//!
//! ```ignore
//! let config = MemcacheConfig::new("127.0.0.1:33013").with_max_pool_size(8);
//! let store = MemcacheStore::new("idfa", config);
//!
//! store.set("idfa:1rfw452y52g2gq4g", &payload).await?;
//! ```

mod pool;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::time::timeout;

use crate::{MetricsSnapshot, Result, SinkError, Store, StoreMetrics};
use pool::{Connection, Pool};

/// Longest key memcached accepts
pub const MAX_KEY_LENGTH: usize = 250;

/// Default number of pooled connections per endpoint
pub const DEFAULT_MAX_POOL_SIZE: usize = 8;

/// Configuration for one memcached endpoint
#[derive(Debug, Clone)]
pub struct MemcacheConfig {
    /// Endpoint address (host:port)
    pub address: String,

    /// Maximum number of pooled connections
    pub max_pool_size: usize,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Timeout for one set exchange (write + reply)
    pub io_timeout: Duration,

    /// TCP keep-alive enabled
    pub tcp_keepalive: bool,

    /// TCP keep-alive interval (only used if tcp_keepalive is true)
    pub tcp_keepalive_interval: Duration,
}

impl MemcacheConfig {
    /// Create a config for `address` with default settings
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(5),
            tcp_keepalive: true,
            tcp_keepalive_interval: Duration::from_secs(30),
        }
    }

    /// Set maximum pool size
    #[must_use]
    pub fn with_max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Set connection timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set per-operation timeout
    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Enable or disable TCP keep-alive
    #[must_use]
    pub fn with_tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }
}

/// Pooled memcached client for one endpoint
pub struct MemcacheStore {
    /// Name for logging (`memcache:<device>@<address>`)
    name: String,

    /// Endpoint address
    address: String,

    /// Per-operation timeout
    io_timeout: Duration,

    /// Connection pool
    pool: Pool,

    /// Metrics for this store
    metrics: Arc<StoreMetrics>,
}

impl MemcacheStore {
    /// Create a store for one device type
    ///
    /// No connection is opened until the first `set`.
    pub fn new(device: &str, config: MemcacheConfig) -> Self {
        let metrics = Arc::new(StoreMetrics::new());
        Self {
            name: format!("memcache:{}@{}", device, config.address),
            address: config.address.clone(),
            io_timeout: config.io_timeout,
            pool: Pool::new(config, Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Get the endpoint address
    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Number of idle pooled connections
    #[inline]
    pub fn idle_connections(&self) -> usize {
        self.pool.idle_count()
    }

    /// Close idle connections; later sets fail with `SinkError::Closed`
    pub fn close(&self) {
        self.pool.close();
    }

    async fn try_set(&self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;

        let mut conn = self.pool.checkout().await?;

        let result = match timeout(self.io_timeout, exchange(conn.stream(), key, value)).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::timeout(self.address.clone(), "set")),
        };

        match &result {
            Ok(()) => conn.release(),
            Err(e) if e.keeps_connection() => conn.release(),
            // Dropping closes the connection
            Err(_) => drop(conn),
        }

        result
    }
}

#[async_trait]
impl Store for MemcacheStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let result = self.try_set(key, value).await;
        match result {
            Ok(()) => self.metrics.set_ok(value.len() as u64),
            Err(_) => self.metrics.set_failed(),
        }
        result
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl std::fmt::Debug for MemcacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcacheStore")
            .field("name", &self.name)
            .field("idle", &self.pool.idle_count())
            .finish()
    }
}

/// Send one `set` command and read its reply
async fn exchange(conn: &mut Connection, key: &str, value: &[u8]) -> Result<()> {
    let header = format!("set {} 0 0 {}\r\n", key, value.len());
    conn.write_all(header.as_bytes()).await?;
    conn.write_all(value).await?;
    conn.write_all(b"\r\n").await?;
    conn.flush().await?;

    let mut reply = String::new();
    if conn.read_line(&mut reply).await? == 0 {
        return Err(SinkError::protocol("connection closed before reply"));
    }

    parse_reply(reply.trim_end(), key)
}

/// Interpret a `set` reply line (without the trailing CRLF)
fn parse_reply(reply: &str, key: &str) -> Result<()> {
    match reply {
        "STORED" => Ok(()),
        "NOT_STORED" => Err(SinkError::NotStored(key.to_string())),
        other => Err(SinkError::protocol(other)),
    }
}

/// Check that a key is acceptable to memcached
///
/// Keys must be 1..=250 bytes with no whitespace or control bytes.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SinkError::invalid_key(key, "empty"));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(SinkError::invalid_key(key, "longer than 250 bytes"));
    }
    if key.bytes().any(|b| b <= b' ' || b == 0x7f) {
        return Err(SinkError::invalid_key(
            key,
            "contains whitespace or control bytes",
        ));
    }
    Ok(())
}
