//! Common types and utilities for stores
//!
//! Shared functionality across all store types.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Metrics shared by all store types
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Successful set operations
    pub sets_ok: AtomicU64,

    /// Failed set operations
    pub sets_failed: AtomicU64,

    /// Payload bytes written by successful sets
    pub bytes_written: AtomicU64,

    /// Connections opened (network stores only)
    pub connections_opened: AtomicU64,
}

impl StoreMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            sets_ok: AtomicU64::new(0),
            sets_failed: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            connections_opened: AtomicU64::new(0),
        }
    }

    /// Record a successful set
    #[inline]
    pub fn set_ok(&self, bytes: u64) {
        self.sets_ok.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed set
    #[inline]
    pub fn set_failed(&self) {
        self.sets_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a newly opened connection
    #[inline]
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sets_ok: self.sets_ok.load(Ordering::Relaxed),
            sets_failed: self.sets_failed.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of store metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub sets_ok: u64,
    pub sets_failed: u64,
    pub bytes_written: u64,
    pub connections_opened: u64,
}

/// Common store errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Could not connect to the store
    #[error("connection failed to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation did not complete in time
    #[error("{operation} to {target} timed out")]
    Timeout {
        target: String,
        operation: &'static str,
    },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key is not acceptable to the store
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Store declined the write
    #[error("value not stored for key '{0}'")]
    NotStored(String),

    /// Unexpected reply from the store
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Store client has been shut down
    #[error("store closed")]
    Closed,
}

impl SinkError {
    /// Create a timeout error
    pub fn timeout(target: impl Into<String>, operation: &'static str) -> Self {
        Self::Timeout {
            target: target.into(),
            operation,
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Check if the connection that produced this error can be reused
    ///
    /// Only replies that were read completely leave the stream in sync.
    pub fn keeps_connection(&self) -> bool {
        matches!(self, Self::NotStored(_) | Self::InvalidKey { .. })
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
