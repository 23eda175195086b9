//! Connection pool for the memcached store
//!
//! A semaphore caps the number of live connections at `max_pool_size`; idle
//! connections wait in a stack and are reused most-recent first. Connections
//! are opened lazily on checkout.
//!
//! A checked-out connection goes back to the pool only through
//! `PooledConnection::release`. Dropping it closes the socket, which is what
//! happens after any error that may have left the stream out of sync.

use std::sync::Arc;

use parking_lot::Mutex;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::BufStream;
use tokio::net::TcpStream;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::timeout;

use super::MemcacheConfig;
use crate::{Result, SinkError, StoreMetrics};

/// Buffered memcached connection
pub(crate) type Connection = BufStream<TcpStream>;

/// Bounded pool of connections to one memcached endpoint
pub(crate) struct Pool {
    config: MemcacheConfig,
    permits: Semaphore,
    idle: Mutex<Vec<Connection>>,
    metrics: Arc<StoreMetrics>,
}

/// A connection checked out of the pool
pub(crate) struct PooledConnection<'a> {
    pool: &'a Pool,
    conn: Connection,
    permit: SemaphorePermit<'a>,
}

impl Pool {
    pub(crate) fn new(config: MemcacheConfig, metrics: Arc<StoreMetrics>) -> Self {
        let size = config.max_pool_size.max(1);
        Self {
            config,
            permits: Semaphore::new(size),
            idle: Mutex::new(Vec::with_capacity(size)),
            metrics,
        }
    }

    /// Wait for a free slot, then reuse an idle connection or open a new one
    pub(crate) async fn checkout(&self) -> Result<PooledConnection<'_>> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| SinkError::Closed)?;

        let idle = self.idle.lock().pop();
        let conn = match idle {
            Some(conn) => conn,
            None => self.connect().await?,
        };

        Ok(PooledConnection {
            pool: self,
            conn,
            permit,
        })
    }

    /// Number of idle connections
    pub(crate) fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Close all idle connections and refuse further checkouts
    pub(crate) fn close(&self) {
        self.permits.close();
        self.idle.lock().clear();
    }

    async fn connect(&self) -> Result<Connection> {
        let target = &self.config.address;

        let stream = match timeout(self.config.connect_timeout, TcpStream::connect(target)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(SinkError::Connection {
                    target: target.clone(),
                    source: e,
                });
            }
            Err(_) => return Err(SinkError::timeout(target.clone(), "connect")),
        };

        // Set TCP_NODELAY for lower latency (non-fatal if it fails)
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(
                target_addr = %target,
                error = %e,
                "failed to set TCP_NODELAY, continuing with default buffering"
            );
        }

        if self.config.tcp_keepalive {
            let sock_ref = SockRef::from(&stream);
            let keepalive = TcpKeepalive::new().with_time(self.config.tcp_keepalive_interval);

            #[cfg(target_os = "linux")]
            let keepalive = keepalive.with_interval(self.config.tcp_keepalive_interval);

            if let Err(e) = sock_ref.set_tcp_keepalive(&keepalive) {
                tracing::debug!(
                    target_addr = %target,
                    error = %e,
                    "failed to set TCP keep-alive, continuing without keep-alive"
                );
            }
        }

        self.metrics.connection_opened();
        tracing::debug!(target_addr = %target, "connected to memcached");

        Ok(BufStream::new(stream))
    }
}

impl PooledConnection<'_> {
    /// Access the underlying stream
    pub(crate) fn stream(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the connection to the pool for reuse
    pub(crate) fn release(self) {
        let Self { pool, conn, permit } = self;
        // Idle push happens before the slot is freed
        pool.idle.lock().push(conn);
        drop(permit);
    }
}
