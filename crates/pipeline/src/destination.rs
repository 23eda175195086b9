//! Destination handle for record delivery
//!
//! `Destination` pairs a routing-table id with the store that receives the
//! records routed to it, so workers can write without knowing the concrete
//! store type.

use std::sync::Arc;

use appsload_routing::DestinationId;
use appsload_sinks::Store;

/// Handle to one store endpoint
///
/// Cheap to clone; the store itself is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Index in the routing table
    id: DestinationId,

    /// Human-readable name for logging
    name: String,

    /// Store receiving the records
    store: Arc<dyn Store>,
}

impl Destination {
    /// Create a new destination handle
    #[inline]
    pub fn new(id: DestinationId, name: impl Into<String>, store: Arc<dyn Store>) -> Self {
        Self {
            id,
            name: name.into(),
            store,
        }
    }

    /// Get the destination id
    #[inline]
    pub fn id(&self) -> DestinationId {
        self.id
    }

    /// Get the destination name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the store
    #[inline]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
