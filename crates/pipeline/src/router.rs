//! Router - device type to destination lookup
//!
//! The `Router` owns the immutable `RoutingTable` plus the store registered
//! for every destination in it. It is built once at startup and shared by
//! all line tasks as `Arc<Router>`.

use std::sync::Arc;

use appsload_protocol::DeviceType;
use appsload_routing::{DestinationId, RoutingError, RoutingTable, RoutingTableBuilder};
use appsload_sinks::Store;

use crate::{Destination, PipelineError, Result};

/// Device router
///
/// # Design
///
/// - O(1) tag lookup in the pre-compiled `RoutingTable`
/// - O(1) destination lookup in a `Vec` indexed by `DestinationId`
/// - Read-only after construction, so no locking on the hot path
///
/// # Example
///
/// ```ignore
/// let router = Router::from_stores([
///     ("idfa", Arc::new(MemcacheStore::new("idfa", idfa_config)) as Arc<dyn Store>),
///     ("gaid", Arc::new(MemcacheStore::new("gaid", gaid_config))),
/// ])?;
///
/// let destination = router.route(b"idfa")?;
/// destination.store().set(&key, &payload).await?;
/// ```
#[derive(Debug)]
pub struct Router {
    /// Pre-compiled tag → destination id table
    routing_table: RoutingTable,

    /// Registered destinations indexed by DestinationId
    destinations: Vec<Option<Destination>>,
}

impl Router {
    /// Create a router with no stores registered yet
    pub fn new(routing_table: RoutingTable) -> Self {
        let count = routing_table.destination_count();
        let mut destinations = Vec::with_capacity(count);
        destinations.resize_with(count, || None);

        Self {
            routing_table,
            destinations,
        }
    }

    /// Build a router with one store per device type
    ///
    /// Each store becomes a destination named after `Store::name()`. Stores
    /// with the same name share one destination.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Routing` if a device type appears twice or if
    /// no stores were given.
    pub fn from_stores<T, I>(stores: I) -> Result<Self>
    where
        T: Into<DeviceType>,
        I: IntoIterator<Item = (T, Arc<dyn Store>)>,
    {
        let mut builder = RoutingTableBuilder::new();
        let mut registered = Vec::new();

        for (device_type, store) in stores {
            let device_type = device_type.into();
            let name = store.name().to_string();
            builder.register_destination(name.clone());
            let id = builder.add_route(device_type, &name)?;
            registered.push((id, store));
        }

        let mut router = Self::new(builder.build()?);
        for (id, store) in registered {
            router.register(id, store);
        }
        Ok(router)
    }

    /// Register the store for a destination
    ///
    /// The destination's name is taken from the routing table when known.
    pub fn register(&mut self, id: DestinationId, store: Arc<dyn Store>) {
        let index = id.as_usize();
        if index >= self.destinations.len() {
            self.destinations.resize_with(index + 1, || None);
        }

        let name = self
            .routing_table
            .destination_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| store.name().to_string());

        tracing::debug!(
            destination_id = %id,
            destination = %name,
            store = %store.name(),
            "registered destination with router"
        );

        self.destinations[index] = Some(Destination::new(id, name, store));
    }

    /// Route a device-type tag to its destination
    ///
    /// # Errors
    ///
    /// Returns `UnknownDeviceType` if the tag has no route, or
    /// `DestinationNotRegistered` if the route has no store behind it.
    #[inline]
    pub fn route(&self, device_type: &[u8]) -> Result<&Destination> {
        let id = self.routing_table.route(device_type).map_err(|e| match e {
            RoutingError::UnknownDeviceType { device_type } => {
                PipelineError::UnknownDeviceType { device_type }
            }
            other => PipelineError::Routing(other),
        })?;

        self.destinations
            .get(id.as_usize())
            .and_then(Option::as_ref)
            .ok_or(PipelineError::DestinationNotRegistered(id))
    }

    /// Get the number of registered destinations
    pub fn destination_count(&self) -> usize {
        self.destinations.iter().filter(|d| d.is_some()).count()
    }

    /// Iterate over registered destinations
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter().flatten()
    }
}
