//! Routing table for O(1) device type → destination lookup
//!
//! The routing table is compiled once at startup from configuration and is
//! never mutated afterwards.

use std::collections::HashMap;

use appsload_protocol::DeviceType;

use crate::{DestinationId, Result, RoutingError};

/// Pre-compiled, immutable routing table
///
/// Maps device-type tags to destination IDs. Keys are stored as raw bytes so
/// that `route()` can be called with a slice borrowed from the input line.
///
/// # Example
///
/// ```
/// use appsload_routing::{DestinationId, RoutingTableBuilder};
///
/// let mut builder = RoutingTableBuilder::new();
/// builder.register_destination("idfa_store");
/// builder.register_destination("gaid_store");
/// builder.add_route("idfa", "idfa_store").unwrap();
/// builder.add_route("gaid", "gaid_store").unwrap();
/// let table = builder.build().unwrap();
///
/// assert_eq!(table.route(b"gaid").unwrap(), DestinationId::new(1));
/// assert_eq!(table.destination_name(DestinationId::new(0)), Some("idfa_store"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    /// Pre-compiled routes: tag bytes → destination
    routes: HashMap<Vec<u8>, DestinationId>,

    /// Destination names for logging (indexed by DestinationId)
    destination_names: Vec<String>,
}

impl RoutingTable {
    /// Route a device-type tag to its destination
    ///
    /// This is the hot path - one HashMap lookup, no allocation on success.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::UnknownDeviceType` if the tag has no route.
    #[inline]
    pub fn route(&self, device_type: &[u8]) -> Result<DestinationId> {
        self.routes
            .get(device_type)
            .copied()
            .ok_or_else(|| RoutingError::unknown_device_type(device_type))
    }

    /// Check if a tag has a route
    #[inline]
    pub fn has_route(&self, device_type: &[u8]) -> bool {
        self.routes.contains_key(device_type)
    }

    /// Get the name of a destination by ID
    #[inline]
    pub fn destination_name(&self, id: DestinationId) -> Option<&str> {
        self.destination_names.get(id.as_usize()).map(String::as_str)
    }

    /// Get all registered destination names
    #[inline]
    pub fn destination_names(&self) -> &[String] {
        &self.destination_names
    }

    /// Get the number of routes
    #[inline]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Get the number of registered destinations
    #[inline]
    pub fn destination_count(&self) -> usize {
        self.destination_names.len()
    }

    /// Check if the table routes nothing
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all routes as (device type, destination)
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, DestinationId)> + '_ {
        self.routes
            .iter()
            .map(|(tag, id)| (DeviceType::from_bytes(tag), *id))
    }
}

/// Builder for constructing routing tables from configuration
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    /// Registered destinations: name → id
    destination_ids: HashMap<String, DestinationId>,

    /// Destination names in order
    destination_names: Vec<String>,

    /// Routes being built
    routes: HashMap<Vec<u8>, DestinationId>,
}

impl RoutingTableBuilder {
    /// Create a new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination and get its ID
    ///
    /// If the destination is already registered, returns the existing ID.
    pub fn register_destination(&mut self, name: impl Into<String>) -> DestinationId {
        let name = name.into();
        if let Some(&id) = self.destination_ids.get(&name) {
            return id;
        }

        let id = DestinationId::new(self.destination_names.len() as u16);
        self.destination_ids.insert(name.clone(), id);
        self.destination_names.push(name);
        id
    }

    /// Get the ID of a registered destination
    #[inline]
    pub fn get_destination_id(&self, name: &str) -> Option<DestinationId> {
        self.destination_ids.get(name).copied()
    }

    /// Route a device type to a registered destination (by name)
    ///
    /// # Errors
    ///
    /// Returns `UnknownDestination` if the destination is not registered, or
    /// `DuplicateRoute` if the device type already has a route.
    pub fn add_route(
        &mut self,
        device_type: impl Into<DeviceType>,
        destination: &str,
    ) -> Result<DestinationId> {
        let device_type = device_type.into();
        let id = self
            .get_destination_id(destination)
            .ok_or_else(|| RoutingError::unknown_destination(destination))?;

        if self.routes.contains_key(device_type.as_bytes()) {
            return Err(RoutingError::duplicate_route(device_type.as_str()));
        }

        self.routes.insert(device_type.as_bytes().to_vec(), id);
        Ok(id)
    }

    /// Build the routing table
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::Empty` if no routes were added.
    pub fn build(self) -> Result<RoutingTable> {
        if self.routes.is_empty() {
            return Err(RoutingError::Empty);
        }

        Ok(RoutingTable {
            routes: self.routes,
            destination_names: self.destination_names,
        })
    }
}
