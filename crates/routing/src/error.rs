//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors from routing table compilation and lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Device-type tag has no route (never retried, never fatal)
    #[error("unknown device type '{device_type}'")]
    UnknownDeviceType {
        /// The tag as found in the input (lossy UTF-8)
        device_type: String,
    },

    /// Destination name not registered
    #[error("unknown destination '{name}' in routing configuration")]
    UnknownDestination {
        /// Name of the missing destination
        name: String,
    },

    /// Duplicate route definition
    #[error("duplicate route for device type '{device_type}'")]
    DuplicateRoute {
        /// Device type that has duplicate routes
        device_type: String,
    },

    /// Table would route nothing
    #[error("routing table has no routes")]
    Empty,
}

impl RoutingError {
    /// Create an UnknownDeviceType error from raw tag bytes
    #[inline]
    pub fn unknown_device_type(device_type: &[u8]) -> Self {
        Self::UnknownDeviceType {
            device_type: String::from_utf8_lossy(device_type).into_owned(),
        }
    }

    /// Create an UnknownDestination error
    #[inline]
    pub fn unknown_destination(name: impl Into<String>) -> Self {
        Self::UnknownDestination { name: name.into() }
    }

    /// Create a DuplicateRoute error
    #[inline]
    pub fn duplicate_route(device_type: impl Into<String>) -> Self {
        Self::DuplicateRoute {
            device_type: device_type.into(),
        }
    }
}
