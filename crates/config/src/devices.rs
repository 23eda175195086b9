//! Store endpoint configuration
//!
//! One memcached endpoint per known device type. Every device has a default
//! local address, so an empty `[devices]` section still yields a complete
//! configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::{ConfigError, Result};

/// Known device types with their default endpoint addresses
pub const DEFAULT_ADDRESSES: [(&str, &str); 4] = [
    ("idfa", "127.0.0.1:33013"),
    ("gaid", "127.0.0.1:33014"),
    ("adid", "127.0.0.1:33015"),
    ("dvid", "127.0.0.1:33016"),
];

/// One memcached endpoint
///
/// # Example
///
/// ```toml
/// [devices.idfa]
/// address = "10.0.0.5:11211"
/// max_pool_size = 16
/// connect_timeout = "2s"
/// timeout = "500ms"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Endpoint address (host:port)
    /// Default: per device type, see `DEFAULT_ADDRESSES`
    pub address: String,

    /// Maximum pooled connections
    /// Default: 8
    pub max_pool_size: usize,

    /// Connection timeout
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Timeout for one set exchange
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            max_pool_size: 8,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
        }
    }
}

impl EndpointConfig {
    /// Endpoint with default settings at `address`
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }
}

/// Endpoints for all device types
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DevicesConfig {
    pub idfa: EndpointConfig,
    pub gaid: EndpointConfig,
    pub adid: EndpointConfig,
    pub dvid: EndpointConfig,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        let [idfa, gaid, adid, dvid] =
            DEFAULT_ADDRESSES.map(|(_, address)| EndpointConfig::with_address(address));
        Self {
            idfa,
            gaid,
            adid,
            dvid,
        }
    }
}

impl DevicesConfig {
    /// Fill empty addresses with each device's default
    pub fn apply_default_addresses(&mut self) {
        for (device, default) in DEFAULT_ADDRESSES {
            if let Some(endpoint) = self.get_mut(device)
                && endpoint.address.is_empty()
            {
                endpoint.address = default.to_string();
            }
        }
    }

    /// Get the endpoint for a device type
    pub fn get(&self, device: &str) -> Option<&EndpointConfig> {
        match device {
            "idfa" => Some(&self.idfa),
            "gaid" => Some(&self.gaid),
            "adid" => Some(&self.adid),
            "dvid" => Some(&self.dvid),
            _ => None,
        }
    }

    /// Get the endpoint for a device type, mutably
    pub fn get_mut(&mut self, device: &str) -> Option<&mut EndpointConfig> {
        match device {
            "idfa" => Some(&mut self.idfa),
            "gaid" => Some(&mut self.gaid),
            "adid" => Some(&mut self.adid),
            "dvid" => Some(&mut self.dvid),
            _ => None,
        }
    }

    /// Override the address of one device type
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownDevice` for a device outside the known set.
    pub fn set_address(&mut self, device: &str, address: impl Into<String>) -> Result<()> {
        let endpoint = self
            .get_mut(device)
            .ok_or_else(|| ConfigError::UnknownDevice(device.to_string()))?;
        endpoint.address = address.into();
        Ok(())
    }

    /// Iterate over (device type, endpoint) in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &EndpointConfig)> {
        [
            ("idfa", &self.idfa),
            ("gaid", &self.gaid),
            ("adid", &self.adid),
            ("dvid", &self.dvid),
        ]
        .into_iter()
    }
}
