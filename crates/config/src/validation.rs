//! Configuration validation
//!
//! Validates config consistency:
//! - The file pattern is present
//! - Worker count and error-rate threshold are in range
//! - Every device endpoint has a `host:port` address and a usable pool

use crate::Config;
use crate::devices::EndpointConfig;
use crate::error::{ConfigError, Result};
use crate::loader::LoaderConfig;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_loader(&config.loader)?;
    for (device, endpoint) in config.devices.iter() {
        validate_endpoint(device, endpoint)?;
    }
    Ok(())
}

/// Validate loader settings
fn validate_loader(loader: &LoaderConfig) -> Result<()> {
    if loader.pattern.trim().is_empty() {
        return Err(ConfigError::missing_field("loader", "loader", "pattern"));
    }

    if loader.workers == 0 {
        return Err(ConfigError::invalid_value(
            "loader",
            "loader",
            "workers",
            "must be at least 1",
        ));
    }

    let threshold = loader.error_rate_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::invalid_value(
            "loader",
            "loader",
            "error_rate_threshold",
            format!("must be in (0, 1], got {threshold}"),
        ));
    }

    Ok(())
}

/// Validate one device endpoint
fn validate_endpoint(device: &str, endpoint: &EndpointConfig) -> Result<()> {
    if endpoint.address.is_empty() {
        return Err(ConfigError::missing_field("device", device, "address"));
    }

    if let Err(message) = check_host_port(&endpoint.address) {
        return Err(ConfigError::invalid_value(
            "device", device, "address", message,
        ));
    }

    if endpoint.max_pool_size == 0 {
        return Err(ConfigError::invalid_value(
            "device",
            device,
            "max_pool_size",
            "must be at least 1",
        ));
    }

    if endpoint.connect_timeout.is_zero() || endpoint.timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "device",
            device,
            "timeout",
            "timeouts must be greater than zero",
        ));
    }

    Ok(())
}

/// Check that an address looks like `host:port`
fn check_host_port(address: &str) -> std::result::Result<(), String> {
    let Some((host, port)) = address.rsplit_once(':') else {
        return Err(format!("'{address}' is not host:port"));
    };

    if host.is_empty() {
        return Err(format!("'{address}' has an empty host"));
    }

    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("'{address}' has an invalid port")),
        Ok(_) => Ok(()),
    }
}
