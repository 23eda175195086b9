//! Appsload Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid configuration: local stores on the default
//! ports and the default input pattern.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use appsload_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[loader]\nworkers = 4").unwrap();
//! assert_eq!(config.loader.workers, 4);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [loader]
//! pattern = "/data/appsinstalled/*.tsv.gz"
//! workers = 8
//!
//! [log]
//! level = "info"
//! output = "/var/log/appsload.log"
//!
//! [devices.idfa]
//! address = "10.0.0.5:33013"
//! ```
//!
//! See `configs/appsload.toml` for all available options.

mod devices;
mod error;
mod loader;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use devices::{DEFAULT_ADDRESSES, DevicesConfig, EndpointConfig};
pub use error::{ConfigError, Result};
pub use loader::{DEFAULT_PATTERN, LoaderConfig};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input files and concurrency
    pub loader: LoaderConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Store endpoint per device type
    pub devices: DevicesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.devices.apply_default_addresses();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Call again after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
