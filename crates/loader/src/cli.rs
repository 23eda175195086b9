//! Command-line interface
//!
//! Every option can also be set in the config file; values given on the
//! command line win.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use appsload_config::{Config, LogLevel, LogOutput};
use appsload_protocol::DeviceType;

/// Config file used when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "configs/appsload.toml";

/// Appsload - load installed-apps logs into memcached
#[derive(Parser, Debug, Default)]
#[command(name = "appsload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Glob pattern of input files. Overrides config file.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Maximum in-flight records per file. Overrides config file.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log intended writes instead of sending them
    #[arg(long)]
    pub dry: bool,

    /// Append log output to this file. Overrides config file.
    #[arg(long, value_name = "PATH")]
    pub log: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// memcached address for idfa records
    #[arg(long, value_name = "HOST:PORT")]
    pub idfa: Option<String>,

    /// memcached address for gaid records
    #[arg(long, value_name = "HOST:PORT")]
    pub gaid: Option<String>,

    /// memcached address for adid records
    #[arg(long, value_name = "HOST:PORT")]
    pub adid: Option<String>,

    /// memcached address for dvid records
    #[arg(long, value_name = "HOST:PORT")]
    pub dvid: Option<String>,

    /// Run the encode/decode self-check and exit
    #[arg(short, long)]
    pub test: bool,
}

impl Cli {
    /// Load the config file (if any), apply overrides and validate
    ///
    /// # Errors
    ///
    /// Fails if an explicit config file is missing or invalid, or if the
    /// resulting configuration does not validate.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                load_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };

        self.apply_overrides(&mut config)?;
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Apply command-line values on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(pattern) = &self.pattern {
            config.loader.pattern = pattern.clone();
        }
        if let Some(workers) = self.workers {
            config.loader.workers = workers;
        }
        if self.dry {
            config.loader.dry_run = true;
        }
        if let Some(path) = &self.log {
            config.log.output = LogOutput::File(path.clone());
        }

        let addresses = [&self.idfa, &self.gaid, &self.adid, &self.dvid];
        for (device, address) in DeviceType::KNOWN.into_iter().zip(addresses) {
            if let Some(address) = address {
                config.devices.set_address(device, address.clone())?;
            }
        }

        Ok(())
    }

    /// Resolve log level: CLI flag > config file > debug for dry-run > info
    pub fn log_level(&self, config: &Config) -> LogLevel {
        self.log_level
            .unwrap_or_else(|| config.log.effective_level(config.loader.dry_run))
    }
}

fn load_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("config file not found: {}", path.display());
    }
    Config::from_file(path).context("failed to load configuration")
}
