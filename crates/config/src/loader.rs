//! Loader configuration
//!
//! Which files to load and how hard to drive the stores.

use serde::Deserialize;

/// Default glob pattern for input files
pub const DEFAULT_PATTERN: &str = "data/appsinstalled/*.tsv.gz";

/// Loader settings
///
/// # Example
///
/// ```toml
/// [loader]
/// pattern = "/data/appsinstalled/*.tsv.gz"
/// workers = 16
/// dry_run = false
/// error_rate_threshold = 0.01
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Glob pattern selecting input files
    /// Default: "data/appsinstalled/*.tsv.gz"
    pub pattern: String,

    /// Maximum in-flight line tasks per file
    /// Default: 8
    pub workers: usize,

    /// Log intended writes instead of sending them
    /// Default: false
    pub dry_run: bool,

    /// Loads with `errors / processed` below this are acceptable
    /// Default: 0.01
    pub error_rate_threshold: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.into(),
            workers: 8,
            dry_run: false,
            error_rate_threshold: 0.01,
        }
    }
}
