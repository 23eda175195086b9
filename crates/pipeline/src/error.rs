//! Pipeline error types
//!
//! Line-level errors (`UnknownDeviceType`) are counted and logged by the
//! coordinator. File-level errors (`Open`, `Read`, `Mark`) abort one file.
//! `Pattern` aborts the whole batch.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use appsload_routing::{DestinationId, RoutingError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Device-type tag has no destination
    #[error("unknown device type: {device_type}")]
    UnknownDeviceType { device_type: String },

    /// Routing table points at a destination with no store registered
    #[error("destination not registered: {0}")]
    DestinationNotRegistered(DestinationId),

    /// Routing table could not be built
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Input file could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input file could not be read or decompressed
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Completed file could not be renamed
    #[error("failed to mark {} as completed: {source}", path.display())]
    Mark {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl PipelineError {
    /// Create an open error
    pub fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a read error
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a mark error
    pub fn mark(path: &Path, source: io::Error) -> Self {
        Self::Mark {
            path: path.to_path_buf(),
            source,
        }
    }

}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
