//! Appsload - Pipeline
//!
//! Per-file ingestion of installed-apps logs into per-device-type stores.
//!
//! # Architecture
//!
//! ```text
//! [BatchDriver] ── glob ──► [FilePipeline] ── gzip lines ──► JoinSet (≤ workers)
//!                                                              │
//!                                         parse ─► Router ─► encode ─► Store::set
//!                                                              │
//!                          FileOutcome ◄── LineOutcome ◄───────┘
//!                               │
//!                          rate check ─► rename to .name
//! ```
//!
//! # Key Design
//!
//! - **Immutable routing**: `Router` is built once and shared as `Arc<Router>`
//! - **Outcome folding**: line tasks return outcomes, the coordinator sums them
//! - **Mark once**: every fully read file is renamed, whatever its error rate
//!
//! # Example
//!
//! ```ignore
//! use appsload_pipeline::{BatchDriver, FilePipeline, PipelineOptions, Router};
//!
//! let router = Arc::new(Router::from_stores(stores)?);
//! let pipeline = FilePipeline::new(router, PipelineOptions::default());
//! let summary = BatchDriver::new(pipeline).run("data/appsinstalled/*.tsv.gz").await?;
//! ```

mod batch;
mod destination;
mod error;
mod file;
mod marker;
mod router;
mod worker;

pub use batch::{BatchDriver, BatchSummary, find_files};
pub use destination::Destination;
pub use error::{PipelineError, Result};
pub use file::{
    DEFAULT_ERROR_RATE_THRESHOLD, DEFAULT_WORKERS, FileOutcome, FilePipeline, FileReport,
    PipelineOptions, RateCheck, check_error_rate,
};
pub use marker::{completed_path, is_completed, mark_completed};
pub use router::Router;
pub use worker::{LineOutcome, deliver, process_line};

// Re-export key types from dependencies for convenience
pub use appsload_routing::{DestinationId, RoutingTable};
pub use appsload_sinks::Store;

#[cfg(test)]
mod batch_test;
#[cfg(test)]
mod test_util;
