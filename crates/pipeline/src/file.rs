//! File Pipeline Coordinator
//!
//! Loads one gzip TSV file end to end:
//!
//! ```text
//! OPENED ──► STREAMING ──► AGGREGATED ──► RATE_CHECKED ──► MARKED
//!   │            │
//!   └── open / decompression failure: file aborted, not marked
//!
//! A zero-byte file skips streaming and is an empty load.
//! ```
//!
//! # Concurrency
//!
//! Decompression runs on a blocking thread and feeds raw lines through a
//! bounded channel. Each non-blank line becomes one task on a `JoinSet`
//! holding at most `workers` tasks. Every task returns a `LineOutcome` and
//! the coordinator alone folds them into a `FileOutcome`, so there are no
//! shared counters.
//!
//! # Error Rate
//!
//! The error rate is advisory: a file with a high rate is logged as a failed
//! load but is still marked, so it is never loaded twice.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::MultiGzDecoder;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use crate::marker::mark_completed;
use crate::worker::{LineOutcome, process_line};
use crate::{PipelineError, Result, Router};

/// Default number of in-flight line tasks per file
pub const DEFAULT_WORKERS: usize = 8;

/// Default error-rate threshold for an acceptable load
pub const DEFAULT_ERROR_RATE_THRESHOLD: f64 = 0.01;

/// Raw lines buffered between the decompressor and the coordinator
const LINE_CHANNEL_SIZE: usize = 1024;

/// Options shared by every file of a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Maximum in-flight line tasks
    pub workers: usize,

    /// Log intended writes instead of sending them
    pub dry_run: bool,

    /// Loads with `errors / processed` below this are acceptable
    pub error_rate_threshold: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            dry_run: false,
            error_rate_threshold: DEFAULT_ERROR_RATE_THRESHOLD,
        }
    }
}

impl PipelineOptions {
    /// Set maximum in-flight line tasks (at least one)
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Enable or disable dry-run
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the error-rate threshold
    #[must_use]
    pub fn with_error_rate_threshold(mut self, threshold: f64) -> Self {
        self.error_rate_threshold = threshold;
        self
    }
}

/// Line counts for one file
///
/// `processed + errors + skipped` equals the number of lines read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOutcome {
    /// Records delivered (or dry-run logged)
    pub processed: u64,

    /// Malformed, unroutable or undelivered lines
    pub errors: u64,

    /// Blank lines
    pub skipped: u64,
}

impl FileOutcome {
    /// Count one line outcome
    #[inline]
    pub fn record(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Processed => self.processed += 1,
            LineOutcome::Error => self.errors += 1,
        }
    }

    /// Combine two outcomes (associative and commutative)
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            errors: self.errors + other.errors,
            skipped: self.skipped + other.skipped,
        }
    }

    /// Total number of lines accounted for
    #[inline]
    pub fn total_lines(&self) -> u64 {
        self.processed + self.errors + self.skipped
    }
}

/// Error-rate classification of a finished file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateCheck {
    /// Nothing was processed
    Empty,

    /// Rate below the threshold
    Acceptable(f64),

    /// Rate at or above the threshold
    High(f64),
}

impl RateCheck {
    /// The computed rate, if anything was processed
    pub fn rate(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Acceptable(rate) | Self::High(rate) => Some(*rate),
        }
    }

    /// Check if the load counts as successful
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Acceptable(_))
    }
}

/// Classify a file's error rate as `errors / processed`
pub fn check_error_rate(outcome: &FileOutcome, threshold: f64) -> RateCheck {
    if outcome.processed == 0 {
        return RateCheck::Empty;
    }

    let rate = outcome.errors as f64 / outcome.processed as f64;
    if rate < threshold {
        RateCheck::Acceptable(rate)
    } else {
        RateCheck::High(rate)
    }
}

/// Result of loading one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Path the file was loaded from
    pub path: PathBuf,

    /// Path after marking (`dir/.name`)
    pub marked_path: PathBuf,

    /// Line counts
    pub outcome: FileOutcome,

    /// Error-rate classification
    pub rate: RateCheck,
}

/// Per-file coordinator
///
/// # Example
///
/// ```ignore
/// let pipeline = FilePipeline::new(router, PipelineOptions::default());
/// let report = pipeline.process(Path::new("data/20170929000000.tsv.gz")).await?;
/// assert_eq!(report.outcome.total_lines(), lines_in_file);
/// ```
#[derive(Debug, Clone)]
pub struct FilePipeline {
    router: Arc<Router>,
    options: PipelineOptions,
}

impl FilePipeline {
    /// Create a coordinator sharing `router` with every line task
    pub fn new(router: Arc<Router>, options: PipelineOptions) -> Self {
        Self { router, options }
    }

    /// Load one file, check its error rate and mark it as completed
    ///
    /// # Errors
    ///
    /// Returns `Open` or `Read` if the file cannot be opened or decompressed;
    /// the file is left unmarked. Returns `Mark` if the final rename fails.
    pub async fn process(&self, path: &Path) -> Result<FileReport> {
        tracing::info!(file = %path.display(), "processing");

        let outcome = self.load(path).await?;
        let rate = check_error_rate(&outcome, self.options.error_rate_threshold);
        log_rate(path, &outcome, rate, self.options.error_rate_threshold);

        let marked_path = mark_completed(path).map_err(|e| PipelineError::mark(path, e))?;
        tracing::debug!(
            file = %path.display(),
            marked = %marked_path.display(),
            "marked as completed"
        );

        Ok(FileReport {
            path: path.to_path_buf(),
            marked_path,
            outcome,
            rate,
        })
    }

    /// Stream the file through bounded line tasks and fold their outcomes
    async fn load(&self, path: &Path) -> Result<FileOutcome> {
        let file = File::open(path).map_err(|e| PipelineError::open(path, e))?;

        // A zero-byte file has no gzip header but is an empty load, not a read error
        let size = file
            .metadata()
            .map_err(|e| PipelineError::open(path, e))?
            .len();
        if size == 0 {
            tracing::warn!(file = %path.display(), "empty input file");
            return Ok(FileOutcome::default());
        }

        let (tx, mut rx) = mpsc::channel(LINE_CHANNEL_SIZE);
        let reader = tokio::task::spawn_blocking(move || read_lines(file, tx));

        let mut outcome = FileOutcome::default();
        let mut tasks = JoinSet::new();

        while let Some(line) = rx.recv().await {
            // Dropping `tasks` on return aborts the in-flight lines
            let line: Vec<u8> = line.map_err(|e| PipelineError::read(path, e))?;

            if line.trim_ascii().is_empty() {
                outcome.skipped += 1;
                continue;
            }

            if tasks.len() >= self.options.workers
                && let Some(joined) = tasks.join_next().await
            {
                outcome.record(joined_outcome(joined));
            }

            let router = Arc::clone(&self.router);
            let dry_run = self.options.dry_run;
            tasks.spawn(async move { process_line(&router, &line, dry_run).await });
        }

        while let Some(joined) = tasks.join_next().await {
            outcome.record(joined_outcome(joined));
        }

        reader
            .await
            .map_err(|e| PipelineError::read(path, io::Error::other(e)))?;

        tracing::info!(
            file = %path.display(),
            processed = outcome.processed,
            errors = outcome.errors,
            skipped = outcome.skipped,
            "file loaded"
        );

        Ok(outcome)
    }
}

/// Read decompressed lines on a blocking thread
///
/// Stops at end of input, at the first read error (which is forwarded), or
/// when the receiver is gone.
fn read_lines(file: File, tx: mpsc::Sender<io::Result<Vec<u8>>>) {
    let mut reader = BufReader::new(MultiGzDecoder::new(file));

    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return,
            Ok(_) => {
                if tx.blocking_send(Ok(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        }
    }
}

/// A task that panicked or was cancelled counts as one error
fn joined_outcome(joined: std::result::Result<LineOutcome, JoinError>) -> LineOutcome {
    joined.unwrap_or_else(|e| {
        tracing::error!(error = %e, "line task failed");
        LineOutcome::Error
    })
}

fn log_rate(path: &Path, outcome: &FileOutcome, rate: RateCheck, threshold: f64) {
    match rate {
        RateCheck::Empty => tracing::warn!(
            file = %path.display(),
            errors = outcome.errors,
            "no records processed, failed load"
        ),
        RateCheck::Acceptable(rate) => tracing::info!(
            file = %path.display(),
            processed = outcome.processed,
            errors = outcome.errors,
            rate,
            "acceptable error rate, successful load"
        ),
        RateCheck::High(rate) => tracing::error!(
            file = %path.display(),
            processed = outcome.processed,
            errors = outcome.errors,
            rate,
            threshold,
            "high error rate, failed load"
        ),
    }
}
