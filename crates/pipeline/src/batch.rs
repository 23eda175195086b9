//! Batch Driver
//!
//! Enumerates input files by glob pattern and loads them one after another.
//! A failure on one file is logged and the batch moves on to the next.
//!
//! Files whose name starts with `.` are never matched, so files marked by an
//! earlier run are skipped and re-running over a fully processed directory
//! loads nothing.

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::marker::is_completed;
use crate::{FilePipeline, FileReport, Result};

/// Totals over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files loaded and marked
    pub files_loaded: u64,

    /// Files aborted (open, read or mark failure)
    pub files_failed: u64,

    /// Records processed across loaded files
    pub processed: u64,

    /// Line errors across loaded files
    pub errors: u64,
}

impl BatchSummary {
    /// Add a loaded file
    pub fn record_loaded(&mut self, report: &FileReport) {
        self.files_loaded += 1;
        self.processed += report.outcome.processed;
        self.errors += report.outcome.errors;
    }

    /// Add a failed file
    pub fn record_failed(&mut self) {
        self.files_failed += 1;
    }

    /// Number of files attempted
    pub fn files_seen(&self) -> u64 {
        self.files_loaded + self.files_failed
    }
}

/// Runs the file pipeline over every file matching a pattern
#[derive(Debug, Clone)]
pub struct BatchDriver {
    pipeline: FilePipeline,
}

impl BatchDriver {
    /// Create a driver around a file pipeline
    pub fn new(pipeline: FilePipeline) -> Self {
        Self { pipeline }
    }

    /// Load every unmarked file matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Pattern` if the pattern is invalid. Per-file
    /// failures are counted in the summary, not returned.
    pub async fn run(&self, pattern: &str) -> Result<BatchSummary> {
        let files = find_files(pattern)?;
        tracing::info!(pattern, files = files.len(), "starting batch");

        let mut summary = BatchSummary::default();
        for path in &files {
            match self.pipeline.process(path).await {
                Ok(report) => summary.record_loaded(&report),
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "failed to load file");
                    summary.record_failed();
                }
            }
        }

        tracing::info!(
            files_loaded = summary.files_loaded,
            files_failed = summary.files_failed,
            processed = summary.processed,
            errors = summary.errors,
            "batch finished"
        );

        Ok(summary)
    }
}

/// List unmarked regular files matching `pattern`, in path order
///
/// A leading `.` in a file name must be matched literally, so `*` never
/// matches a marked file.
///
/// # Errors
///
/// Returns `PipelineError::Pattern` if the pattern is invalid.
pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(pattern, options)? {
        match entry {
            Ok(path) if is_candidate(&path) => files.push(path),
            Ok(path) => tracing::debug!(path = %path.display(), "skipping"),
            Err(e) => tracing::warn!(error = %e, "cannot read path while matching pattern"),
        }
    }

    files.sort();
    Ok(files)
}

fn is_candidate(path: &Path) -> bool {
    path.is_file() && !is_completed(path)
}
