//! Delivery worker - one line in, one outcome out
//!
//! `process_line` runs the per-line chain (parse → route → encode → deliver)
//! inside a single task and reports a `LineOutcome`. Nothing here touches
//! shared counters; the coordinator folds the outcomes.

use appsload_protocol::{EncodedRecord, ParsedRecord, encode, parse};

use crate::{Destination, Router};

/// Result of handling one non-blank line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Record was delivered (or would have been, in dry-run)
    Processed,

    /// Line was malformed, unroutable or failed delivery
    Error,
}

impl LineOutcome {
    /// Convert a delivery result
    #[inline]
    pub fn from_delivered(delivered: bool) -> Self {
        if delivered {
            Self::Processed
        } else {
            Self::Error
        }
    }
}

/// Parse, route, encode and deliver one line
pub async fn process_line(router: &Router, line: &[u8], dry_run: bool) -> LineOutcome {
    let record = match parse(line) {
        Ok(record) => record,
        Err(e) => {
            tracing::info!(
                line = %String::from_utf8_lossy(line.trim_ascii()),
                error = %e,
                "malformed line"
            );
            return LineOutcome::Error;
        }
    };

    let destination = match router.route(record.device_type) {
        Ok(destination) => destination,
        Err(e) => {
            tracing::error!(error = %e, "unknown device type");
            return LineOutcome::Error;
        }
    };

    let encoded = encode(&record);
    LineOutcome::from_delivered(deliver(destination, &record, &encoded, dry_run).await)
}

/// Write one encoded record to its destination
///
/// In dry-run mode nothing is sent; the intended write is logged at debug
/// level and counted as delivered. Otherwise exactly one `set` is issued and
/// any failure is logged and reported as `false`. There is no retry.
pub async fn deliver(
    destination: &Destination,
    record: &ParsedRecord<'_>,
    encoded: &EncodedRecord,
    dry_run: bool,
) -> bool {
    if dry_run {
        tracing::debug!(
            destination = %destination.name(),
            key = %encoded.key,
            lat = record.lat,
            lon = record.lon,
            apps = ?record.apps,
            "dry run: would store record"
        );
        return true;
    }

    match destination.store().set(&encoded.key, &encoded.payload).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                destination = %destination.name(),
                key = %encoded.key,
                error = %e,
                "cannot write to store"
            );
            false
        }
    }
}
