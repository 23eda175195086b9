//! Encode/decode self-check
//!
//! Parses a few sample lines, encodes them and decodes the payload back,
//! failing if anything does not survive the round trip.

use anyhow::{Context, Result, bail};
use tracing::info;

use appsload_protocol::{UserApps, encode, parse};

/// Lines checked by `run`
pub const SAMPLE_LINES: [&str; 2] = [
    "idfa\t1rfw452y52g2gq4g\t55.55\t42.42\t1423,43,567,3,7,23",
    "gaid\t7rfw452y52g2gq4g\t55.55\t42.42\t7423,424",
];

/// Check every sample line
///
/// # Errors
///
/// Fails on the first line that does not round-trip.
pub fn run() -> Result<()> {
    for line in SAMPLE_LINES {
        check_line(line)?;
    }
    info!(lines = SAMPLE_LINES.len(), "self-check passed");
    Ok(())
}

/// Round-trip one line through parse, encode and decode
pub fn check_line(line: &str) -> Result<()> {
    let record = parse(line.as_bytes()).with_context(|| format!("cannot parse {line:?}"))?;
    let encoded = encode(&record);
    let decoded = UserApps::from_bytes(&encoded.payload)
        .with_context(|| format!("cannot decode payload for {}", encoded.key))?;

    if decoded != UserApps::from_record(&record) {
        bail!("round trip mismatch for {}: {decoded:?}", encoded.key);
    }
    if decoded.apps != record.apps {
        bail!("apps mismatch for {}", encoded.key);
    }

    info!(key = %encoded.key, bytes = encoded.len(), "self-check line ok");
    Ok(())
}
