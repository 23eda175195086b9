//! Record parser for installed-apps TSV lines
//!
//! Turns one raw line into a `ParsedRecord` borrowing from the line bytes.
//!
//! # Line Layout
//!
//! ```text
//! device_type \t device_id \t lat \t lon \t app_id,app_id,...
//! ```
//!
//! # Failure Policy
//!
//! Structural problems reject the line with a `ParseError`:
//! - field count other than five
//! - empty device type or device id
//!
//! Sub-field problems are tolerated and flagged on `ParsedRecord::degraded`:
//! - non-numeric app ids are dropped
//! - unparseable coordinates make both `lat` and `lon` default to `0.0`

use crate::ParseError;

/// Number of tab-separated fields in a well-formed line
pub const FIELD_COUNT: usize = 5;

/// Tolerated degradations on an accepted record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Degradation {
    /// Coordinates failed float parsing and were reset to `0.0`
    pub geo: bool,

    /// One or more app ids failed integer parsing and were dropped
    pub apps: bool,
}

impl Degradation {
    /// Check if any sub-field was degraded
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.geo || self.apps
    }
}

/// One parsed installed-apps record
///
/// Borrows `device_type` and `device_id` from the raw line, so it lives only
/// as long as the line it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord<'a> {
    /// Device-type tag (never empty)
    pub device_type: &'a [u8],

    /// Device id (never empty)
    pub device_id: &'a [u8],

    /// Latitude, `0.0` when `degraded.geo` is set
    pub lat: f64,

    /// Longitude, `0.0` when `degraded.geo` is set
    pub lon: f64,

    /// Installed app ids in input order (may be empty)
    pub apps: Vec<i64>,

    /// Which sub-fields were degraded while parsing
    pub degraded: Degradation,
}

/// Parse one raw line
///
/// Whitespace is trimmed from the whole line before splitting and from each
/// app token and coordinate before numeric parsing.
///
/// # Errors
///
/// Returns `ParseError` if the line does not have exactly five fields or if
/// the device type or device id is empty.
pub fn parse(line: &[u8]) -> Result<ParsedRecord<'_>, ParseError> {
    let line = line.trim_ascii();

    let mut fields: [&[u8]; FIELD_COUNT] = [&[]; FIELD_COUNT];
    let mut count = 0;
    for field in line.split(|&b| b == b'\t') {
        if count < FIELD_COUNT {
            fields[count] = field;
        }
        count += 1;
    }

    if count != FIELD_COUNT {
        return Err(ParseError::field_count(count));
    }

    let [device_type, device_id, lat, lon, raw_apps] = fields;

    if device_type.is_empty() {
        return Err(ParseError::EmptyDeviceType);
    }
    if device_id.is_empty() {
        return Err(ParseError::EmptyDeviceId);
    }

    let mut degraded = Degradation::default();

    let (apps, all_numeric) = parse_apps(raw_apps);
    if !all_numeric {
        degraded.apps = true;
        tracing::info!(
            line = %String::from_utf8_lossy(line),
            "not all user apps are digits"
        );
    }

    let (lat, lon) = match (parse_float(lat), parse_float(lon)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            degraded.geo = true;
            tracing::info!(
                line = %String::from_utf8_lossy(line),
                "invalid geo coords"
            );
            (0.0, 0.0)
        }
    };

    Ok(ParsedRecord {
        device_type,
        device_id,
        lat,
        lon,
        apps,
        degraded,
    })
}

/// Parse the comma-separated app list, dropping non-numeric tokens
///
/// Returns the parsed ids and whether every token was numeric. An empty
/// field is an empty list, not a degradation.
fn parse_apps(raw: &[u8]) -> (Vec<i64>, bool) {
    let raw = raw.trim_ascii();
    if raw.is_empty() {
        return (Vec::new(), true);
    }

    let mut all_numeric = true;
    let apps = raw
        .split(|&b| b == b',')
        .filter_map(|token| {
            let parsed = parse_int(token);
            if parsed.is_none() {
                all_numeric = false;
            }
            parsed
        })
        .collect();

    (apps, all_numeric)
}

#[inline]
fn parse_int(token: &[u8]) -> Option<i64> {
    std::str::from_utf8(token.trim_ascii()).ok()?.parse().ok()
}

#[inline]
fn parse_float(field: &[u8]) -> Option<f64> {
    std::str::from_utf8(field.trim_ascii()).ok()?.parse().ok()
}
