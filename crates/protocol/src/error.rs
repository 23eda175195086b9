//! Protocol error types
//!
//! Errors that can occur when parsing input lines or decoding stored payloads.

use thiserror::Error;

/// Structural failures that reject a whole input line
///
/// Sub-field problems (non-numeric apps, bad coordinates) are not errors;
/// they are reported through `Degradation` on an accepted record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line does not split into the expected number of tab-separated fields
    #[error("malformed line: expected {expected} tab-separated fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// First field is empty
    #[error("malformed line: empty device type")]
    EmptyDeviceType,

    /// Second field is empty
    #[error("malformed line: empty device id")]
    EmptyDeviceId,
}

impl ParseError {
    /// Create a field count error
    #[inline]
    pub fn field_count(actual: usize) -> Self {
        Self::FieldCount {
            expected: crate::FIELD_COUNT,
            actual,
        }
    }
}

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Input line was rejected
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Stored payload is not a valid `UserApps` message
    #[error("invalid UserApps payload: {0}")]
    Decode(#[from] prost::DecodeError),
}
