//! Record encoder for the key-value store
//!
//! Serializes a `ParsedRecord` into a `UserApps` protobuf message and derives
//! its store key.
//!
//! # Schema
//!
//! Mirrors `proto/appsinstalled.proto`:
//!
//! ```text
//! message UserApps {
//!     repeated int64 apps = 1;
//!     optional double lat = 2;
//!     optional double lon = 3;
//! }
//! ```
//!
//! # Key Format
//!
//! `"<device_type>:<device_id>"` with both parts taken verbatim. There is no
//! escaping, so a device id containing `:` can collide with another key.

use bytes::Bytes;
use prost::Message;

use crate::ParsedRecord;

/// Installed apps of one device, as stored in the key-value store
#[derive(Clone, PartialEq, Message)]
pub struct UserApps {
    /// Installed app ids
    #[prost(int64, repeated, packed = "false", tag = "1")]
    pub apps: Vec<i64>,

    /// Latitude
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,

    /// Longitude
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
}

impl UserApps {
    /// Build the message for a parsed record
    pub fn from_record(record: &ParsedRecord<'_>) -> Self {
        Self {
            apps: record.apps.clone(),
            lat: Some(record.lat),
            lon: Some(record.lon),
        }
    }

    /// Decode a stored payload
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Decode` if the bytes are not a valid message.
    pub fn from_bytes(payload: &[u8]) -> crate::Result<Self> {
        Ok(Self::decode(payload)?)
    }
}

/// Store key plus serialized payload for one record
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    /// `"<device_type>:<device_id>"`
    pub key: String,

    /// Serialized `UserApps` message
    pub payload: Bytes,
}

impl EncodedRecord {
    /// Payload size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty (a record with no apps and no geo)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Encode a parsed record into its store key and payload
pub fn encode(record: &ParsedRecord<'_>) -> EncodedRecord {
    let message = UserApps::from_record(record);

    EncodedRecord {
        key: record_key(record.device_type, record.device_id),
        payload: Bytes::from(message.encode_to_vec()),
    }
}

/// Build the store key `"<device_type>:<device_id>"`
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
pub fn record_key(device_type: &[u8], device_id: &[u8]) -> String {
    let mut key = String::with_capacity(device_type.len() + device_id.len() + 1);
    key.push_str(&String::from_utf8_lossy(device_type));
    key.push(':');
    key.push_str(&String::from_utf8_lossy(device_id));
    key
}
