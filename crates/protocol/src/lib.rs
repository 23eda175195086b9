//! Appsload Protocol - Installed-apps records and their wire format
//!
//! This crate provides the types that flow through the loader:
//! - `DeviceType` - Device-type tag used for routing decisions
//! - `ParsedRecord` - One parsed TSV line, borrowing from the raw bytes
//! - `Degradation` - Tolerated sub-field failures on an accepted record
//! - `UserApps` - Protobuf message stored in the key-value store
//! - `EncodedRecord` - Store key plus serialized `UserApps` payload
//!
//! # Input Format
//!
//! One record per line, five tab-separated fields:
//!
//! ```text
//! device_type \t device_id \t lat \t lon \t app_id,app_id,...
//! ```
//!
//! # Example
//!
//! ```
//! use appsload_protocol::{encode, parse};
//!
//! let record = parse(b"idfa\tid123\t55.55\t37.37\t42,43,44").unwrap();
//! assert_eq!(record.apps, vec![42, 43, 44]);
//!
//! let encoded = encode(&record);
//! assert_eq!(encoded.key, "idfa:id123");
//! ```

mod decode;
mod device;
mod encode;
mod error;

pub use decode::{Degradation, FIELD_COUNT, ParsedRecord, parse};
pub use device::DeviceType;
pub use encode::{EncodedRecord, UserApps, encode, record_key};
pub use error::{ParseError, ProtocolError};

// Re-export bytes for convenience
pub use bytes::Bytes;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
