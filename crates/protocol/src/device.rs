//! Device type identification
//!
//! `DeviceType` names the advertising-id scheme a record belongs to and is the
//! key the routing table uses to pick a destination store.

use std::fmt;

/// Device-type tag for routing decisions
///
/// The loader recognizes a fixed, closed set of tags agreed upon with the
/// store's consumers. Arbitrary tags can still be constructed so that input
/// lines carrying unknown tags can be reported.
///
/// # Example
///
/// ```
/// use appsload_protocol::DeviceType;
///
/// let device = DeviceType::new("idfa");
/// assert_eq!(device.as_str(), "idfa");
/// assert!(DeviceType::KNOWN.contains(&device.as_str()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceType(String);

impl DeviceType {
    /// Apple advertising identifier
    pub const IDFA: &'static str = "idfa";
    /// Google advertising identifier
    pub const GAID: &'static str = "gaid";
    /// Android id
    pub const ADID: &'static str = "adid";
    /// Generic device id
    pub const DVID: &'static str = "dvid";

    /// All recognized tags, in configuration order
    pub const KNOWN: [&'static str; 4] = [Self::IDFA, Self::GAID, Self::ADID, Self::DVID];

    /// Create a new device type
    #[inline]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Create a device type from raw line bytes (lossy for invalid UTF-8)
    #[inline]
    pub fn from_bytes(tag: &[u8]) -> Self {
        Self(String::from_utf8_lossy(tag).into_owned())
    }

    /// Get the tag as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the tag as bytes (the form it has in input lines)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DeviceType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for DeviceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
