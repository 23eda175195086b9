//! Destination identifier type
//!
//! `DestinationId` is a lightweight, Copy identifier for a store destination.

use std::fmt;

/// Destination identifier for routing
///
/// Indexes the destination list built alongside the routing table. `Copy`
/// and two bytes wide, so routing results can be passed around by value.
///
/// # Example
///
/// ```
/// use appsload_routing::DestinationId;
///
/// let dest = DestinationId::new(0);
/// let copy = dest;
/// assert_eq!(dest, copy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(u16);

impl DestinationId {
    /// Create a new destination ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the numeric index of this destination
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Get the index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dest:{}", self.0)
    }
}

impl From<u16> for DestinationId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

impl From<DestinationId> for usize {
    #[inline]
    fn from(id: DestinationId) -> Self {
        id.0 as usize
    }
}
