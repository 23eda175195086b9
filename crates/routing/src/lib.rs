//! Appsload - Routing
//!
//! Pre-compiled routing table for O(1) device type → destination lookup.
//!
//! # Design
//!
//! Routing decisions are made once at startup, not per record.
//! The `RoutingTable` maps each recognized device-type tag to the
//! `DestinationId` of the store that holds records of that type. The table
//! is immutable once built and is shared read-only by every worker.
//!
//! Lookups take the raw tag bytes straight from the input line, so the hot
//! path performs no allocation and no UTF-8 validation.
//!
//! # Example
//!
//! ```
//! use appsload_routing::{DestinationId, RoutingTableBuilder};
//!
//! let mut builder = RoutingTableBuilder::new();
//! builder.register_destination("memcache:idfa");
//! builder.add_route("idfa", "memcache:idfa").unwrap();
//! let table = builder.build().unwrap();
//!
//! assert_eq!(table.route(b"idfa").unwrap(), DestinationId::new(0));
//! assert!(table.route(b"unknown").is_err());
//! ```

mod destination_id;
mod error;
mod table;


pub use destination_id::DestinationId;
pub use error::{Result, RoutingError};
pub use table::{RoutingTable, RoutingTableBuilder};

// Re-export DeviceType for convenience
pub use appsload_protocol::DeviceType;
