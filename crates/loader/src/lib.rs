//! Appsload - installed-apps batch loader
//!
//! Loads gzip TSV logs of installed apps into one memcached endpoint per
//! device type, marking each file as completed once it has been read.
//!
//! # Modules
//!
//! - `cli` - command-line arguments and config overrides
//! - `logging` - tracing subscriber setup
//! - `cmd::run` - build stores and router, run the batch
//! - `cmd::selftest` - encode/decode round trip over sample lines

pub mod cli;
pub mod cmd;
pub mod logging;
