//! Shared fixtures for pipeline tests

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appsload_sinks::{MemoryStore, Store};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::Router;

/// In-memory stores for the four known device types
pub struct Stores {
    pub idfa: Arc<MemoryStore>,
    pub gaid: Arc<MemoryStore>,
    pub adid: Arc<MemoryStore>,
    pub dvid: Arc<MemoryStore>,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            idfa: Arc::new(MemoryStore::new("idfa")),
            gaid: Arc::new(MemoryStore::new("gaid")),
            adid: Arc::new(MemoryStore::new("adid")),
            dvid: Arc::new(MemoryStore::new("dvid")),
        }
    }

    /// Keys stored across all four stores
    pub fn total(&self) -> usize {
        self.idfa.len() + self.gaid.len() + self.adid.len() + self.dvid.len()
    }

    pub fn router(&self) -> Arc<Router> {
        let stores: [(&str, Arc<dyn Store>); 4] = [
            ("idfa", self.idfa.clone() as Arc<dyn Store>),
            ("gaid", self.gaid.clone() as Arc<dyn Store>),
            ("adid", self.adid.clone() as Arc<dyn Store>),
            ("dvid", self.dvid.clone() as Arc<dyn Store>),
        ];
        Arc::new(Router::from_stores(stores).unwrap())
    }
}

/// Gzip-compress lines joined with `\n` (with a trailing newline)
pub fn gz_bytes(lines: &[&str]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for line in lines {
        encoder.write_all(line.as_bytes()).unwrap();
        encoder.write_all(b"\n").unwrap();
    }
    encoder.finish().unwrap()
}

/// Write a gzip file into `dir`
pub fn write_gz(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, gz_bytes(lines)).unwrap();
    path
}

/// `count` well-formed idfa lines with distinct ids
pub fn good_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("idfa\tdevice{i}\t55.55\t37.37\t{i},2,3"))
        .collect()
}
