//! Batch run
//!
//! Builds one memcached store per device type, wires them into a router and
//! loads every file matching the configured pattern.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use appsload_config::{Config, DevicesConfig};
use appsload_pipeline::{BatchDriver, BatchSummary, FilePipeline, PipelineOptions, Router};
use appsload_sinks::{MemcacheConfig, MemcacheStore, Store};

/// Run one batch against the configured memcached endpoints
///
/// # Errors
///
/// Fails if the router cannot be built or the input pattern is invalid.
/// Per-file failures are logged and counted in the summary instead.
pub async fn run(config: &Config) -> Result<BatchSummary> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        pattern = %config.loader.pattern,
        workers = config.loader.workers,
        dry_run = config.loader.dry_run,
        "appsload started"
    );

    let stores = build_stores(&config.devices);
    let router = Router::from_stores(
        stores
            .iter()
            .map(|(device, store)| (*device, Arc::clone(store) as Arc<dyn Store>)),
    )
    .context("failed to build device routing")?;

    for destination in router.destinations() {
        info!(destination = destination.name(), "store configured");
    }
    info!(destinations = router.destination_count(), "routing ready");

    let result = run_with_router(config, Arc::new(router)).await;

    for (device, store) in &stores {
        let snapshot = store.snapshot();
        info!(
            device,
            sets_ok = snapshot.sets_ok,
            sets_failed = snapshot.sets_failed,
            bytes_written = snapshot.bytes_written,
            connections_opened = snapshot.connections_opened,
            "store summary"
        );
        store.close();
    }

    result
}

/// Run one batch with an already built router
///
/// # Errors
///
/// Fails if the input pattern is invalid.
pub async fn run_with_router(config: &Config, router: Arc<Router>) -> Result<BatchSummary> {
    let options = PipelineOptions::default()
        .with_workers(config.loader.workers)
        .with_dry_run(config.loader.dry_run)
        .with_error_rate_threshold(config.loader.error_rate_threshold);

    let driver = BatchDriver::new(FilePipeline::new(router, options));

    driver
        .run(&config.loader.pattern)
        .await
        .with_context(|| format!("failed to load files matching {}", config.loader.pattern))
}

/// One memcached store per configured device type
pub fn build_stores(devices: &DevicesConfig) -> Vec<(&'static str, Arc<MemcacheStore>)> {
    devices
        .iter()
        .map(|(device, endpoint)| {
            let config = MemcacheConfig::new(&endpoint.address)
                .with_max_pool_size(endpoint.max_pool_size)
                .with_connect_timeout(endpoint.connect_timeout)
                .with_io_timeout(endpoint.timeout);
            (device, Arc::new(MemcacheStore::new(device, config)))
        })
        .collect()
}
