//! End-to-end batch runs against a fake memcached and in-memory stores

use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use appsload::cmd::run::{run, run_with_router};
use appsload_config::Config;
use appsload_pipeline::Router;
use appsload_protocol::UserApps;
use appsload_sinks::{MemoryStore, Store};

type Received = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

/// Fake memcached answering `STORED` to every set
async fn fake_memcached() -> (SocketAddr, Received) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received: Received = Arc::default();

    let sink = Arc::clone(&received);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                let mut socket = BufReader::new(socket);
                loop {
                    let mut header = String::new();
                    if socket.read_line(&mut header).await.unwrap_or(0) == 0 {
                        return;
                    }
                    let parts: Vec<&str> = header.split_whitespace().collect();
                    let len: usize = parts[4].parse().unwrap();
                    let mut body = vec![0u8; len + 2];
                    socket.read_exact(&mut body).await.unwrap();
                    body.truncate(len);

                    sink.lock().unwrap().push((parts[1].to_string(), body));
                    socket.get_mut().write_all(b"STORED\r\n").await.unwrap();
                }
            });
        }
    });

    (addr, received)
}

fn write_gz(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

fn memory_router(stores: &[(&str, Arc<MemoryStore>)]) -> Arc<Router> {
    let router = Router::from_stores(
        stores
            .iter()
            .map(|(device, store)| (*device, Arc::clone(store) as Arc<dyn Store>)),
    )
    .unwrap();
    Arc::new(router)
}

fn config_for(dir: &Path, address: Option<SocketAddr>) -> Config {
    let mut config = Config::default();
    config.loader.pattern = format!("{}/*.tsv.gz", dir.display());
    config.loader.workers = 4;
    if let Some(address) = address {
        for device in ["idfa", "gaid", "adid", "dvid"] {
            config
                .devices
                .set_address(device, address.to_string())
                .unwrap();
        }
    }
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_run_writes_to_memcached_and_marks_files() {
    let (addr, received) = fake_memcached().await;
    let dir = tempfile::tempdir().unwrap();
    write_gz(
        dir.path(),
        "20170929000000.tsv.gz",
        &[
            "idfa\t1rfw452y52g2gq4g\t55.55\t42.42\t1423,43,567,3,7,23",
            "gaid\t7rfw452y52g2gq4g\t55.55\t42.42\t7423,424",
            "dvid\tdev1\t1.0\t2.0\t5",
        ],
    );

    let summary = run(&config_for(dir.path(), Some(addr))).await.unwrap();

    assert_eq!(summary.files_loaded, 1);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.errors, 0);
    assert!(dir.path().join(".20170929000000.tsv.gz").exists());

    let received = received.lock().unwrap().clone();
    let mut keys: Vec<_> = received.iter().map(|(k, _)| k.as_str()).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["dvid:dev1", "gaid:7rfw452y52g2gq4g", "idfa:1rfw452y52g2gq4g"]
    );

    let (_, payload) = received
        .iter()
        .find(|(k, _)| k == "gaid:7rfw452y52g2gq4g")
        .unwrap();
    let decoded = UserApps::from_bytes(payload).unwrap();
    assert_eq!(decoded.apps, vec![7423, 424]);
    assert_eq!(decoded.lat, Some(55.55));
    assert_eq!(decoded.lon, Some(42.42));
}

#[tokio::test]
async fn test_run_with_unreachable_stores_still_marks() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    write_gz(dir.path(), "a.tsv.gz", &["idfa\tx\t1\t1\t1", "gaid\ty\t1\t1\t2"]);

    let summary = run(&config_for(dir.path(), Some(addr))).await.unwrap();

    assert_eq!(summary.files_loaded, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.errors, 2);
    assert!(dir.path().join(".a.tsv.gz").exists());
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let (addr, received) = fake_memcached().await;
    let dir = tempfile::tempdir().unwrap();
    write_gz(dir.path(), "a.tsv.gz", &["idfa\tx\t1\t1\t1"]);

    let mut config = config_for(dir.path(), Some(addr));
    config.loader.dry_run = true;
    let summary = run(&config).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert!(received.lock().unwrap().is_empty());
    assert!(dir.path().join(".a.tsv.gz").exists());
}

#[tokio::test]
async fn test_run_with_memory_router_over_several_files() {
    let dir = tempfile::tempdir().unwrap();
    write_gz(
        dir.path(),
        "1.tsv.gz",
        &["idfa\ta\t1\t1\t1", "bogus\tb\t1\t1\t1", "broken line"],
    );
    write_gz(dir.path(), "2.tsv.gz", &["adid\tc\t1\t1\t3,x"]);
    write_gz(dir.path(), ".0.tsv.gz", &["idfa\told\t1\t1\t1"]);

    let stores: Vec<(&str, Arc<MemoryStore>)> = ["idfa", "gaid", "adid", "dvid"]
        .into_iter()
        .map(|device| (device, Arc::new(MemoryStore::new(device))))
        .collect();
    let config = config_for(dir.path(), None);
    let summary = run_with_router(&config, memory_router(&stores))
        .await
        .unwrap();

    assert_eq!(summary.files_loaded, 2);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.errors, 2);
    assert_eq!(stores[0].1.keys(), vec!["idfa:a".to_string()]);
    assert_eq!(stores[2].1.keys(), vec!["adid:c".to_string()]);

    let again = run_with_router(&config, memory_router(&stores))
        .await
        .unwrap();
    assert_eq!(again.files_seen(), 0);
}

#[tokio::test]
async fn test_invalid_pattern_is_an_error() {
    let mut config = Config::default();
    config.loader.pattern = "[".into();
    let err = run(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to load files"));
}
