//! Batch driver tests

use tempfile::TempDir;

use crate::test_util::{Stores, good_lines, write_gz};
use crate::{BatchDriver, BatchSummary, FilePipeline, PipelineError, PipelineOptions, find_files};

fn driver(stores: &Stores) -> BatchDriver {
    BatchDriver::new(FilePipeline::new(
        stores.router(),
        PipelineOptions::default(),
    ))
}

fn pattern(dir: &TempDir) -> String {
    format!("{}/*.tsv.gz", dir.path().display())
}

// =============================================================================
// File discovery
// =============================================================================

#[test]
fn test_find_files_skips_marked_and_hidden() {
    let dir = TempDir::new().unwrap();
    write_gz(dir.path(), "b.tsv.gz", &[]);
    write_gz(dir.path(), "a.tsv.gz", &[]);
    write_gz(dir.path(), ".c.tsv.gz", &[]);
    write_gz(dir.path(), "d.txt", &[]);

    let files = find_files(&pattern(&dir)).unwrap();

    assert_eq!(
        files,
        vec![dir.path().join("a.tsv.gz"), dir.path().join("b.tsv.gz")]
    );
}

#[test]
fn test_find_files_skips_directories() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("nested.tsv.gz")).unwrap();
    write_gz(dir.path(), "a.tsv.gz", &[]);

    let files = find_files(&pattern(&dir)).unwrap();
    assert_eq!(files, vec![dir.path().join("a.tsv.gz")]);
}

#[test]
fn test_find_files_no_match() {
    let dir = TempDir::new().unwrap();
    assert!(find_files(&pattern(&dir)).unwrap().is_empty());
}

#[test]
fn test_find_files_invalid_pattern() {
    let err = find_files("data/[").unwrap_err();
    assert!(matches!(err, PipelineError::Pattern(_)));
}

// =============================================================================
// Batch runs
// =============================================================================

#[tokio::test]
async fn test_run_loads_every_file() {
    let dir = TempDir::new().unwrap();
    let lines = good_lines(10);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_gz(dir.path(), "a.tsv.gz", &refs);
    write_gz(dir.path(), "b.tsv.gz", &["gaid\tg1\t0\t0\t1", "bad line"]);
    let stores = Stores::new();

    let summary = driver(&stores).run(&pattern(&dir)).await.unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            files_loaded: 2,
            files_failed: 0,
            processed: 11,
            errors: 1,
        }
    );
    assert!(dir.path().join(".a.tsv.gz").exists());
    assert!(dir.path().join(".b.tsv.gz").exists());
    assert_eq!(stores.total(), 11);
}

#[tokio::test]
async fn test_rerun_over_marked_directory_is_noop() {
    let dir = TempDir::new().unwrap();
    write_gz(dir.path(), "a.tsv.gz", &["idfa\t1\t0\t0\t1"]);
    write_gz(dir.path(), "b.tsv.gz", &["idfa\t2\t0\t0\t2"]);
    let stores = Stores::new();
    let driver = driver(&stores);

    let first = driver.run(&pattern(&dir)).await.unwrap();
    assert_eq!(first.files_loaded, 2);

    let second = driver.run(&pattern(&dir)).await.unwrap();
    assert_eq!(second, BatchSummary::default());
    assert_eq!(second.files_seen(), 0);
    assert_eq!(stores.idfa.len(), 2);
}

#[tokio::test]
async fn test_failed_file_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.tsv.gz"), b"not gzip").unwrap();
    write_gz(dir.path(), "b.tsv.gz", &["idfa\t1\t0\t0\t1"]);
    let stores = Stores::new();

    let summary = driver(&stores).run(&pattern(&dir)).await.unwrap();

    assert_eq!(summary.files_loaded, 1);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.processed, 1);
    assert!(dir.path().join("a.tsv.gz").exists());
    assert!(dir.path().join(".b.tsv.gz").exists());
}

#[tokio::test]
async fn test_failed_file_is_retried_next_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.tsv.gz");
    std::fs::write(&path, b"not gzip").unwrap();
    let stores = Stores::new();
    let driver = driver(&stores);

    let first = driver.run(&pattern(&dir)).await.unwrap();
    assert_eq!(first.files_failed, 1);

    write_gz(dir.path(), "a.tsv.gz", &["idfa\t1\t0\t0\t1"]);
    let second = driver.run(&pattern(&dir)).await.unwrap();
    assert_eq!(second.files_loaded, 1);
    assert_eq!(stores.idfa.len(), 1);
}

#[tokio::test]
async fn test_run_invalid_pattern() {
    let stores = Stores::new();
    let err = driver(&stores).run("[").await.unwrap_err();
    assert!(matches!(err, PipelineError::Pattern(_)));
}
