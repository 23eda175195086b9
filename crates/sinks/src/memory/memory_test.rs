use super::*;

#[tokio::test]
async fn test_set_and_get() {
    let store = MemoryStore::new("idfa");
    assert!(store.is_empty());

    store.set("idfa:1", b"abc").await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("idfa:1"), Some(Bytes::from_static(b"abc")));
    assert_eq!(store.get("idfa:2"), None);
}

#[tokio::test]
async fn test_set_overwrites() {
    let store = MemoryStore::new("idfa");

    store.set("idfa:1", b"old").await.unwrap();
    store.set("idfa:1", b"new").await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("idfa:1"), Some(Bytes::from_static(b"new")));
    assert_eq!(store.snapshot().sets_ok, 2);
}

#[tokio::test]
async fn test_keys_are_sorted() {
    let store = MemoryStore::new("gaid");
    for key in ["gaid:c", "gaid:a", "gaid:b"] {
        store.set(key, b"").await.unwrap();
    }
    assert_eq!(store.keys(), vec!["gaid:a", "gaid:b", "gaid:c"]);
}

#[tokio::test]
async fn test_failing_store() {
    let store = MemoryStore::failing("adid");

    let err = store.set("adid:1", b"x").await.unwrap_err();
    assert!(matches!(err, SinkError::Closed));
    assert!(store.is_empty());
    assert_eq!(store.snapshot().sets_failed, 1);

    store.set_failing(false);
    store.set("adid:1", b"x").await.unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn test_name() {
    assert_eq!(MemoryStore::new("dvid").name(), "memory:dvid");
}

#[tokio::test]
async fn test_metrics() {
    let store = MemoryStore::new("idfa");
    store.set("idfa:1", b"12345").await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.sets_ok, 1);
    assert_eq!(snapshot.sets_failed, 0);
    assert_eq!(snapshot.bytes_written, 5);
    assert_eq!(snapshot.connections_opened, 0);
}
