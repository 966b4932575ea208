use super::*;

fn temp_store() -> (FileStore, PathBuf) {
    let path =
        std::env::temp_dir().join(format!("ticketbridge-snapshot-{}.json", uuid::Uuid::new_v4()));
    (FileStore::new(&path), path)
}

// =============================================================================
// MemoryStore
// =============================================================================

#[test]
fn memory_store_get_missing_key() {
    let store = MemoryStore::new();
    assert_eq!(store.get(TOKEN_KEY), None);
}

#[test]
fn memory_store_set_then_get() {
    let store = MemoryStore::new();
    store.set(TOKEN_KEY, "abc123");
    assert_eq!(store.get(TOKEN_KEY), Some("abc123".to_owned()));
}

#[test]
fn memory_store_set_overwrites() {
    let store = MemoryStore::new();
    store.set(TOKEN_KEY, "first");
    store.set(TOKEN_KEY, "second");
    assert_eq!(store.get(TOKEN_KEY), Some("second".to_owned()));
}

#[test]
fn memory_store_remove_clears_key() {
    let store = MemoryStore::new();
    store.set(USER_KEY, "{}");
    store.remove(USER_KEY);
    assert_eq!(store.get(USER_KEY), None);
}

#[test]
fn memory_store_keys_are_independent() {
    let store = MemoryStore::new();
    store.set(TOKEN_KEY, "tok");
    store.set(USER_KEY, "{}");
    store.remove(TOKEN_KEY);
    assert_eq!(store.get(USER_KEY), Some("{}".to_owned()));
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_empty() {
    let (store, path) = temp_store();
    assert_eq!(store.get(TOKEN_KEY), None);
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_store_round_trips_keys() {
    let (store, path) = temp_store();
    store.set(TOKEN_KEY, "deadbeef");
    store.set(USER_KEY, r#"{"username":"ana"}"#);

    // A fresh store over the same path sees the persisted values.
    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(TOKEN_KEY), Some("deadbeef".to_owned()));
    assert_eq!(reopened.get(USER_KEY), Some(r#"{"username":"ana"}"#.to_owned()));
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_store_remove_leaves_valid_file() {
    let (store, path) = temp_store();
    store.set(TOKEN_KEY, "tok");
    store.remove(TOKEN_KEY);
    assert_eq!(store.get(TOKEN_KEY), None);

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: std::collections::HashMap<String, String> = serde_json::from_str(&raw).unwrap();
    assert!(parsed.is_empty());
    let _ = std::fs::remove_file(path);
}

#[test]
fn file_store_corrupt_file_reads_empty() {
    let (store, path) = temp_store();
    std::fs::write(&path, "not json {{{").unwrap();
    assert_eq!(store.get(TOKEN_KEY), None);
    let _ = std::fs::remove_file(path);
}
