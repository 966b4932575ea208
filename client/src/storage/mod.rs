//! Persisted session snapshot storage.
//!
//! DESIGN
//! ======
//! The snapshot is plain key-value storage with two keys: `token` holds the
//! raw session token and `user` the JSON-serialized user record. Only the
//! auth controller writes it. Persistence is best-effort — the in-memory
//! session stays authoritative, so a failed write is logged and otherwise
//! ignored.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Snapshot key for the raw session token.
pub const TOKEN_KEY: &str = "token";
/// Snapshot key for the JSON-serialized user record.
pub const USER_KEY: &str = "user";

/// Durable client-side key-value storage surviving process restarts.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Ephemeral store for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

/// File-backed store: a single JSON object, rewritten whole on every change.
///
/// Read/parse failures are treated as an empty snapshot; the auth
/// controller's corruption handling covers a half-written `user` value.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn save(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = std::fs::create_dir_all(parent) {
                    let path = self.path.display();
                    tracing::warn!(%path, %error, "snapshot dir creation failed");
                    return;
                }
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(rendered) => {
                if let Err(error) = std::fs::write(&self.path, rendered) {
                    tracing::warn!(path = %self.path.display(), %error, "snapshot write failed");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "snapshot serialization failed");
            }
        }
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.load();
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}
