//! # Durable Key-Value Storage
//!
//! A tiny string-to-string store that survives restarts. It holds two keys:
//! the session token (`userToken`) and the dark-mode flag (`darkMode`).
//!
//! ## File Format
//! ```json
//! {
//!   "darkMode": "true",
//!   "userToken": "alice:3f2b8c1d9e0a4b7c8d6e5f4a3b2c1d0e"
//! }
//! ```
//!
//! The whole file is rewritten on every change: the new contents go to a
//! sibling `.tmp` file which is then renamed over the old one. The
//! in-memory map only changes once the rename succeeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Store Trait
// =============================================================================

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> ClientResult<MutexGuard<'_, Entries>> {
    entries
        .lock()
        .map_err(|_| ClientError::StorageFailed("storage lock poisoned".into()))
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-file backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Opens the store at `path`, creating nothing until the first write.
    ///
    /// ## Errors
    /// [`ClientError::StorageCorrupt`] if the file exists but is not a JSON
    /// object of strings.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Entries::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| ClientError::StorageCorrupt(format!("{}: {}", path.display(), e)))?
            }
        } else {
            debug!(?path, "Storage file not found, starting empty");
            Entries::new()
        };

        info!(?path, keys = entries.len(), "Opened storage");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::StorageFailed(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = lock(&self.entries)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = lock(&self.entries)?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Volatile store for tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("userToken").unwrap(), None);

        store.set("userToken", "abc").unwrap();
        assert_eq!(store.get("userToken").unwrap().as_deref(), Some("abc"));

        store.remove("userToken").unwrap();
        store.remove("userToken").unwrap();
        assert_eq!(store.get("userToken").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert!(!path.exists());
        store.set("darkMode", "true").unwrap();
        store.set("userToken", "alice:token").unwrap();
        store.remove("userToken").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("true"));
        assert_eq!(reopened.get("userToken").unwrap(), None);
    }

    #[test]
    fn test_file_store_failed_write_keeps_memory_and_disk_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("darkMode", "false").unwrap();

        // A directory at the target path makes the rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.set("darkMode", "true").unwrap_err();
        assert!(err.is_storage_error());
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
        assert!(!path.with_extension("tmp").exists());

        std::fs::remove_dir(&path).unwrap();
        store.set("userToken", "alice:token").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("darkMode").unwrap().as_deref(), Some("false"));
        assert_eq!(reopened.get("userToken").unwrap().as_deref(), Some("alice:token"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.is_storage_error());
        assert!(matches!(err, ClientError::StorageCorrupt(_)));
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("darkMode").unwrap(), None);
    }
}
