//! Local key/value stores backing the note collection.
use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{Result, StudyError};

/// A string-keyed store holding one serialized document per key.
pub trait KeyValueStore: Send {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                StudyError::DirectoryError { path: dir.clone() }
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        trace!("Reading slot {} from {}", key, path.display());
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(StudyError::Io(e))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);

        // Write next to the target so the final rename stays on one filesystem
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            StudyError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        debug!("Persisting slot {} to {}", key, path.display());
        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            StudyError::Io(e.error)
        })?;

        Ok(())
    }
}

/// In-memory store. Clones share the same map, which lets tests "reload"
/// a store by opening a second one over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<Mutex<bool>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, as a full browser store would.
    pub fn set_reject_writes(&self, reject: bool) {
        if let Ok(mut flag) = self.reject_writes.lock() {
            *flag = reject;
        }
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| StudyError::ApplicationError {
            message: "Failed to acquire lock on memory store".to_string(),
        })
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let rejecting = self.reject_writes.lock().map(|flag| *flag).unwrap_or(false);
        if rejecting {
            return Err(StudyError::PersistenceWrite {
                slot: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        self.lock_entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();
        assert_eq!(store.get("ssn-notes").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrites_value() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("data")).unwrap();

        store.set("ssn-notes", "[1]").unwrap();
        store.set("ssn-notes", "[2]").unwrap();

        assert_eq!(store.get("ssn-notes").unwrap().as_deref(), Some("[2]"));
        assert!(dir.path().join("data").join("ssn-notes.json").exists());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryKvStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_rejects_writes() {
        let store = MemoryKvStore::new();
        store.set_reject_writes(true);
        assert!(matches!(
            store.set("k", "v"),
            Err(StudyError::PersistenceWrite { .. })
        ));
        assert_eq!(store.get("k").unwrap(), None);
    }
}
