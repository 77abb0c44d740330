//! Persistent cache store for the latest advisory and weekly plan
//!
//! The store is a narrow key-value interface over serialized JSON. Each key
//! holds at most one entry and every write replaces it; nothing expires.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AdvisoryError, WorkflowResult};

/// Key holding the latest advisory record
pub const ADVISORY_CACHE_KEY: &str = "kisan_advisory_cache";

/// Key holding the latest weekly plan
pub const WEEKLY_CACHE_KEY: &str = "kisan_weekly_cache";

/// Key-value store that survives restarts
pub trait CacheStore: Send + Sync {
    fn read(&self, key: &str) -> WorkflowResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> WorkflowResult<()>;
}

/// Read and deserialize `key`. Unreadable or corrupt entries count as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Option<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to read cache entry");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring corrupt cache entry");
            None
        }
    }
}

/// Serialize `value` and overwrite `key`
pub fn write_json<T: Serialize>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
) -> WorkflowResult<()> {
    let raw = serde_json::to_string(value)?;
    store.write(key, &raw)
}

/// Cache store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    directory: PathBuf,
}

impl FileCacheStore {
    /// Open a store rooted at `directory`, creating it if needed
    pub fn open(directory: impl AsRef<Path>) -> WorkflowResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|e| {
            AdvisoryError::Storage(format!(
                "Cannot create cache directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        Ok(Self { directory })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", file_name))
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self, key: &str) -> WorkflowResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AdvisoryError::Storage(format!("Cannot read {}: {}", key, e))),
        }
    }

    fn write(&self, key: &str, value: &str) -> WorkflowResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        // Write then rename so a crash never leaves a half-written entry
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| AdvisoryError::Storage(format!("Cannot write {}: {}", key, e)))
    }
}

/// In-process cache store
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, key: &str) -> WorkflowResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AdvisoryError::Storage("Cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> WorkflowResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AdvisoryError::Storage("Cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        value: u32,
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryCacheStore::new();
        write_json(&store, "k", &Entry { value: 1 }).unwrap();
        write_json(&store, "k", &Entry { value: 2 }).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(read_json::<Entry>(&store, "k"), Some(Entry { value: 2 }));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryCacheStore::new();
        assert_eq!(read_json::<Entry>(&store, ADVISORY_CACHE_KEY), None);
    }

    #[test]
    fn test_corrupt_entry_is_treated_as_absent() {
        let store = MemoryCacheStore::new();
        store.write(WEEKLY_CACHE_KEY, "{not json").unwrap();
        assert_eq!(read_json::<Entry>(&store, WEEKLY_CACHE_KEY), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCacheStore::open(dir.path()).unwrap();
            write_json(&store, ADVISORY_CACHE_KEY, &Entry { value: 7 }).unwrap();
        }

        let reopened = FileCacheStore::open(dir.path()).unwrap();
        assert_eq!(
            read_json::<Entry>(&reopened, ADVISORY_CACHE_KEY),
            Some(Entry { value: 7 })
        );
        assert!(dir.path().join("kisan_advisory_cache.json").exists());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::open(dir.path()).unwrap();
        store.write("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert_eq!(store.read("../escape").unwrap().as_deref(), Some("x"));
    }
}
