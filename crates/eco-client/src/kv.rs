//! String key-value storage backing the client cache.
//!
//! The cache used to be ambient browser storage. Here it is an injectable
//! object so tests can hand the client an in-memory instance.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::{CacheError, CacheResult};

/// Flat string-to-string storage.
///
/// Writes are last-writer-wins. Implementations must be thread-safe.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `None` if the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write (create or replace) a value.
    fn set(&self, key: &str, value: String) -> CacheResult<()>;

    /// Write several values.
    ///
    /// Default implementation calls `set()` for each entry. Backends may
    /// override to apply the batch with a single write.
    fn set_many(&self, entries: Vec<(&str, String)>) -> CacheResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory key-value store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> CacheResult<()> {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

}

/// Key-value store persisted as one JSON object file.
///
/// Every write replaces the file atomically (temp file + rename). A missing
/// file is an empty store; an unreadable one is treated as empty too, since
/// the cache is only ever a best-effort copy of the authoritative ledger.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> CacheResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable cache file");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, op: impl FnOnce(&mut BTreeMap<String, String>)) -> CacheResult<()> {
        let mut entries = self.entries.lock().expect("lock poisoned");
        let mut next = entries.clone();
        op(&mut next);
        write_atomic(&self.path, &next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> CacheResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn set_many(&self, batch: Vec<(&str, String)>) -> CacheResult<()> {
        self.update(|entries| {
            for (key, value) in batch {
                entries.insert(key.to_string(), value);
            }
        })
    }
}

fn write_atomic(path: &Path, entries: &BTreeMap<String, String>) -> CacheResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let data =
        serde_json::to_vec_pretty(entries).map_err(|e| CacheError::Serialization(e.to_string()))?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| CacheError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get() {
        let kv = MemoryKeyValueStore::new();
        assert!(kv.is_empty());
        kv.set("a", "1".into()).unwrap();
        assert_eq!(kv.get("a").as_deref(), Some("1"));
        kv.set("a", "2".into()).unwrap();
        assert_eq!(kv.get("a").as_deref(), Some("2"));
        assert_eq!(kv.get("b"), None);
    }

    #[test]
    fn memory_set_many() {
        let kv = MemoryKeyValueStore::new();
        kv.set_many(vec![("a", "1".into()), ("b", "2".into())]).unwrap();
        assert_eq!(kv.len(), 2);
    }

    #[test]
    fn file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        {
            let kv = FileKeyValueStore::open(&path).unwrap();
            kv.set_many(vec![("userPoints", "700".into()), ("plantsPlanted", "[]".into())])
                .unwrap();
            kv.set("userPoints", "650".into()).unwrap();
        }
        let kv = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(kv.get("userPoints").as_deref(), Some("650"));
        assert_eq!(kv.get("plantsPlanted").as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::open(dir.path().join("nope.json")).unwrap();
        assert_eq!(kv.get("userPoints"), None);
        assert!(!kv.path().exists());
    }

    #[test]
    fn file_store_garbage_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();
        let kv = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(kv.get("userPoints"), None);
        kv.set("userPoints", "1".into()).unwrap();
        assert_eq!(FileKeyValueStore::open(&path).unwrap().get("userPoints").as_deref(), Some("1"));
    }

    #[test]
    fn failed_write_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let kv = FileKeyValueStore::open(&path).unwrap();
        kv.set("userPoints", "10".into()).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert!(kv.set("userPoints", "20".into()).is_err());
        assert_eq!(kv.get("userPoints").as_deref(), Some("10"));
    }

    #[test]
    fn file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let kv = FileKeyValueStore::open(&path).unwrap();
        kv.set("k", "v".into()).unwrap();
        assert!(path.exists());
    }
}
