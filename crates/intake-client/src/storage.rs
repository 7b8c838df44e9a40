//! Session storage backends
//!
//! Synchronous string key/value stores standing in for the browser's
//! session-scoped storage.

use crate::{ClientError, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// String key/value store readable and writable synchronously
pub trait SessionStorage: Send + Sync {
    /// Read an item
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Write an item
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Delete an item; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory storage (lives as long as the process)
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }
}

/// Storage persisted as one JSON object file, so it outlives the process
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use the given file; it is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }

    fn read_items(&self) -> Result<HashMap<String, String>> {
        match self.read_raw()? {
            Some(content) => serde_json::from_str(&content)
                .map_err(|e| ClientError::Storage(format!("{}: {e}", self.path.display()))),
            None => Ok(HashMap::new()),
        }
    }

    /// Items to rewrite; a malformed file is replaced rather than kept.
    ///
    /// The flag is set when the file must be rewritten even if nothing changes.
    fn items_for_write(&self) -> Result<(HashMap<String, String>, bool)> {
        let Some(content) = self.read_raw()? else {
            return Ok((HashMap::new(), false));
        };
        match serde_json::from_str(&content) {
            Ok(items) => Ok((items, false)),
            Err(e) => {
                warn!("Discarding malformed session file {}: {}", self.path.display(), e);
                Ok((HashMap::new(), true))
            }
        }
    }

    fn write_items(&self, items: &HashMap<String, String>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;

        let content =
            serde_json::to_vec_pretty(items).map_err(|e| ClientError::Storage(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tmp.write_all(&content)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let (mut items, _) = self.items_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let (mut items, discarded) = self.items_for_write()?;
        if items.remove(key).is_some() || discarded {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a").unwrap(), None);

        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));

        storage.remove_item("a").unwrap();
        storage.remove_item("a").unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStorage::new(&path).set_item("draft", "{\"name\":\"Jane\"}").unwrap();
        FileStorage::new(&path).set_item("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item("draft").unwrap().as_deref(),
            Some("{\"name\":\"Jane\"}")
        );

        reopened.remove_item("draft").unwrap();
        assert_eq!(reopened.get_item("draft").unwrap(), None);
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get_item("draft").unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
    }

    #[test]
    fn test_file_storage_corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        storage.set_item("draft", "{\"name\":\"Jane\"}").unwrap();
        assert_eq!(
            storage.get_item("draft").unwrap().as_deref(),
            Some("{\"name\":\"Jane\"}")
        );

        std::fs::write(&path, "not json").unwrap();
        storage.remove_item("draft").unwrap();
        assert_eq!(storage.get_item("draft").unwrap(), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
    }
}
