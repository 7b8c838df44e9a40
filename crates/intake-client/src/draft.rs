//! Local draft store
//!
//! One JSON object of field name to last-known value, kept under a single
//! storage key per form. Never sent to the server.

use crate::storage::SessionStorage;
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Draft of one form instance
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl DraftStore {
    /// Draft kept under `key`
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record the latest value of one field
    pub fn save(&self, name: &str, value: &str) -> Result<()> {
        let mut draft = self.read();
        draft.insert(name.to_string(), value.to_string());
        let encoded = serde_json::to_string(&draft)
            .map_err(|e| crate::ClientError::Storage(e.to_string()))?;
        self.storage.set_item(&self.key, &encoded)
    }

    /// Every saved value; empty when nothing (or nothing readable) is stored
    pub fn load_all(&self) -> BTreeMap<String, String> {
        self.read()
    }

    /// Drop the whole draft
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }

    fn read(&self) -> BTreeMap<String, String> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!("Draft {} unreadable, starting empty: {}", self.key, e);
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Draft {} malformed, starting empty: {}", self.key, e);
            BTreeMap::new()
        })
    }
}
