//! In-memory key-value backend.

use crate::domain::error::{Result, ShelfmarkError};
use crate::storage::backend::KeyValueStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Process-local key-value store.
///
/// Clones share the same underlying map, so a handle kept outside a
/// [`CollectionStore`](crate::app::CollectionStore) observes everything the
/// store persists. Writes can be disabled to emulate a full or read-only
/// browser storage area.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writable: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, writable store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            writable: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Enables or disables writes for every handle sharing this store.
    ///
    /// While disabled, `set` and `remove` fail with a storage error and leave
    /// the stored values untouched.
    pub fn set_writable(&self, writable: bool) {
        self.writable.store(writable, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` if no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<()> {
        if self.writable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ShelfmarkError::Storage("storage is not writable".into()))
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ShelfmarkError::Storage("lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ShelfmarkError::Storage("lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_writable()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ShelfmarkError::Storage("lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}
