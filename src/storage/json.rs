//! JSON file-based key-value backend.
//!
//! Each key is stored as its own `<key>.json` file inside a data directory.
//! Writes go to a temporary file first and are then renamed over the target,
//! so a crash mid-write never leaves a truncated snapshot behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: one file read per `get`
//! - **Write**: O(n) in the snapshot size, whole value rewritten
//! - **Best for**: personal collections of a few thousand entries

use crate::domain::error::{Result, ShelfmarkError};
use crate::storage::backend::KeyValueStore;
use std::path::{Path, PathBuf};

/// Directory-backed key-value store.
///
/// # File Layout
///
/// ```text
/// <data_dir>/
///   books.json
///   categories.json
///   tags.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shelfmark::storage::JsonFileStore;
    ///
    /// let store = JsonFileStore::open("/tmp/shelfmark")?;
    /// # Ok::<(), shelfmark::ShelfmarkError>(())
    /// ```
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tracing::debug!(path = ?dir, "opening JSON file store");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ShelfmarkError::Storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            tracing::trace!(key, "key not present");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)?;
        tracing::trace!(key, bytes = contents.len(), "key read");
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, value)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!(key, bytes = value.len(), "key written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("books").unwrap(), None);
        store.set("books", r#"{"version":1,"items":[]}"#).unwrap();
        assert_eq!(
            store.get("books").unwrap().as_deref(),
            Some(r#"{"version":1,"items":[]}"#)
        );
        assert!(dir.path().join("books.json").exists());
        assert!(!dir.path().join("books.json.tmp").exists());
    }

    #[test]
    fn reopened_store_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonFileStore::open(dir.path()).unwrap();
            store.set("tags", "[]").unwrap();
        }
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("tags").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        store.set("categories", "[]").unwrap();
        store.remove("categories").unwrap();
        store.remove("categories").unwrap();
        assert_eq!(store.get("categories").unwrap(), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }
}
