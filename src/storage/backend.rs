//! Key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, the local persistence the
//! collection store writes its snapshots to. It mirrors the browser-style
//! "local storage" model: a flat namespace of string keys holding string
//! values, with no transactions and no change notification.
//!
//! # Design Philosophy
//!
//! The trait is deliberately minimal. Snapshot encoding lives in
//! [`crate::storage::snapshot`], so backends only move strings around.

use crate::domain::error::Result;

/// Abstraction over local key-value persistence.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): one JSON file per key with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map, shareable between handles
///
/// # Examples
///
/// ```
/// use shelfmark::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("books", "[]")?;
/// assert_eq!(store.get("books")?.as_deref(), Some("[]"));
/// # Ok::<(), shelfmark::ShelfmarkError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (storage full, read-only, I/O).
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&mut self, key: &str) -> Result<()>;
}
