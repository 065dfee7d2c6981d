//! Versioned snapshot encoding for persisted entity lists.
//!
//! Every list is written as `{"version": 1, "items": [...]}`. Snapshots written
//! before the envelope existed are plain JSON arrays and are still accepted on
//! read.

use crate::domain::error::{Result, ShelfmarkError};
use crate::storage::backend::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Key holding the book list.
pub const BOOKS_KEY: &str = "books";

/// Key holding the category list.
pub const CATEGORIES_KEY: &str = "categories";

/// Key holding the tag list.
pub const TAGS_KEY: &str = "tags";

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

/// Serializes `items` into a versioned snapshot string.
///
/// # Errors
///
/// Returns an error if an item fails to serialize.
pub fn encode<T: Serialize>(items: &[T]) -> Result<String> {
    let json = serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        items,
    })?;
    Ok(json)
}

/// Parses a snapshot string written by [`encode`] or a legacy bare array.
///
/// # Errors
///
/// Returns an error on malformed JSON or a version newer than
/// [`SNAPSHOT_VERSION`].
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ShelfmarkError::Storage(format!("failed to parse snapshot: {e}")))?;

    let items = match value {
        Value::Array(_) => {
            tracing::debug!("reading legacy unversioned snapshot");
            value
        }
        Value::Object(mut envelope) => {
            let version = envelope
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| ShelfmarkError::Storage("snapshot has no version".to_string()))?;
            if version > u64::from(SNAPSHOT_VERSION) {
                return Err(ShelfmarkError::Storage(format!(
                    "unsupported snapshot version {version} (expected at most {SNAPSHOT_VERSION})"
                )));
            }
            envelope.remove("items").unwrap_or(Value::Array(Vec::new()))
        }
        _ => {
            return Err(ShelfmarkError::Storage(
                "snapshot is neither an envelope nor an array".to_string(),
            ))
        }
    };

    serde_json::from_value(items)
        .map_err(|e| ShelfmarkError::Storage(format!("invalid snapshot items: {e}")))
}

/// Reads and decodes the list stored under `key`.
///
/// Returns `Ok(None)` if the key is absent.
///
/// # Errors
///
/// Returns an error if the backend read fails or the snapshot cannot be decoded.
pub fn read<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<Vec<T>>> {
    store.get(key)?.map(|raw| decode(&raw)).transpose()
}

/// Encodes `items` and writes them under `key`.
///
/// # Errors
///
/// Returns an error if encoding or the backend write fails.
pub fn write<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = encode(items)?;
    store.set(key, &json)
}
