//! Storage layer for the local collection snapshots.
//!
//! Books, categories and tags are persisted as three independent JSON
//! snapshots under fixed keys of a [`KeyValueStore`]. The collection store is
//! the only writer.
//!
//! # Modules
//!
//! - `backend`: Key-value trait abstraction
//! - `json`: One-file-per-key backend with atomic writes
//! - `memory`: Shared in-memory backend
//! - `snapshot`: Versioned snapshot envelope and persisted key names

pub mod backend;
pub mod json;
pub mod memory;
pub mod snapshot;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::{BOOKS_KEY, CATEGORIES_KEY, SNAPSHOT_VERSION, TAGS_KEY};
