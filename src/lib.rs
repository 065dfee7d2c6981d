//! Shelfmark: a personal book-collection manager.
//!
//! Shelfmark keeps a collection of books, each with a title, author, genre,
//! a 0-5 rating and any number of categories and tags. It provides:
//! - Local-first persistence: JSON snapshots in the data directory
//! - One-time remote bootstrap when no local snapshot exists yet
//! - Validated create/update/delete for books, categories and tags
//! - Delete guards for categories and tags still referenced by a book
//! - Field filters and fuzzy search over the collection
//! - A small panel state machine (form, settings, filter) for front ends

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line front end (main.rs)                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling and notices                       │
//! │  - Panel modes                                      │
//! │  - Collection store and filter evaluator            │
//! └─────────────────────────────────────────────────────┘
//!                 │                          │
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ Storage Layer (storage/)  │   │ Remote Layer (remote/)    │
//! │ - Key-value backend API   │   │ - Bootstrap source trait  │
//! │ - JSON file store         │   │ - Blocking HTTP client    │
//! │ - Versioned snapshots     │   │ - Response models         │
//! └───────────────────────────┘   └───────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Book and label models, validation (domain/)      │
//! │  - Error types (domain/error)                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber with rotating log file        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Collection store, panel modes, filters and event handling
//! - [`domain`]: Core domain types (Book, Label, errors, validation)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: Key-value persistence and snapshot encoding
//! - [`remote`]: Bootstrap sources for an empty collection
//! - [`observability`]: Logging setup
//!
//! # Configuration
//!
//! Shelfmark reads an optional TOML file, by default
//! `<config dir>/shelfmark/config.toml`:
//!
//! ```toml
//! data_dir = "~/Documents/shelfmark"
//! remote_url = "https://fakerapi.it/api/v1/books?_quantity=4"
//! remote_enabled = true
//! remote_timeout_secs = 10
//! log_level = "debug"
//! ```
//!
//! Every key is optional.
//!
//! # Initialization Flow
//!
//! 1. Load [`Config`] (missing file means defaults)
//! 2. Initialize tracing into `<data_dir>/shelfmark.log`
//! 3. [`initialize`] opens the JSON store and picks a bootstrap source
//! 4. The front end sends [`Event::Hydrate`], then drives further events
//!
//! # Examples
//!
//! ```rust
//! use shelfmark::app::{handle_event, App, CollectionStore, Event, FilterSpec};
//! use shelfmark::domain::BookDraft;
//! use shelfmark::remote::NoRemote;
//! use shelfmark::storage::MemoryStore;
//!
//! let mut app = App::new(CollectionStore::new(MemoryStore::new(), NoRemote));
//! handle_event(&mut app, Event::Hydrate)?;
//!
//! app.collection.create_book(BookDraft {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     genre: "Sci-Fi".into(),
//!     rating: 5,
//!     ..BookDraft::default()
//! })?;
//!
//! handle_event(&mut app, Event::ApplyFilter(FilterSpec::parse("title", "dun")?))?;
//! assert_eq!(app.collection.visible_books().len(), 1);
//! # Ok::<(), shelfmark::ShelfmarkError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod remote;
pub mod storage;

pub use app::{handle_event, App, CollectionStore, DrawerMode, Event, Notice, NoticeLevel};
pub use domain::{Book, BookDraft, BookPatch, Label, LabelKind, Result, ShelfmarkError};

use remote::{BookSource, HttpBookSource, NoRemote, DEFAULT_REMOTE_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::JsonFileStore;

/// Runtime configuration, read from a TOML file.
///
/// # Example
///
/// ```rust
/// use shelfmark::Config;
///
/// let config: Config = toml::from_str("remote_enabled = false").unwrap();
/// assert!(!config.remote_enabled);
/// assert_eq!(config.remote_timeout_secs, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding snapshots and logs.
    ///
    /// A leading `~` is expanded. Default: platform data dir + `/shelfmark`.
    pub data_dir: Option<PathBuf>,

    /// Endpoint used to bootstrap an empty collection.
    pub remote_url: String,

    /// Whether to contact `remote_url` at all. Default: `true`
    pub remote_enabled: bool,

    /// Request timeout for the bootstrap fetch, in seconds. Default: `10`
    pub remote_timeout_secs: u64,

    /// Tracing level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            remote_enabled: true,
            remote_timeout_secs: 10,
            log_level: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Io`] if the file exists but cannot be read,
    /// and [`ShelfmarkError::Config`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&contents)
            .map_err(|e| ShelfmarkError::Config(format!("{}: {e}", path.display())))
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_ref().map_or_else(infrastructure::get_data_dir, |dir| {
            infrastructure::expand_tilde(&dir.to_string_lossy())
        })
    }
}

/// Builds an [`App`] backed by the JSON file store in the configured data
/// directory.
///
/// The collection is not hydrated yet; send [`Event::Hydrate`] first.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Io`] if the data directory cannot be created and
/// [`ShelfmarkError::Remote`] if the HTTP client cannot be built.
///
/// # Example
///
/// ```rust
/// use shelfmark::{handle_event, initialize, Config, Event};
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config {
///     data_dir: Some(dir.path().to_path_buf()),
///     remote_enabled: false,
///     ..Default::default()
/// };
///
/// let mut app = initialize(&config)?;
/// handle_event(&mut app, Event::Hydrate)?;
/// assert!(app.collection.books().is_empty());
/// # Ok::<(), shelfmark::ShelfmarkError>(())
/// ```
pub fn initialize(config: &Config) -> Result<App> {
    let data_dir = config.data_dir();
    let _span = tracing::debug_span!("initialize", data_dir = %data_dir.display()).entered();

    let storage = JsonFileStore::open(&data_dir)?;
    tracing::debug!(dir = %storage.dir().display(), "snapshot store opened");

    let source: Box<dyn BookSource> = if config.remote_enabled {
        Box::new(HttpBookSource::new(
            config.remote_url.clone(),
            Duration::from_secs(config.remote_timeout_secs),
        )?)
    } else {
        tracing::debug!("remote bootstrap disabled");
        Box::new(NoRemote)
    };

    Ok(App::new(CollectionStore::from_boxed(Box::new(storage), source)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert!(config.remote_enabled);
        assert_eq!(config.remote_timeout_secs, 10);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "remote_timeout_secs = \"soon\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ShelfmarkError::Config(_)));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/shelf")),
            ..Config::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/shelf"));
    }
}
