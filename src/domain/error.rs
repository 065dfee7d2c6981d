//! Error types for shelfmark.
//!
//! This module defines the centralized error type [`ShelfmarkError`] and a type alias
//! [`Result`] used throughout the crate. All variants are implemented with the
//! `thiserror` crate.

use thiserror::Error;

/// Which label collection an operation targeted.
///
/// Categories and tags share the same shape but live in separate namespaces,
/// each with its own persisted key and uniqueness rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Category,
    Tag,
}

impl LabelKind {
    /// Human-readable singular name, used in notices and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Tag => "Tag",
        }
    }
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for shelfmark operations.
///
/// Most failures inside the collection store are logged and swallowed (remote
/// bootstrap, storage writes). The variants here are the ones that reach a
/// caller: rejected input, guarded deletes, and failures of the storage and
/// remote layers themselves when called directly.
///
/// # Examples
///
/// ```
/// use shelfmark::domain::{LabelKind, ShelfmarkError};
///
/// let err = ShelfmarkError::LabelInUse {
///     kind: LabelKind::Category,
///     label: "Sci-Fi".to_string(),
/// };
/// assert_eq!(err.to_string(), "Category \"Sci-Fi\" is associated with a book");
/// ```
#[derive(Debug, Error)]
pub enum ShelfmarkError {
    /// Key-value storage read or write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fetching from the remote bootstrap source failed.
    #[error("Remote source error: {0}")]
    Remote(String),

    /// Input rejected by a field rule (length, range, uniqueness, unknown reference).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A category or tag cannot be removed while a book still references it.
    #[error("{kind} \"{label}\" is associated with a book")]
    LabelInUse {
        /// Collection the label belongs to.
        kind: LabelKind,
        /// Display label of the referenced entry.
        label: String,
    },

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for shelfmark operations.
pub type Result<T> = std::result::Result<T, ShelfmarkError>;
