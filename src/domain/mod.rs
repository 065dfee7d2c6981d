//! Domain layer for shelfmark.
//!
//! Entity types, field rules and error definitions, independent of storage,
//! the remote source and the front end.
//!
//! # Organization
//!
//! - [`book`]: Book and label entities, create/update input types
//! - [`error`]: Error types and result alias
//! - [`validation`]: Field rules enforced by the collection store
//!
//! # Examples
//!
//! ```
//! use shelfmark::domain::{validation, Result};
//!
//! fn check(title: &str) -> Result<String> {
//!     validation::text_field("title", title)
//! }
//!
//! assert!(check("Dune").is_ok());
//! assert!(check("D").is_err());
//! ```

pub mod book;
pub mod error;
pub mod validation;

pub use book::{new_id, Book, BookDraft, BookPatch, Label};
pub use error::{LabelKind, Result, ShelfmarkError};
