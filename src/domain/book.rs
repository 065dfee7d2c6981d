//! Book and label entity types.
//!
//! A [`Book`] embeds copies of the [`Label`]s it is tagged with, so a persisted
//! book list can be rendered without joining against the category and tag
//! collections. Input to the store arrives as a [`BookDraft`] (create) or a
//! [`BookPatch`] (update), which reference labels by id only.

use serde::{Deserialize, Deserializer, Serialize};

/// A category or tag entry.
///
/// The `id` is assigned by the store on creation. The `label` is unique within
/// its own collection; categories and tags are independent namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub label: String,
}

impl Label {
    /// Creates a label with a freshly generated id.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            label: label.into(),
        }
    }
}

/// A book record in the collection.
///
/// `rating` is `0` for unrated books (the remote bootstrap always produces
/// unrated books); rated books carry a value in `1..=5`. Missing optional
/// fields in stored JSON fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub categories: Vec<Label>,
    #[serde(default)]
    pub tags: Vec<Label>,
}

impl Book {
    /// Returns `true` if the book is tagged with the category `id`.
    #[must_use]
    pub fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    /// Returns `true` if the book is tagged with the tag `id`.
    #[must_use]
    pub fn has_tag(&self, id: &str) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }

    /// Returns `true` if the book has a rating in `1..=5`.
    #[must_use]
    pub const fn is_rated(&self) -> bool {
        self.rating > 0
    }
}

/// Fields submitted by the add-book form.
///
/// Categories and tags are referenced by id and resolved against the store's
/// collections when the book is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub rating: u8,
    pub category_ids: Vec<String>,
    pub tag_ids: Vec<String>,
}

/// A partial update to an existing book.
///
/// `None` leaves the field as it is. `Some(vec![])` for categories or tags
/// clears the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<u8>,
    pub category_ids: Option<Vec<String>>,
    pub tag_ids: Option<Vec<String>>,
}

impl BookPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.genre.is_none()
            && self.rating.is_none()
            && self.category_ids.is_none()
            && self.tag_ids.is_none()
    }
}

/// Generates a random unique identifier for a new entity.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accepts an id stored as either a JSON string or a JSON number.
///
/// Books fetched from the remote source carry numeric ids, and older snapshots
/// kept them that way.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_book_without_optional_fields_deserializes() {
        let json = r#"{"id":"1","title":"Dune","author":"Frank Herbert","genre":"Sci-Fi"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.rating, 0);
        assert!(book.categories.is_empty());
        assert!(book.tags.is_empty());
        assert!(!book.is_rated());
    }

    #[test]
    fn numeric_ids_are_read_as_text() {
        let json = r#"{"id":42,"title":"Dune","author":"Frank Herbert","genre":"Sci-Fi",
            "categories":[{"id":7,"label":"Classic"}]}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, "42");
        assert_eq!(book.categories[0].id, "7");

        let written = serde_json::to_value(&book).unwrap();
        assert_eq!(written["id"], "42");
    }

    #[test]
    fn label_ids_are_unique() {
        let a = Label::new("Fiction");
        let b = Label::new("Fiction");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn membership_checks_match_by_id() {
        let scifi = Label::new("Sci-Fi");
        let book = Book {
            id: new_id(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Novel".into(),
            rating: 5,
            categories: vec![scifi.clone()],
            tags: vec![],
        };
        assert!(book.has_category(&scifi.id));
        assert!(!book.has_category("Sci-Fi"));
        assert!(!book.has_tag(&scifi.id));
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(BookPatch::default().is_empty());
        let patch = BookPatch {
            rating: Some(3),
            ..BookPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
