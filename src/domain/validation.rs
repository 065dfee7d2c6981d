//! Field rules shared by every caller of the collection store.
//!
//! The store runs these checks inside its create and update operations, so an
//! entity list can only ever hold values that passed them regardless of which
//! front end submitted the input.

use super::book::{Book, Label};
use super::error::{LabelKind, Result, ShelfmarkError};

/// Minimum length of book title, author and genre.
pub const MIN_TEXT_LEN: usize = 3;

/// Maximum length of any text field or label.
pub const MAX_TEXT_LEN: usize = 50;

/// Minimum length of a category label.
pub const MIN_CATEGORY_LEN: usize = 3;

/// Minimum length of a tag label.
pub const MIN_TAG_LEN: usize = 2;

/// Highest allowed rating.
pub const MAX_RATING: u8 = 5;

/// Trims `value` and checks it against the book text field bounds.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] if the trimmed value is shorter than
/// [`MIN_TEXT_LEN`] or longer than [`MAX_TEXT_LEN`] characters.
pub fn text_field(field: &str, value: &str) -> Result<String> {
    bounded(field, value, MIN_TEXT_LEN)
}

/// Checks that a submitted rating lies in `1..=5`.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] for `0` or anything above [`MAX_RATING`].
pub fn rating(value: u8) -> Result<u8> {
    if (1..=MAX_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(ShelfmarkError::Validation(format!(
            "rating must be between 1 and {MAX_RATING}, got {value}"
        )))
    }
}

/// Rejects a title already used by another book.
///
/// `exclude_id` is the book being edited, which may keep its own title.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] on a duplicate title.
pub fn unique_title(title: &str, books: &[Book], exclude_id: Option<&str>) -> Result<()> {
    let taken = books
        .iter()
        .filter(|b| Some(b.id.as_str()) != exclude_id)
        .any(|b| b.title == title);

    if taken {
        Err(ShelfmarkError::Validation(format!(
            "a book titled \"{title}\" already exists"
        )))
    } else {
        Ok(())
    }
}

/// Trims a category or tag label and checks length and uniqueness.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] if the label is too short, too long,
/// or already present in `existing` (other than the entry `exclude_id`).
pub fn label(
    kind: LabelKind,
    value: &str,
    existing: &[Label],
    exclude_id: Option<&str>,
) -> Result<String> {
    let min = match kind {
        LabelKind::Category => MIN_CATEGORY_LEN,
        LabelKind::Tag => MIN_TAG_LEN,
    };
    let value = bounded(kind.as_str(), value, min)?;

    let duplicate = existing
        .iter()
        .filter(|l| Some(l.id.as_str()) != exclude_id)
        .any(|l| l.label == value);

    if duplicate {
        return Err(ShelfmarkError::Validation(format!(
            "This {} already exists",
            kind.as_str().to_lowercase()
        )));
    }

    Ok(value)
}

/// Maps label ids to the entries of `pool`, preserving the order of `ids`.
///
/// Duplicate ids collapse to a single entry.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] if any id is not present in `pool`.
pub fn resolve_labels(kind: LabelKind, ids: &[String], pool: &[Label]) -> Result<Vec<Label>> {
    let mut resolved: Vec<Label> = Vec::with_capacity(ids.len());

    for id in ids {
        if resolved.iter().any(|l| &l.id == id) {
            continue;
        }
        let found = pool.iter().find(|l| &l.id == id).ok_or_else(|| {
            ShelfmarkError::Validation(format!(
                "unknown {} id: {id}",
                kind.as_str().to_lowercase()
            ))
        })?;
        resolved.push(found.clone());
    }

    Ok(resolved)
}

fn bounded(field: &str, value: &str, min: usize) -> Result<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if len < min {
        return Err(ShelfmarkError::Validation(format!(
            "{field} should contain at least {min} characters"
        )));
    }
    if len > MAX_TEXT_LEN {
        return Err(ShelfmarkError::Validation(format!(
            "{field} should contain at most {MAX_TEXT_LEN} characters"
        )));
    }

    Ok(trimmed.to_string())
}
