//! Wire types of the remote demo book endpoint.

use crate::domain::book::id_from_string_or_number;
use crate::domain::Book;
use serde::Deserialize;

/// Top-level response body: `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub data: Vec<FetchedBook>,
}

/// A book as returned by the remote source.
///
/// Only `id`, `title`, `author` and `genre` are carried into the collection;
/// the remaining fields are parsed so the full record shape is documented but
/// are otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchedBook {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl From<FetchedBook> for Book {
    /// Remote books enter the collection unrated and without labels.
    fn from(fetched: FetchedBook) -> Self {
        Self {
            id: fetched.id,
            title: fetched.title,
            author: fetched.author,
            genre: fetched.genre,
            rating: 0,
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }
}
