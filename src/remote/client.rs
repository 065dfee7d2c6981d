//! Remote bootstrap sources.
//!
//! The collection store falls back to a [`BookSource`] only when no local book
//! snapshot exists. The HTTP implementation uses a blocking `reqwest` client;
//! the store runs single-threaded and the fetch happens once per session.

use super::models::FetchResponse;
use crate::domain::error::{Result, ShelfmarkError};
use crate::domain::Book;
use std::time::Duration;

/// Default demo endpoint returning four generated books.
pub const DEFAULT_REMOTE_URL: &str = "https://fakerapi.it/api/v1/books?_quantity=4";

/// A read-only provider of initial books.
pub trait BookSource: Send {
    /// Fetches the initial collection, already mapped into [`Book`]s.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Remote`] if the source is unreachable or
    /// answers with something other than the expected JSON body.
    fn fetch_books(&self) -> Result<Vec<Book>>;
}

/// Fetches books with an HTTP `GET` against a JSON endpoint.
#[derive(Debug)]
pub struct HttpBookSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpBookSource {
    /// Builds a source for `url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Remote`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShelfmarkError::Remote(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Endpoint this source reads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl BookSource for HttpBookSource {
    fn fetch_books(&self) -> Result<Vec<Book>> {
        let _span = tracing::debug_span!("http_fetch_books", url = %self.url).entered();

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| ShelfmarkError::Remote(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShelfmarkError::Remote(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body: FetchResponse = response
            .json()
            .map_err(|e| ShelfmarkError::Remote(format!("JSON parse error: {e}")))?;

        tracing::debug!(count = body.data.len(), "remote books received");
        Ok(body.data.into_iter().map(Book::from).collect())
    }
}

/// A source that never yields books, used when remote bootstrap is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl BookSource for NoRemote {
    fn fetch_books(&self) -> Result<Vec<Book>> {
        Ok(Vec::new())
    }
}

/// A source serving a fixed list, or a fixed failure.
///
/// Handy for offline demos and for exercising the bootstrap path without a
/// network.
#[derive(Debug, Clone)]
pub struct StaticBookSource {
    outcome: std::result::Result<Vec<Book>, String>,
}

impl StaticBookSource {
    /// Serves `books` on every fetch.
    #[must_use]
    pub const fn new(books: Vec<Book>) -> Self {
        Self { outcome: Ok(books) }
    }

    /// Fails every fetch with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl BookSource for StaticBookSource {
    fn fetch_books(&self) -> Result<Vec<Book>> {
        self.outcome
            .clone()
            .map_err(ShelfmarkError::Remote)
    }
}
