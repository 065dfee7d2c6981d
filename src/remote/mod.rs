//! Remote bootstrap source for an empty collection.
//!
//! - `client`: [`BookSource`] trait and its HTTP, disabled and static implementations
//! - `models`: response body types of the demo endpoint

pub mod client;
pub mod models;

pub use client::{BookSource, HttpBookSource, NoRemote, StaticBookSource, DEFAULT_REMOTE_URL};
pub use models::{FetchResponse, FetchedBook};
