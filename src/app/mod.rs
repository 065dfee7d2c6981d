//! Application layer: stores, filtering and the event handler.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Gesture → Event → handle_event → Store Mutation → Persist → Subscribers
//!                                            │
//!                                            └──→ Notices → Front End
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Notices returned to the front end
//! - [`filter`]: Filter predicates, evaluation, fuzzy search and sorting
//! - [`handler`]: Event processing and panel transitions
//! - [`modes`]: Panel mode register
//! - [`state`]: `App`, the bundle of both stores
//! - [`store`]: Collection store with persistence and subscriptions

pub mod actions;
pub mod filter;
pub mod handler;
pub mod modes;
pub mod state;
pub mod store;

pub use actions::{Notice, NoticeLevel};
pub use filter::{sort_books, FilterField, FilterSpec, SortKey, SortOrder, ViewFilter};
pub use handler::{handle_event, Event};
pub use modes::{DrawerMode, ModeStore};
pub use state::App;
pub use store::{CollectionStore, HydrationSource, StoreEvent, SubscriptionId};
