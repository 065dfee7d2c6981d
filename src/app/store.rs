//! Collection store: the single owner of books, categories and tags.
//!
//! [`CollectionStore`] holds the authoritative in-memory lists, the selection
//! handles that drive edit flows, and the active filter. Every mutation
//! follows the same sequence:
//!
//! 1. Validate input against the current lists
//! 2. Apply the change in memory
//! 3. Persist the full affected list(s) to the key-value store
//! 4. Re-evaluate the active filter (book changes only)
//! 5. Notify subscribers
//!
//! # Persistence
//!
//! Storage is best effort. A failed write is logged at `warn` and the
//! in-memory change stays applied; callers never see the failure.
//!
//! # Hydration
//!
//! On startup the local book snapshot wins. Only when it is absent does the
//! store ask its [`BookSource`] for a bootstrap list, at most once per store
//! instance. The fetched list is adopted in memory but not persisted until the
//! first book mutation.
//!
//! # Example
//!
//! ```rust
//! use shelfmark::app::CollectionStore;
//! use shelfmark::domain::BookDraft;
//! use shelfmark::remote::NoRemote;
//! use shelfmark::storage::MemoryStore;
//!
//! let mut store = CollectionStore::new(MemoryStore::new(), NoRemote);
//! store.hydrate();
//!
//! let book = store.create_book(BookDraft {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     genre: "Science Fiction".into(),
//!     rating: 5,
//!     ..BookDraft::default()
//! })?;
//! assert_eq!(store.books()[0].id, book.id);
//! # Ok::<(), shelfmark::ShelfmarkError>(())
//! ```

use super::filter::{FilterSpec, ViewFilter};
use crate::domain::error::{LabelKind, Result, ShelfmarkError};
use crate::domain::{new_id, validation, Book, BookDraft, BookPatch, Label};
use crate::remote::BookSource;
use crate::storage::{snapshot, KeyValueStore, BOOKS_KEY, CATEGORIES_KEY, TAGS_KEY};
use std::fmt;

/// Change notification delivered to subscribers after a mutation is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// `hydrate` finished loading lists.
    Hydrated,
    /// The book list changed.
    BooksChanged,
    /// The label list of the given kind changed.
    LabelsChanged(LabelKind),
    /// A selection handle changed.
    SelectionChanged,
    /// The active filter was applied, re-evaluated or cleared.
    FilterChanged,
}

/// Handle returned by [`CollectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Where the book list came from during hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// Loaded verbatim from the local snapshot.
    LocalSnapshot,
    /// Adopted from the remote bootstrap source.
    Remote,
    /// Nothing local and the remote was unavailable, failed, or already tried.
    Empty,
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the book collection and its persisted snapshots.
pub struct CollectionStore {
    storage: Box<dyn KeyValueStore>,
    source: Box<dyn BookSource>,

    books: Vec<Book>,
    categories: Vec<Label>,
    tags: Vec<Label>,

    selected_book: Option<String>,
    selected_category: Option<String>,
    selected_tag: Option<String>,

    active_filter: Option<ViewFilter>,
    filtered: Option<Vec<Book>>,

    remote_attempted: bool,

    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("books", &self.books.len())
            .field("categories", &self.categories.len())
            .field("tags", &self.tags.len())
            .field("selected_book", &self.selected_book)
            .field("active_filter", &self.active_filter)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CollectionStore {
    /// Creates an empty store over `storage`, bootstrapping from `source`.
    ///
    /// Nothing is read until [`hydrate`](Self::hydrate) is called.
    #[must_use]
    pub fn new(storage: impl KeyValueStore + 'static, source: impl BookSource + 'static) -> Self {
        Self::from_boxed(Box::new(storage), Box::new(source))
    }

    /// Same as [`new`](Self::new) for already boxed collaborators.
    #[must_use]
    pub fn from_boxed(storage: Box<dyn KeyValueStore>, source: Box<dyn BookSource>) -> Self {
        Self {
            storage,
            source,
            books: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            selected_book: None,
            selected_category: None,
            selected_tag: None,
            active_filter: None,
            filtered: None,
            remote_attempted: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Hydration
    // ---------------------------------------------------------------------

    /// Loads the collection from local storage, falling back to the remote source.
    ///
    /// Categories and tags are read from their own keys (absent → empty). The
    /// book snapshot, when present, replaces the in-memory list verbatim. When
    /// absent, the remote source is queried once per store; its failure is
    /// logged and leaves the list empty. A snapshot that cannot be read or
    /// parsed is logged and treated as absent.
    pub fn hydrate(&mut self) -> HydrationSource {
        let _span = tracing::info_span!("hydrate").entered();

        self.categories = self.read_list(CATEGORIES_KEY).unwrap_or_default();
        self.tags = self.read_list(TAGS_KEY).unwrap_or_default();

        let source = if let Some(books) = self.read_list::<Book>(BOOKS_KEY) {
            tracing::info!(count = books.len(), "books loaded from local snapshot");
            self.books = books;
            HydrationSource::LocalSnapshot
        } else if self.remote_attempted {
            tracing::debug!(
                "no local snapshot and remote already attempted, keeping current books"
            );
            if self.books.is_empty() {
                HydrationSource::Empty
            } else {
                HydrationSource::Remote
            }
        } else {
            self.remote_attempted = true;
            match self.source.fetch_books() {
                Ok(books) if !books.is_empty() => {
                    tracing::info!(count = books.len(), "books adopted from remote source");
                    self.books = books;
                    HydrationSource::Remote
                }
                Ok(_) => {
                    tracing::info!("remote source returned no books");
                    HydrationSource::Empty
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Error retrieving Books");
                    HydrationSource::Empty
                }
            }
        };

        self.refresh_filter();
        self.notify(StoreEvent::Hydrated);

        tracing::debug!(
            source = ?source,
            books = self.books.len(),
            categories = self.categories.len(),
            tags = self.tags.len(),
            "hydration complete"
        );
        source
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    /// Full book collection, most recently created first.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Looks up a book by id.
    #[must_use]
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Label] {
        &self.categories
    }

    /// All tags.
    #[must_use]
    pub fn tags(&self) -> &[Label] {
        &self.tags
    }

    /// Labels of the given kind.
    #[must_use]
    pub fn labels(&self, kind: LabelKind) -> &[Label] {
        match kind {
            LabelKind::Category => &self.categories,
            LabelKind::Tag => &self.tags,
        }
    }

    /// Looks up a label by id.
    #[must_use]
    pub fn label(&self, kind: LabelKind, id: &str) -> Option<&Label> {
        self.labels(kind).iter().find(|l| l.id == id)
    }

    /// Result of the active filter, if one is applied.
    #[must_use]
    pub fn filtered_books(&self) -> Option<&[Book]> {
        self.filtered.as_deref()
    }

    /// The active filter, if any.
    #[must_use]
    pub const fn active_filter(&self) -> Option<&ViewFilter> {
        self.active_filter.as_ref()
    }

    /// Books the view should display.
    ///
    /// The active filter result when it is non-empty, otherwise the full
    /// collection.
    #[must_use]
    pub fn visible_books(&self) -> &[Book] {
        match self.filtered.as_deref() {
            Some(filtered) if !filtered.is_empty() => filtered,
            _ => &self.books,
        }
    }

    // ---------------------------------------------------------------------
    // Books
    // ---------------------------------------------------------------------

    /// Validates `draft`, assigns a fresh id and prepends the new book.
    ///
    /// Category and tag ids are resolved against the store's lists, and the
    /// book embeds copies of the resolved labels.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] for out-of-bounds text, a rating
    /// outside `1..=5`, a title already in use, or an unknown label id. The
    /// collection is unchanged on error.
    pub fn create_book(&mut self, draft: BookDraft) -> Result<Book> {
        let _span = tracing::debug_span!("create_book", title = %draft.title).entered();

        let title = validation::text_field("title", &draft.title)?;
        validation::unique_title(&title, &self.books, None)?;
        let author = validation::text_field("author", &draft.author)?;
        let genre = validation::text_field("genre", &draft.genre)?;
        let rating = validation::rating(draft.rating)?;
        let categories =
            validation::resolve_labels(LabelKind::Category, &draft.category_ids, &self.categories)?;
        let tags = validation::resolve_labels(LabelKind::Tag, &draft.tag_ids, &self.tags)?;

        let book = Book {
            id: self.fresh_book_id(),
            title,
            author,
            genre,
            rating,
            categories,
            tags,
        };

        self.books.insert(0, book.clone());
        self.books_changed();

        tracing::debug!(book_id = %book.id, "book created");
        Ok(book)
    }

    /// Merges `patch` into the book `id`.
    ///
    /// Returns `Ok(None)` without touching anything if no book has that id.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] if any patched field fails its
    /// rule. Either every field of the patch is applied or none is.
    pub fn update_book(&mut self, id: &str, patch: BookPatch) -> Result<Option<Book>> {
        let _span = tracing::debug_span!("update_book", book_id = %id).entered();

        let Some(index) = self.books.iter().position(|b| b.id == id) else {
            tracing::debug!("book not found, ignoring update");
            return Ok(None);
        };

        let mut updated = self.books[index].clone();

        if let Some(title) = &patch.title {
            let title = validation::text_field("title", title)?;
            validation::unique_title(&title, &self.books, Some(id))?;
            updated.title = title;
        }
        if let Some(author) = &patch.author {
            updated.author = validation::text_field("author", author)?;
        }
        if let Some(genre) = &patch.genre {
            updated.genre = validation::text_field("genre", genre)?;
        }
        if let Some(rating) = patch.rating {
            updated.rating = validation::rating(rating)?;
        }
        if let Some(ids) = &patch.category_ids {
            updated.categories =
                validation::resolve_labels(LabelKind::Category, ids, &self.categories)?;
        }
        if let Some(ids) = &patch.tag_ids {
            updated.tags = validation::resolve_labels(LabelKind::Tag, ids, &self.tags)?;
        }

        self.books[index] = updated.clone();
        self.books_changed();

        tracing::debug!("book updated");
        Ok(Some(updated))
    }

    /// Removes the book `id`. Returns `false` if it did not exist.
    pub fn remove_book(&mut self, id: &str) -> bool {
        let _span = tracing::debug_span!("remove_book", book_id = %id).entered();

        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        if self.books.len() == before {
            tracing::debug!("book not found, nothing removed");
            return false;
        }

        if self.selected_book.as_deref() == Some(id) {
            self.selected_book = None;
        }
        self.books_changed();

        tracing::debug!("book removed");
        true
    }

    /// Sets or clears the book being edited. An empty id clears.
    pub fn set_selected_book(&mut self, id: Option<&str>) {
        self.selected_book = normalize_selection(id);
        self.notify(StoreEvent::SelectionChanged);
    }

    /// The book being edited, if the selection points at an existing book.
    #[must_use]
    pub fn selected_book(&self) -> Option<&Book> {
        self.selected_book.as_deref().and_then(|id| self.book(id))
    }

    // ---------------------------------------------------------------------
    // Categories and tags
    // ---------------------------------------------------------------------

    /// Validates `label` and prepends a new entry to the `kind` list.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] if the label is too short, too
    /// long, or already used in the same list.
    pub fn create_label(&mut self, kind: LabelKind, label: &str) -> Result<Label> {
        let _span = tracing::debug_span!("create_label", kind = %kind, label = %label).entered();

        let value = validation::label(kind, label, self.labels(kind), None)?;
        let entry = Label {
            id: self.fresh_label_id(kind),
            label: value,
        };

        self.labels_mut(kind).insert(0, entry.clone());
        self.persist_labels(kind);
        self.notify(StoreEvent::LabelsChanged(kind));

        tracing::debug!(label_id = %entry.id, "label created");
        Ok(entry)
    }

    /// Renames the `kind` entry `id`.
    ///
    /// Books embedding the entry are rewritten with the new label and the
    /// book snapshot is persisted as well. Returns `Ok(None)` if no entry has
    /// that id.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] under the same rules as
    /// [`create_label`](Self::create_label).
    pub fn update_label(
        &mut self,
        kind: LabelKind,
        id: &str,
        label: &str,
    ) -> Result<Option<Label>> {
        let _span = tracing::debug_span!("update_label", kind = %kind, label_id = %id).entered();

        if self.label(kind, id).is_none() {
            tracing::debug!("label not found, ignoring update");
            return Ok(None);
        }

        let value = validation::label(kind, label, self.labels(kind), Some(id))?;
        let mut updated = None;
        for entry in self.labels_mut(kind).iter_mut().filter(|l| l.id == id) {
            entry.label.clone_from(&value);
            updated = Some(entry.clone());
        }
        self.persist_labels(kind);

        let mut books_touched = 0_usize;
        for book in &mut self.books {
            let embedded = match kind {
                LabelKind::Category => &mut book.categories,
                LabelKind::Tag => &mut book.tags,
            };
            for entry in embedded.iter_mut().filter(|l| l.id == id) {
                entry.label.clone_from(&value);
                books_touched += 1;
            }
        }

        if books_touched > 0 {
            self.books_changed();
        }
        self.notify(StoreEvent::LabelsChanged(kind));

        tracing::debug!(books_touched, "label updated");
        Ok(updated)
    }

    /// Removes the `kind` entry `id`.
    ///
    /// Returns `Ok(false)` if no entry has that id.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::LabelInUse`] if any book references the entry;
    /// the list is left unchanged.
    pub fn remove_label(&mut self, kind: LabelKind, id: &str) -> Result<bool> {
        let _span = tracing::debug_span!("remove_label", kind = %kind, label_id = %id).entered();

        let Some(entry) = self.label(kind, id).cloned() else {
            tracing::debug!("label not found, nothing removed");
            return Ok(false);
        };

        let in_use = self.books.iter().any(|b| match kind {
            LabelKind::Category => b.has_category(id),
            LabelKind::Tag => b.has_tag(id),
        });
        if in_use {
            tracing::info!(label = %entry.label, "refusing to remove label referenced by a book");
            return Err(ShelfmarkError::LabelInUse {
                kind,
                label: entry.label,
            });
        }

        self.labels_mut(kind).retain(|l| l.id != id);
        let selected = self.selected_label_slot(kind);
        if selected.as_deref() == Some(id) {
            *selected = None;
        }
        self.persist_labels(kind);
        self.notify(StoreEvent::LabelsChanged(kind));

        tracing::debug!("label removed");
        Ok(true)
    }

    /// Sets or clears the `kind` entry being edited. An empty id clears.
    pub fn set_selected_label(&mut self, kind: LabelKind, id: Option<&str>) {
        *self.selected_label_slot(kind) = normalize_selection(id);
        self.notify(StoreEvent::SelectionChanged);
    }

    /// The `kind` entry being edited, if the selection points at an existing entry.
    #[must_use]
    pub fn selected_label(&self, kind: LabelKind) -> Option<&Label> {
        let selected = match kind {
            LabelKind::Category => self.selected_category.as_deref(),
            LabelKind::Tag => self.selected_tag.as_deref(),
        };
        selected.and_then(|id| self.label(kind, id))
    }

    /// Creates a category. See [`create_label`](Self::create_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] on a rejected label.
    pub fn create_category(&mut self, label: &str) -> Result<Label> {
        self.create_label(LabelKind::Category, label)
    }

    /// Renames a category. See [`update_label`](Self::update_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] on a rejected label.
    pub fn update_category(&mut self, id: &str, label: &str) -> Result<Option<Label>> {
        self.update_label(LabelKind::Category, id, label)
    }

    /// Removes a category. See [`remove_label`](Self::remove_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::LabelInUse`] if a book references it.
    pub fn remove_category(&mut self, id: &str) -> Result<bool> {
        self.remove_label(LabelKind::Category, id)
    }

    /// Sets or clears the selected category.
    pub fn set_selected_category(&mut self, id: Option<&str>) {
        self.set_selected_label(LabelKind::Category, id);
    }

    /// Creates a tag. See [`create_label`](Self::create_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] on a rejected label.
    pub fn create_tag(&mut self, label: &str) -> Result<Label> {
        self.create_label(LabelKind::Tag, label)
    }

    /// Renames a tag. See [`update_label`](Self::update_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::Validation`] on a rejected label.
    pub fn update_tag(&mut self, id: &str, label: &str) -> Result<Option<Label>> {
        self.update_label(LabelKind::Tag, id, label)
    }

    /// Removes a tag. See [`remove_label`](Self::remove_label).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfmarkError::LabelInUse`] if a book references it.
    pub fn remove_tag(&mut self, id: &str) -> Result<bool> {
        self.remove_label(LabelKind::Tag, id)
    }

    /// Sets or clears the selected tag.
    pub fn set_selected_tag(&mut self, id: Option<&str>) {
        self.set_selected_label(LabelKind::Tag, id);
    }

    // ---------------------------------------------------------------------
    // Filtering
    // ---------------------------------------------------------------------

    /// Applies a field filter and returns its result.
    ///
    /// The collection itself is untouched. The filter stays active, and is
    /// re-evaluated after every book mutation, until [`clear_filter`](Self::clear_filter).
    pub fn apply_filter(&mut self, spec: FilterSpec) -> &[Book] {
        self.set_view_filter(ViewFilter::Field(spec))
    }

    /// Applies a fuzzy search over title, author and genre.
    pub fn search(&mut self, query: &str) -> &[Book] {
        self.set_view_filter(ViewFilter::Search(query.to_string()))
    }

    /// Drops the active filter so the full collection is visible again.
    pub fn clear_filter(&mut self) {
        if self.active_filter.take().is_some() {
            tracing::debug!("filter cleared");
        }
        self.filtered = None;
        self.notify(StoreEvent::FilterChanged);
    }

    fn set_view_filter(&mut self, filter: ViewFilter) -> &[Book] {
        let result = filter.apply(&self.books);
        tracing::debug!(filter = ?filter, matched = result.len(), "filter applied");

        self.active_filter = Some(filter);
        self.filtered = Some(result);
        self.notify(StoreEvent::FilterChanged);

        self.filtered.as_deref().unwrap_or_default()
    }

    fn refresh_filter(&mut self) {
        if let Some(filter) = &self.active_filter {
            self.filtered = Some(filter.apply(&self.books));
            self.notify(StoreEvent::FilterChanged);
        }
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    /// Registers `listener` to run after every persisted change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        tracing::trace!(event = ?event, listeners = self.listeners.len(), "notifying subscribers");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // ---------------------------------------------------------------------
    // Persistence helpers
    // ---------------------------------------------------------------------

    fn books_changed(&mut self) {
        if let Err(e) = snapshot::write(self.storage.as_mut(), BOOKS_KEY, &self.books) {
            tracing::warn!(
                error = %e,
                key = BOOKS_KEY,
                "failed to persist snapshot, keeping in-memory state"
            );
        }
        self.refresh_filter();
        self.notify(StoreEvent::BooksChanged);
    }

    fn persist_labels(&mut self, kind: LabelKind) {
        let (key, items) = match kind {
            LabelKind::Category => (CATEGORIES_KEY, &self.categories),
            LabelKind::Tag => (TAGS_KEY, &self.tags),
        };
        if let Err(e) = snapshot::write(self.storage.as_mut(), key, items) {
            tracing::warn!(error = %e, key, "failed to persist snapshot, keeping in-memory state");
        }
    }

    fn read_list<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        match snapshot::read(self.storage.as_ref(), key) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, key, "unreadable snapshot, treating as absent");
                None
            }
        }
    }

    fn labels_mut(&mut self, kind: LabelKind) -> &mut Vec<Label> {
        match kind {
            LabelKind::Category => &mut self.categories,
            LabelKind::Tag => &mut self.tags,
        }
    }

    fn selected_label_slot(&mut self, kind: LabelKind) -> &mut Option<String> {
        match kind {
            LabelKind::Category => &mut self.selected_category,
            LabelKind::Tag => &mut self.selected_tag,
        }
    }

    fn fresh_book_id(&self) -> String {
        loop {
            let id = new_id();
            if self.book(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_label_id(&self, kind: LabelKind) -> String {
        loop {
            let id = new_id();
            if self.label(kind, &id).is_none() {
                return id;
            }
        }
    }
}

fn normalize_selection(id: Option<&str>) -> Option<String> {
    id.filter(|id| !id.is_empty()).map(str::to_string)
}
