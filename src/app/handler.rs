//! Event handling and state transition logic.
//!
//! This is the surface a front end drives. Each [`Event`] corresponds to one
//! user gesture (open a panel, submit a form, delete an entry). The handler
//! calls into the collection store, performs the panel transitions that go
//! with the gesture, and returns notices for the user.
//!
//! # Error Mapping
//!
//! - Validation failures are returned as `Err` so the caller can show them next
//!   to the offending input.
//! - A delete refused because a book still references the label becomes a
//!   warning [`Notice`]; nothing is removed.
//! - Unknown ids are silent no-ops.
//!
//! # Example
//!
//! ```rust
//! use shelfmark::app::{handle_event, App, CollectionStore, Event};
//! use shelfmark::domain::BookDraft;
//! use shelfmark::remote::NoRemote;
//! use shelfmark::storage::MemoryStore;
//!
//! let mut app = App::new(CollectionStore::new(MemoryStore::new(), NoRemote));
//! handle_event(&mut app, Event::Hydrate)?;
//! handle_event(&mut app, Event::OpenForm { book_id: None })?;
//! let notices = handle_event(&mut app, Event::SubmitBook(BookDraft {
//!     title: "Kindred".into(),
//!     author: "Octavia E. Butler".into(),
//!     genre: "Fiction".into(),
//!     rating: 5,
//!     ..BookDraft::default()
//! }))?;
//! assert_eq!(notices.len(), 1);
//! assert_eq!(app.collection.books().len(), 1);
//! # Ok::<(), shelfmark::ShelfmarkError>(())
//! ```

use super::actions::Notice;
use super::filter::FilterSpec;
use super::modes::DrawerMode;
use super::state::App;
use crate::domain::error::{LabelKind, Result, ShelfmarkError};
use crate::domain::{BookDraft, BookPatch};

/// A user gesture or lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Load the collection (startup).
    Hydrate,

    /// Open the book form, in edit mode when `book_id` is set.
    OpenForm {
        /// Book to edit; `None` opens an empty create form.
        book_id: Option<String>,
    },

    /// Submit the book form with every field filled in.
    ///
    /// Creates a book when nothing is selected, otherwise replaces every field
    /// of the selected book. Closes the form on success.
    SubmitBook(BookDraft),

    /// Apply a partial change to the selected book and close the form.
    SubmitBookPatch(BookPatch),

    /// Delete a book.
    DeleteBook(String),

    /// Open the category and tag settings panel.
    OpenSettings,

    /// Start or stop editing a category or tag in the settings panel.
    SelectLabel {
        kind: LabelKind,
        /// Entry to edit; `None` returns to create mode.
        id: Option<String>,
    },

    /// Submit the category or tag input.
    ///
    /// Renames the selected entry if there is one, otherwise creates a new
    /// entry. The selection is cleared afterwards either way.
    SubmitLabel { kind: LabelKind, label: String },

    /// Delete a category or tag unless a book still uses it.
    DeleteLabel { kind: LabelKind, id: String },

    /// Open the filter panel.
    OpenFilter,

    /// Apply a field filter.
    ApplyFilter(FilterSpec),

    /// Apply a fuzzy search.
    Search(String),

    /// Drop the active filter.
    ClearFilter,

    /// Close whatever panel is open.
    Close,
}

/// Processes an event against `app` and returns notices to show the user.
///
/// # Errors
///
/// Returns [`ShelfmarkError::Validation`] when submitted input is rejected.
/// The collection and the open panel are unchanged in that case.
#[allow(clippy::too_many_lines)]
pub fn handle_event(app: &mut App, event: Event) -> Result<Vec<Notice>> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Hydrate => {
            let source = app.collection.hydrate();
            tracing::debug!(source = ?source, "hydrated");
            Ok(vec![])
        }

        Event::OpenForm { book_id } => {
            app.transition(DrawerMode::Form);
            app.collection.set_selected_book(book_id.as_deref());
            Ok(vec![])
        }

        Event::SubmitBook(draft) => {
            let selected = app.collection.selected_book().map(|b| b.id.clone());
            let notice = if let Some(id) = selected {
                app.collection.update_book(&id, full_patch(draft))?;
                Notice::success(
                    "Book updated!",
                    "Your book was updated and can be reviewed in the collection",
                )
            } else {
                app.collection.create_book(draft)?;
                Notice::success("Hurray!", "Your book was added to our records")
            };
            app.close();
            Ok(vec![notice])
        }

        Event::SubmitBookPatch(patch) => {
            let Some(id) = app.collection.selected_book().map(|b| b.id.clone()) else {
                tracing::debug!("patch submitted without a selected book");
                return Ok(vec![Notice::warning("Nothing to update", "No book is selected")]);
            };
            if patch.is_empty() {
                app.close();
                return Ok(vec![Notice::info("Nothing to update", "No field was changed")]);
            }
            app.collection.update_book(&id, patch)?;
            app.close();
            Ok(vec![Notice::success(
                "Book updated!",
                "Your book was updated and can be reviewed in the collection",
            )])
        }

        Event::DeleteBook(id) => {
            if app.collection.remove_book(&id) {
                Ok(vec![Notice::success("Book removed", "The book was deleted from your records")])
            } else {
                Ok(vec![])
            }
        }

        Event::OpenSettings => {
            app.transition(DrawerMode::Settings);
            Ok(vec![])
        }

        Event::SelectLabel { kind, id } => {
            app.collection.set_selected_label(kind, id.as_deref());
            Ok(vec![])
        }

        Event::SubmitLabel { kind, label } => {
            let selected = app.collection.selected_label(kind).map(|l| l.id.clone());
            let notice = if let Some(id) = selected {
                app.collection.update_label(kind, &id, &label)?;
                Notice::success(
                    format!("{kind} updated"),
                    format!("Renamed to \"{}\"", label.trim()),
                )
            } else {
                let created = app.collection.create_label(kind, &label)?;
                Notice::success(
                    format!("{kind} added"),
                    format!("\"{}\" is ready to use", created.label),
                )
            };
            app.collection.set_selected_label(kind, None);
            Ok(vec![notice])
        }

        Event::DeleteLabel { kind, id } => match app.collection.remove_label(kind, &id) {
            Ok(true) => Ok(vec![Notice::success(
                format!("{kind} removed"),
                "The entry was deleted",
            )]),
            Ok(false) => Ok(vec![]),
            Err(e @ ShelfmarkError::LabelInUse { .. }) => {
                Ok(vec![Notice::warning("Careful!", e.to_string())])
            }
            Err(e) => Err(e),
        },

        Event::OpenFilter => {
            app.transition(DrawerMode::Filter);
            Ok(vec![])
        }

        Event::ApplyFilter(spec) => {
            let field = spec.field();
            let matched = app.collection.apply_filter(spec).len();
            Ok(no_match_notice(matched, &format!("No book matches the {field} filter")))
        }

        Event::Search(query) => {
            let matched = app.collection.search(&query).len();
            Ok(no_match_notice(matched, &format!("No book matches \"{query}\"")))
        }

        Event::ClearFilter => {
            app.collection.clear_filter();
            Ok(vec![])
        }

        Event::Close => {
            app.close();
            Ok(vec![])
        }
    }
}

fn full_patch(draft: BookDraft) -> BookPatch {
    BookPatch {
        title: Some(draft.title),
        author: Some(draft.author),
        genre: Some(draft.genre),
        rating: Some(draft.rating),
        category_ids: Some(draft.category_ids),
        tag_ids: Some(draft.tag_ids),
    }
}

fn no_match_notice(matched: usize, description: &str) -> Vec<Notice> {
    if matched == 0 {
        vec![Notice::info("No match", description)]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CollectionStore, NoticeLevel};
    use crate::remote::NoRemote;
    use crate::storage::MemoryStore;

    fn app() -> App {
        let mut app = App::new(CollectionStore::new(MemoryStore::new(), NoRemote));
        handle_event(&mut app, Event::Hydrate).unwrap();
        app
    }

    fn submit_category(label: &str) -> Event {
        Event::SubmitLabel {
            kind: LabelKind::Category,
            label: label.into(),
        }
    }

    fn draft(title: &str) -> BookDraft {
        BookDraft {
            title: title.into(),
            author: "Ursula K. Le Guin".into(),
            genre: "Fantasy".into(),
            rating: 4,
            ..BookDraft::default()
        }
    }

    #[test]
    fn submit_without_selection_creates_and_closes() {
        let mut app = app();
        handle_event(&mut app, Event::OpenForm { book_id: None }).unwrap();
        assert_eq!(app.mode(), DrawerMode::Form);

        let notices = handle_event(&mut app, Event::SubmitBook(draft("Earthsea"))).unwrap();
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(app.collection.books().len(), 1);
        assert_eq!(app.mode(), DrawerMode::None);
    }

    #[test]
    fn submit_with_selection_updates_then_clears_selection() {
        let mut app = app();
        let book = app.collection.create_book(draft("Earthsea")).unwrap();

        handle_event(&mut app, Event::OpenForm { book_id: Some(book.id.clone()) }).unwrap();
        assert!(app.collection.selected_book().is_some());

        let mut edited = draft("A Wizard of Earthsea");
        edited.rating = 5;
        handle_event(&mut app, Event::SubmitBook(edited)).unwrap();

        assert_eq!(app.collection.books().len(), 1);
        let stored = app.collection.book(&book.id).unwrap();
        assert_eq!(stored.title, "A Wizard of Earthsea");
        assert_eq!(stored.rating, 5);
        assert!(app.collection.selected_book().is_none());
    }

    #[test]
    fn closing_form_clears_selected_book() {
        let mut app = app();
        let book = app.collection.create_book(draft("Earthsea")).unwrap();
        handle_event(&mut app, Event::OpenForm { book_id: Some(book.id) }).unwrap();

        handle_event(&mut app, Event::Close).unwrap();
        assert!(app.collection.selected_book().is_none());
        assert_eq!(app.mode(), DrawerMode::None);
    }

    #[test]
    fn switching_from_settings_clears_label_selection() {
        let mut app = app();
        let tag = app.collection.create_tag("reread").unwrap();
        handle_event(&mut app, Event::OpenSettings).unwrap();
        let select = Event::SelectLabel {
            kind: LabelKind::Tag,
            id: Some(tag.id),
        };
        handle_event(&mut app, select).unwrap();
        assert!(app.collection.selected_label(LabelKind::Tag).is_some());

        handle_event(&mut app, Event::OpenFilter).unwrap();
        assert!(app.collection.selected_label(LabelKind::Tag).is_none());
    }

    #[test]
    fn invalid_submission_keeps_form_open() {
        let mut app = app();
        handle_event(&mut app, Event::OpenForm { book_id: None }).unwrap();
        let result = handle_event(&mut app, Event::SubmitBook(draft("No")));
        assert!(matches!(result, Err(ShelfmarkError::Validation(_))));
        assert_eq!(app.mode(), DrawerMode::Form);
        assert!(app.collection.books().is_empty());
    }

    #[test]
    fn patch_without_selection_warns() {
        let mut app = app();
        let notices = handle_event(&mut app, Event::SubmitBookPatch(BookPatch::default())).unwrap();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn empty_patch_closes_form_without_writing() {
        let mut app = app();
        let book = app.collection.create_book(draft("Earthsea")).unwrap();
        handle_event(&mut app, Event::OpenForm { book_id: Some(book.id.clone()) }).unwrap();

        let notices = handle_event(&mut app, Event::SubmitBookPatch(BookPatch::default())).unwrap();
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert_eq!(app.mode(), DrawerMode::None);
        assert_eq!(app.collection.book(&book.id), Some(&book));
    }

    #[test]
    fn closing_twice_is_harmless() {
        let mut app = app();
        handle_event(&mut app, Event::OpenSettings).unwrap();
        handle_event(&mut app, Event::Close).unwrap();
        handle_event(&mut app, Event::Close).unwrap();
        assert!(!app.modes.is_open());
    }

    #[test]
    fn label_submit_creates_then_renames_selected() {
        let mut app = app();
        handle_event(&mut app, Event::OpenSettings).unwrap();
        handle_event(&mut app, submit_category("Classic")).unwrap();
        let id = app.collection.categories()[0].id.clone();

        let select = Event::SelectLabel {
            kind: LabelKind::Category,
            id: Some(id.clone()),
        };
        handle_event(&mut app, select).unwrap();
        handle_event(&mut app, submit_category("Classics")).unwrap();

        assert_eq!(app.collection.categories().len(), 1);
        assert_eq!(app.collection.label(LabelKind::Category, &id).unwrap().label, "Classics");
        assert!(app.collection.selected_label(LabelKind::Category).is_none());
    }

    #[test]
    fn deleting_used_category_produces_warning() {
        let mut app = app();
        let classic = app.collection.create_category("Classic").unwrap();
        let mut d = draft("Earthsea");
        d.category_ids = vec![classic.id.clone()];
        app.collection.create_book(d).unwrap();

        let notices = handle_event(
            &mut app,
            Event::DeleteLabel { kind: LabelKind::Category, id: classic.id.clone() },
        )
        .unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].description, "Category \"Classic\" is associated with a book");
        assert_eq!(app.collection.categories().len(), 1);
    }

    #[test]
    fn empty_filter_result_yields_info_notice() {
        let mut app = app();
        app.collection.create_book(draft("Earthsea")).unwrap();

        let notices = handle_event(&mut app, Event::ApplyFilter(FilterSpec::Rating(1))).unwrap();
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert_eq!(app.collection.visible_books().len(), 1);

        let notices = handle_event(&mut app, Event::Search("earth".into())).unwrap();
        assert!(notices.is_empty());
        assert_eq!(app.collection.filtered_books().map(<[_]>::len), Some(1));

        handle_event(&mut app, Event::ClearFilter).unwrap();
        assert!(app.collection.filtered_books().is_none());
    }
}
