//! Top-level application state.
//!
//! [`App`] bundles the two stores a front end talks to. It is created once at
//! startup and passed by reference to whatever drives the event loop; there is
//! no global instance.

use super::modes::{DrawerMode, ModeStore};
use super::store::CollectionStore;
use crate::domain::LabelKind;

/// The collection store plus the panel mode register.
#[derive(Debug)]
pub struct App {
    pub collection: CollectionStore,
    pub modes: ModeStore,
}

impl App {
    /// Wraps `collection` with a closed mode register.
    #[must_use]
    pub fn new(collection: CollectionStore) -> Self {
        Self {
            collection,
            modes: ModeStore::default(),
        }
    }

    /// Current panel mode.
    #[must_use]
    pub const fn mode(&self) -> DrawerMode {
        self.modes.mode()
    }

    /// Switches panels, clearing the selection owned by the panel being left.
    ///
    /// Leaving the form clears the selected book. Leaving settings clears the
    /// selected category and tag.
    pub fn transition(&mut self, mode: DrawerMode) {
        if let Some(left) = self.modes.set_mode(mode) {
            self.clear_selection_of(left);
        }
    }

    /// Closes the open panel. See [`transition`](Self::transition).
    pub fn close(&mut self) {
        if !self.modes.is_open() {
            tracing::trace!("no panel open");
            return;
        }
        if let Some(left) = self.modes.close() {
            self.clear_selection_of(left);
        }
    }

    fn clear_selection_of(&mut self, left: DrawerMode) {
        match left {
            DrawerMode::Form => self.collection.set_selected_book(None),
            DrawerMode::Settings => {
                self.collection.set_selected_label(LabelKind::Category, None);
                self.collection.set_selected_label(LabelKind::Tag, None);
            }
            DrawerMode::Filter | DrawerMode::None => {}
        }
    }
}
