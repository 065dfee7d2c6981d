//! Panel mode register.
//!
//! Exactly one overlay panel is open at a time: the add/edit form, the
//! settings panel (categories and tags), the filter panel, or none.
//!
//! # Selection Contract
//!
//! Leaving [`DrawerMode::Form`] must clear the selected book, and leaving
//! [`DrawerMode::Settings`] must clear the selected category and tag, so the
//! next create flow starts from empty defaults. [`ModeStore::set_mode`]
//! reports the mode that was left; the event handler uses it to reset the
//! matching selection on the collection store.
//!
//! # Example
//!
//! ```rust
//! use shelfmark::app::{DrawerMode, ModeStore};
//!
//! let mut modes = ModeStore::default();
//! modes.set_mode(DrawerMode::Form);
//! let left = modes.close();
//! assert_eq!(left, Some(DrawerMode::Form));
//! assert_eq!(modes.mode(), DrawerMode::None);
//! ```

/// Which overlay panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerMode {
    /// No panel; the collection table is in front.
    #[default]
    None,

    /// Add or edit book form. Edit mode when a book is selected.
    Form,

    /// Category and tag management.
    Settings,

    /// Filter panel.
    Filter,
}

/// Holds the current [`DrawerMode`].
#[derive(Debug, Clone, Default)]
pub struct ModeStore {
    mode: DrawerMode,
}

impl ModeStore {
    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> DrawerMode {
        self.mode
    }

    /// Returns `true` if any panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode != DrawerMode::None
    }

    /// Switches to `mode`.
    ///
    /// Returns the mode that was left, or `None` if `mode` was already active.
    pub fn set_mode(&mut self, mode: DrawerMode) -> Option<DrawerMode> {
        if self.mode == mode {
            return None;
        }

        let previous = std::mem::replace(&mut self.mode, mode);
        tracing::debug!(from = ?previous, to = ?mode, "drawer mode changed");
        Some(previous)
    }

    /// Closes the open panel. Equivalent to `set_mode(DrawerMode::None)`.
    pub fn close(&mut self) -> Option<DrawerMode> {
        self.set_mode(DrawerMode::None)
    }
}
