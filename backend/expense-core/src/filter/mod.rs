//! The single active category filter.

use models::{CategoryFilter, ModelError};

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

/// Holds the currently selected [`CategoryFilter`].
///
/// Reads are public. Selection is crate-private: UI code selects through
/// [`crate::sync::SyncCoordinator::select`], which is what guarantees every
/// selection triggers a refresh.
#[derive(Clone, Default)]
pub struct FilterController {
    current: Arc<RwLock<CategoryFilter>>,
}

impl FilterController {
    pub fn new(initial: CategoryFilter) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn current(&self) -> CategoryFilter {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translates a selection label (`"All"` or a category name) into a filter.
    pub fn parse_selection(label: &str) -> Result<CategoryFilter, ModelError> {
        label.parse()
    }

    /// Makes `selection` the active filter and returns it.
    pub(crate) fn select(&self, selection: impl Into<CategoryFilter>) -> CategoryFilter {
        let selected = selection.into();
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if *current != selected {
            debug!("Filter changed: {} -> {selected}", *current);
        }
        *current = selected;
        selected
    }
}
