//! Expense categories and the category filter.

use crate::{ErrorLocation, ModelError};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label used by selection widgets for the "no filter" choice.
pub const ALL_CATEGORIES_LABEL: &str = "All";

/// The closed set of categories an expense can belong to.
///
/// Serialised with the exact variant names the remote store expects
/// (`"Food"`, `"Transport"`, ...). Ordering follows declaration order so that
/// per-category totals render in a stable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Bills,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Bills,
        Category::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    /// Case-insensitive match against the category names.
    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownCategory {
                value: value.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// The active category scope: one specific category, or every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(*category),
        }
    }

    /// Value for the `category` query parameter; `None` means the parameter is omitted.
    pub fn as_query(&self) -> Option<&'static str> {
        self.category().map(|category| category.as_str())
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }

    pub fn label(&self) -> &'static str {
        self.as_query().unwrap_or(ALL_CATEGORIES_LABEL)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl From<Option<Category>> for CategoryFilter {
    fn from(selection: Option<Category>) -> Self {
        selection.map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.pad(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = ModelError;

    /// Accepts `"All"` (any case) or a category name.
    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) {
            return Ok(CategoryFilter::All);
        }
        value.parse::<Category>().map(CategoryFilter::Only)
    }
}
