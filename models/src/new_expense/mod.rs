//! Validated payload for creating an expense.

pub mod builder;

use crate::{Category, Money};

use chrono::NaiveDate;
use serde::Serialize;

/// Longest description the remote store accepts.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Body of `POST /api/expenses`.
///
/// Only obtainable through [`builder::NewExpenseBuilder::build`], so holding a
/// value means the form-level checks have already passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExpense {
    pub(crate) amount: Money,
    pub(crate) description: String,
    pub(crate) category: Category,
    pub(crate) date: NaiveDate,
}

impl NewExpense {
    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}
