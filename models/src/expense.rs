use crate::{Category, ErrorLocation, ModelError, Money};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-assigned expense identifier.
///
/// Opaque to the client: it is only ever echoed back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(i64);

impl ExpenseId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        Display::fmt(&self.0, formatter)
    }
}

impl FromStr for ExpenseId {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(ExpenseId)
            .map_err(|e| ModelError::Validation {
                message: format!("Invalid expense id '{value}': {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// One recorded expense as held by the remote store.
///
/// The client never edits these; it only replaces whole lists of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}
