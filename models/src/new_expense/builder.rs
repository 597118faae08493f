use crate::new_expense::MAX_DESCRIPTION_CHARS;
use crate::{Category, ErrorLocation, ModelError, Money, NewExpense};

use std::panic::Location;

use chrono::{Local, NaiveDate};

/// Builder for validated [`NewExpense`] values.
///
/// Mirrors the checks the entry form and the remote store both apply, so an
/// invalid expense never reaches the network.
#[derive(Debug, Default)]
pub struct NewExpenseBuilder {
    amount: Option<Money>,
    description: Option<String>,
    category: Option<Category>,
    date: Option<NaiveDate>,
}

impl NewExpenseBuilder {
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Defaults to today's local date when never called.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[track_caller]
    pub fn build(self) -> Result<NewExpense, ModelError> {
        let amount = self.amount.ok_or_else(|| ModelError::Validation {
            message: String::from("Amount is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if amount < Money::MIN_EXPENSE {
            return Err(ModelError::Validation {
                message: format!("Amount must be at least {}", Money::MIN_EXPENSE),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if description.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Description is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ModelError::Validation {
                message: format!("Description must be at most {MAX_DESCRIPTION_CHARS} characters"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let category = self.category.ok_or_else(|| ModelError::Validation {
            message: String::from("Category is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let date = self.date.unwrap_or_else(|| Local::now().date_naive());

        Ok(NewExpense {
            amount,
            description,
            category,
            date,
        })
    }
}
