//! Domain models for the expense tracker.
//!
//! Pure data structures shared between the remote client, the in-memory store and
//! the command-line application. Types here validate themselves on construction
//! but carry no I/O or synchronisation logic.

pub mod category;
pub mod error;
pub mod expense;
pub mod money;
pub mod new_expense;
pub mod responses;
pub mod summary;

#[cfg(test)]
mod tests;

pub use category::{Category, CategoryFilter};
pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use expense::{Expense, ExpenseId};
pub use money::Money;
pub use new_expense::NewExpense;
pub use new_expense::builder::NewExpenseBuilder;
pub use responses::{DeleteAck, HealthReport};
pub use summary::Summary;
