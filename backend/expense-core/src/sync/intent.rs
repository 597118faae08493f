use crate::store::Completion;

use models::{CategoryFilter, Expense, ExpenseId, NewExpense};

/// User intents consumed by [`crate::sync::SyncCoordinator::dispatch`].
#[derive(Debug, Clone)]
pub enum Intent {
    /// First load after startup, for the current filter.
    InitialLoad,
    /// Select a new filter and reload both list and summary for it.
    FilterChanged(CategoryFilter),
    /// Reload for the current filter; the manual retry after a failure.
    Refresh,
    CreateExpense(NewExpense),
    DeleteExpense(ExpenseId),
}

/// How each half of a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub filter: CategoryFilter,
    pub list: Completion,
    pub summary: Completion,
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        self.list == Completion::Applied && self.summary == Completion::Applied
    }
}

#[derive(Debug, Clone)]
pub enum IntentOutcome {
    Refreshed(RefreshOutcome),
    Created(Expense),
    Deleted(ExpenseId),
}
