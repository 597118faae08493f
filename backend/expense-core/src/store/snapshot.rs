use crate::store::status::{Operation, RequestStatus};

use models::{CategoryFilter, Expense, Summary};

/// Read-only view of everything the store holds.
///
/// `expenses_scope` and `summary_scope` record which filter produced the cached
/// list and summary; they are `None` until the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub expenses: Vec<Expense>,
    pub expenses_scope: Option<CategoryFilter>,
    pub summary: Option<Summary>,
    pub summary_scope: Option<CategoryFilter>,
    pub banner: Option<String>,
    pub list_status: RequestStatus,
    pub summary_status: RequestStatus,
    pub create_status: RequestStatus,
    pub delete_status: RequestStatus,
}

impl StoreSnapshot {
    pub fn status(&self, operation: Operation) -> &RequestStatus {
        match operation {
            Operation::ListFetch => &self.list_status,
            Operation::SummaryFetch => &self.summary_status,
            Operation::Create => &self.create_status,
            Operation::Delete => &self.delete_status,
        }
    }

    pub(crate) fn status_mut(&mut self, operation: Operation) -> &mut RequestStatus {
        match operation {
            Operation::ListFetch => &mut self.list_status,
            Operation::SummaryFetch => &mut self.summary_status,
            Operation::Create => &mut self.create_status,
            Operation::Delete => &mut self.delete_status,
        }
    }

    /// The expense list is being (re)loaded.
    pub fn is_loading(&self) -> bool {
        self.list_status.is_loading()
    }
}
