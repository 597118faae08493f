//! Authoritative in-memory cache of expenses, summary and request status.
//!
//! The store is a cheap `Clone` handle; every clone sees the same state, so UI
//! code can hold one for reads while the coordinator holds another for writes.
//!
//! # Mutation
//!
//! All mutators are crate-private and called only from
//! [`crate::sync::SyncCoordinator`]. Writes replace whole values (list, summary);
//! nothing is merged incrementally. Failures never clear cached data.
//!
//! # Stale results
//!
//! Fetch results arrive with the [`RequestTicket`] they were issued under. A
//! result is discarded when the ticket's filter differs from the filter active
//! at completion time, or when a newer completion of the same operation has
//! already settled.

pub mod snapshot;
pub mod status;

pub use snapshot::StoreSnapshot;
pub use status::{Completion, Operation, RequestStatus};

use crate::sync::RequestTicket;

use models::{CategoryFilter, Expense, Summary};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{info, warn};

#[derive(Debug, Default)]
struct StoreState {
    snapshot: StoreSnapshot,
    /// Sequence of the last settled list fetch (applied or failed).
    list_settled: u64,
    /// Sequence of the last settled summary fetch (applied or failed).
    summary_settled: u64,
}

impl StoreState {
    fn settled_mut(&mut self, operation: Operation) -> Option<&mut u64> {
        match operation {
            Operation::ListFetch => Some(&mut self.list_settled),
            Operation::SummaryFetch => Some(&mut self.summary_settled),
            Operation::Create | Operation::Delete => None,
        }
    }

    /// Checks the ticket and, when current, marks it as the latest settled one.
    fn settle(
        &mut self,
        operation: Operation,
        ticket: RequestTicket,
        active: CategoryFilter,
    ) -> bool {
        let Some(settled) = self.settled_mut(operation) else {
            return true;
        };

        if ticket.filter() != active {
            warn!(
                "Discarding {operation:?} result for {} (active filter is {active})",
                ticket.filter()
            );
            return false;
        }

        if ticket.sequence() < *settled {
            warn!(
                "Discarding {operation:?} result #{} (already settled #{})",
                ticket.sequence(),
                *settled
            );
            return false;
        }

        *settled = ticket.sequence();
        true
    }

    fn record_failure(&mut self, operation: Operation, message: String) {
        if operation.surfaces_banner() {
            self.snapshot.banner = Some(message.clone());
        }
        *self.snapshot.status_mut(operation) = RequestStatus::Failed(message);
    }
}

/// Shared cache of the current expense view.
#[derive(Clone, Default)]
pub struct ExpenseStore {
    state: Arc<RwLock<StoreState>>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latest written state, copied out so callers never hold the lock.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().snapshot.clone()
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.read().snapshot.expenses.clone()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.read().snapshot.summary.clone()
    }

    pub fn banner(&self) -> Option<String> {
        self.read().snapshot.banner.clone()
    }

    pub fn status(&self, operation: Operation) -> RequestStatus {
        self.read().snapshot.status(operation).clone()
    }

    /// Marks `operation` as in flight. Starting a list fetch clears the banner.
    pub(crate) fn set_loading(&self, operation: Operation) {
        let mut state = self.write();
        if operation == Operation::ListFetch {
            state.snapshot.banner = None;
        }
        *state.snapshot.status_mut(operation) = RequestStatus::Loading;
    }

    pub(crate) fn set_succeeded(&self, operation: Operation) {
        *self.write().snapshot.status_mut(operation) = RequestStatus::Succeeded;
    }

    /// Replaces the cached list wholesale, unless the ticket is stale.
    pub(crate) fn set_expenses(
        &self,
        ticket: RequestTicket,
        active: CategoryFilter,
        expenses: Vec<Expense>,
    ) -> Completion {
        let mut state = self.write();
        if !state.settle(Operation::ListFetch, ticket, active) {
            return Completion::Discarded;
        }

        info!("Showing {} expenses for {}", expenses.len(), ticket.filter());
        state.snapshot.expenses = expenses;
        state.snapshot.expenses_scope = Some(ticket.filter());
        state.snapshot.list_status = RequestStatus::Succeeded;
        Completion::Applied
    }

    /// Replaces the cached summary wholesale, unless the ticket is stale.
    pub(crate) fn set_summary(
        &self,
        ticket: RequestTicket,
        active: CategoryFilter,
        summary: Summary,
    ) -> Completion {
        let mut state = self.write();
        if !state.settle(Operation::SummaryFetch, ticket, active) {
            return Completion::Discarded;
        }

        state.snapshot.summary = Some(summary);
        state.snapshot.summary_scope = Some(ticket.filter());
        state.snapshot.summary_status = RequestStatus::Succeeded;
        Completion::Applied
    }

    /// Records a failed fetch, unless the ticket is stale. Cached data is kept.
    pub(crate) fn set_fetch_error(
        &self,
        operation: Operation,
        ticket: RequestTicket,
        active: CategoryFilter,
        message: String,
    ) -> Completion {
        let mut state = self.write();
        if !state.settle(operation, ticket, active) {
            return Completion::Discarded;
        }

        state.record_failure(operation, message);
        Completion::Failed
    }

    /// Records a failed create or delete. Cached data is kept.
    pub(crate) fn set_error(&self, operation: Operation, message: String) {
        self.write().record_failure(operation, message);
    }
}
