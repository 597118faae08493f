//! Sequencing of remote operations in response to user intents.
//!
//! [`SyncCoordinator`] is the only writer of the [`ExpenseStore`] and the only
//! place that decides which remote calls to make and in which order.
//!
//! # Protocol
//!
//! - **InitialLoad / FilterChanged / Refresh**: list and summary fetches for the
//!   target filter are dispatched together and complete independently; each
//!   writes to the store as soon as it finishes.
//! - **CreateExpense / DeleteExpense**: one remote call, then a refresh of the
//!   active filter on success. No optimistic insert or removal.
//!
//! # Error policy
//!
//! - List, create and delete failures set the banner. There are no automatic
//!   retries; [`Intent::Refresh`] is the manual retry.
//! - Summary failures are logged only. The previous summary (or none) stays.
//! - Failures never clear cached data.
//!
//! # Concurrency
//!
//! Intended for a single-threaded cooperative runtime. Multiple refreshes may be
//! in flight at once; every fetch carries a [`RequestTicket`] and the store drops
//! results whose filter is no longer active, so rapid filter switching always
//! ends on the last selected filter.

pub mod intent;
pub mod ticket;

pub use intent::{Intent, IntentOutcome, RefreshOutcome};
pub use ticket::RequestTicket;

use crate::client::ExpenseApi;
use crate::error::client::ClientError;
use crate::filter::FilterController;
use crate::store::{Completion, ExpenseStore, Operation};

use models::{CategoryFilter, Expense, ExpenseId, NewExpense};

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info, warn};

pub const LIST_FAILED_MESSAGE: &str =
    "Failed to load expenses. Please check if the backend is running.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to add expense. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete expense. Please try again.";

pub struct SyncCoordinator<C> {
    client: C,
    store: ExpenseStore,
    filter: FilterController,
    sequence: AtomicU64,
}

impl<C: ExpenseApi> SyncCoordinator<C> {
    pub fn new(client: C) -> Self {
        Self::with_parts(client, ExpenseStore::new(), FilterController::default())
    }

    /// Builds a coordinator around existing store and filter handles, so callers
    /// can keep clones for reading.
    pub fn with_parts(client: C, store: ExpenseStore, filter: FilterController) -> Self {
        Self {
            client,
            store,
            filter,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterController {
        &self.filter
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn dispatch(&self, intent: Intent) -> Result<IntentOutcome, ClientError> {
        match intent {
            Intent::InitialLoad => Ok(IntentOutcome::Refreshed(self.initial_load().await)),
            Intent::FilterChanged(filter) => Ok(IntentOutcome::Refreshed(self.select(filter).await)),
            Intent::Refresh => Ok(IntentOutcome::Refreshed(self.refresh().await)),
            Intent::CreateExpense(expense) => self
                .create_expense(&expense)
                .await
                .map(IntentOutcome::Created),
            Intent::DeleteExpense(id) => self
                .delete_expense(id)
                .await
                .map(|()| IntentOutcome::Deleted(id)),
        }
    }

    pub async fn initial_load(&self) -> RefreshOutcome {
        let filter = self.filter.current();
        info!("Initial load for {filter}");
        self.refresh_for(filter).await
    }

    /// Activates `selection` and reloads list and summary for it.
    pub async fn select(&self, selection: impl Into<CategoryFilter>) -> RefreshOutcome {
        let filter = self.filter.select(selection);
        self.refresh_for(filter).await
    }

    /// Reloads list and summary for the active filter.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_for(self.filter.current()).await
    }

    /// Creates `expense` remotely, then refreshes the active filter.
    ///
    /// On failure the banner is set and the cached list and summary are left
    /// exactly as they were.
    pub async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ClientError> {
        self.store.set_loading(Operation::Create);

        match self.client.create(expense).await {
            Ok(created) => {
                info!(
                    "Created expense {} ({} {})",
                    created.id, created.amount, created.category
                );
                self.store.set_succeeded(Operation::Create);
                self.refresh().await;
                Ok(created)
            }
            Err(e) => {
                error!("Create failed: {e}");
                self.store
                    .set_error(Operation::Create, CREATE_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Deletes `id` remotely, then refreshes the active filter.
    ///
    /// On failure (including an unknown id) the banner is set and the record
    /// stays visible.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), ClientError> {
        self.store.set_loading(Operation::Delete);

        match self.client.delete(id).await {
            Ok(ack) => {
                info!("Deleted expense {id}: {}", ack.message);
                self.store.set_succeeded(Operation::Delete);
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                error!("Delete of {id} failed: {e}");
                self.store
                    .set_error(Operation::Delete, DELETE_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    fn issue(&self, filter: CategoryFilter) -> RequestTicket {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RequestTicket::new(filter, sequence)
    }

    async fn refresh_for(&self, filter: CategoryFilter) -> RefreshOutcome {
        let list_ticket = self.issue(filter);
        let summary_ticket = self.issue(filter);
        debug!(
            "Refreshing {filter} (list #{}, summary #{})",
            list_ticket.sequence(),
            summary_ticket.sequence()
        );

        self.store.set_loading(Operation::ListFetch);
        self.store.set_loading(Operation::SummaryFetch);

        let (list, summary) = tokio::join!(
            self.load_list(list_ticket),
            self.load_summary(summary_ticket)
        );

        RefreshOutcome {
            filter,
            list,
            summary,
        }
    }

    async fn load_list(&self, ticket: RequestTicket) -> Completion {
        let result = self.client.fetch_list(ticket.filter()).await;
        let active = self.filter.current();

        match result {
            Ok(expenses) => self.store.set_expenses(ticket, active, expenses),
            Err(e) => {
                let completion = self.store.set_fetch_error(
                    Operation::ListFetch,
                    ticket,
                    active,
                    LIST_FAILED_MESSAGE.to_string(),
                );
                if completion == Completion::Failed {
                    error!("Expense list fetch for {} failed: {e}", ticket.filter());
                }
                completion
            }
        }
    }

    async fn load_summary(&self, ticket: RequestTicket) -> Completion {
        let result = self.client.fetch_summary(ticket.filter()).await;
        let active = self.filter.current();

        match result {
            Ok(summary) => {
                if ticket.filter().is_all() && !summary.is_consistent() {
                    match summary.categories_total() {
                        Some(categories) => warn!(
                            "Summary total {} differs from category totals {categories}",
                            summary.overall_total
                        ),
                        None => warn!(
                            "Summary category totals overflow (overall total {})",
                            summary.overall_total
                        ),
                    }
                }
                self.store.set_summary(ticket, active, summary)
            }
            Err(e) => {
                let completion = self.store.set_fetch_error(
                    Operation::SummaryFetch,
                    ticket,
                    active,
                    e.message().to_string(),
                );
                if completion == Completion::Failed {
                    warn!("Summary fetch for {} failed: {e}", ticket.filter());
                }
                completion
            }
        }
    }
}
