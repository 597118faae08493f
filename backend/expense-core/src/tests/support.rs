//! In-memory stand-ins for the remote expense store.
//!
//! - [`FakeRemote`]: answers immediately, aggregates like the real store and can be
//!   told to fail individual operations or to answer summaries with fixed totals.
//! - [`GatedRemote`]: wraps a [`FakeRemote`] and holds every fetch until the test
//!   releases it, so completion order can be forced.

use crate::client::ExpenseApi;
use crate::error::client::ClientError;
use crate::store::Operation;

use common::ErrorLocation;
use models::{
    Category, CategoryFilter, DeleteAck, Expense, ExpenseId, Money, NewExpense,
    NewExpenseBuilder, Summary,
};

use std::collections::HashSet;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tokio::sync::Semaphore;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn expense(id: i64, cents: i64, description: &str, category: Category, on: NaiveDate) -> Expense {
    Expense {
        id: ExpenseId::new(id),
        amount: Money::from_cents(cents),
        description: description.to_string(),
        category,
        date: on,
    }
}

pub fn new_expense(cents: i64, description: &str, category: Category) -> NewExpense {
    NewExpenseBuilder::default()
        .with_amount(Money::from_cents(cents))
        .with_description(description)
        .with_category(category)
        .with_date(date(2024, 3, 20))
        .build()
        .expect("valid test expense")
}

/// Four expenses over three categories, nothing in Transport.
pub fn seed() -> Vec<Expense> {
    vec![
        expense(1, 4500, "Groceries", Category::Food, date(2024, 3, 10)),
        expense(2, 1200, "Cinema", Category::Entertainment, date(2024, 3, 12)),
        expense(3, 8000, "Electricity", Category::Bills, date(2024, 3, 12)),
        expense(4, 900, "Coffee beans", Category::Food, date(2024, 3, 15)),
    ]
}

#[track_caller]
fn unavailable() -> ClientError {
    ClientError::Http {
        message: String::from("error sending request: connection refused"),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[derive(Default)]
struct RemoteState {
    expenses: Vec<Expense>,
    next_id: i64,
    failing: HashSet<Operation>,
    fixed_summary: Option<Summary>,
    list_calls: usize,
    summary_calls: usize,
}

#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<RemoteState>,
}

impl FakeRemote {
    pub fn seeded(expenses: Vec<Expense>) -> Self {
        let next_id = expenses.iter().map(|e| e.id.value()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(RemoteState {
                expenses,
                next_id,
                ..RemoteState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().expect("fake remote lock")
    }

    /// Adds a record directly, as another client would.
    pub fn insert(&self, cents: i64, description: &str, category: Category, on: NaiveDate) -> Expense {
        let mut state = self.state();
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let created = expense(id, cents, description, category, on);
        state.expenses.push(created.clone());
        created
    }

    pub fn fail(&self, operation: Operation) {
        self.state().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.state().failing.remove(&operation);
    }

    /// Every later summary fetch returns `summary` verbatim, whatever the filter.
    pub fn answer_summaries_with(&self, summary: Summary) {
        self.state().fixed_summary = Some(summary);
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub fn summary_calls(&self) -> usize {
        self.state().summary_calls
    }

    pub fn stored(&self) -> usize {
        self.state().expenses.len()
    }

    fn filtered(state: &RemoteState, filter: CategoryFilter) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| filter.matches(e.category))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        expenses
    }
}

impl ExpenseApi for FakeRemote {
    async fn fetch_list(&self, filter: CategoryFilter) -> Result<Vec<Expense>, ClientError> {
        let mut state = self.state();
        state.list_calls += 1;
        if state.failing.contains(&Operation::ListFetch) {
            return Err(unavailable());
        }
        Ok(Self::filtered(&state, filter))
    }

    async fn fetch_summary(&self, filter: CategoryFilter) -> Result<Summary, ClientError> {
        let mut state = self.state();
        state.summary_calls += 1;
        if state.failing.contains(&Operation::SummaryFetch) {
            return Err(unavailable());
        }
        if let Some(summary) = &state.fixed_summary {
            return Ok(summary.clone());
        }
        Ok(Summary::from_expenses(&Self::filtered(&state, filter)))
    }

    async fn create(&self, new: &NewExpense) -> Result<Expense, ClientError> {
        if self.state().failing.contains(&Operation::Create) {
            return Err(unavailable());
        }
        Ok(self.insert(
            new.amount().cents(),
            new.description(),
            new.category(),
            new.date(),
        ))
    }

    async fn delete(&self, id: ExpenseId) -> Result<DeleteAck, ClientError> {
        let mut state = self.state();
        if state.failing.contains(&Operation::Delete) {
            return Err(unavailable());
        }
        let Some(index) = state.expenses.iter().position(|e| e.id == id) else {
            return Err(ClientError::NotFound {
                message: format!("Expense {id} does not exist"),
                location: ErrorLocation::from(Location::caller()),
            });
        };
        state.expenses.remove(index);
        Ok(DeleteAck {
            message: String::from("Expense deleted successfully"),
        })
    }
}

/// Holds each fetch after its answer is computed until the test releases it.
///
/// Fetches are numbered in call order per refresh: the n-th refresh issues list
/// call n and summary call n, both released by `release(n)`.
#[derive(Default)]
pub struct GatedRemote {
    inner: FakeRemote,
    list_gates: Mutex<Vec<Arc<Semaphore>>>,
    summary_gates: Mutex<Vec<Arc<Semaphore>>>,
}

impl GatedRemote {
    pub fn seeded(expenses: Vec<Expense>) -> Self {
        Self {
            inner: FakeRemote::seeded(expenses),
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &FakeRemote {
        &self.inner
    }

    fn register(gates: &Mutex<Vec<Arc<Semaphore>>>) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        gates.lock().expect("gate lock").push(Arc::clone(&gate));
        gate
    }

    fn issued(gates: &Mutex<Vec<Arc<Semaphore>>>) -> usize {
        gates.lock().expect("gate lock").len()
    }

    /// Waits until `count` refreshes have both their fetches parked at the gate.
    pub async fn wait_for_refreshes(&self, count: usize) {
        while Self::issued(&self.list_gates) < count || Self::issued(&self.summary_gates) < count {
            tokio::task::yield_now().await;
        }
    }

    /// Lets the list and summary fetch of the `index`-th refresh complete.
    pub fn release(&self, index: usize) {
        self.list_gates.lock().expect("gate lock")[index].add_permits(1);
        self.summary_gates.lock().expect("gate lock")[index].add_permits(1);
    }
}

impl ExpenseApi for GatedRemote {
    async fn fetch_list(&self, filter: CategoryFilter) -> Result<Vec<Expense>, ClientError> {
        let gate = Self::register(&self.list_gates);
        let result = self.inner.fetch_list(filter).await;
        gate.acquire().await.expect("gate open").forget();
        result
    }

    async fn fetch_summary(&self, filter: CategoryFilter) -> Result<Summary, ClientError> {
        let gate = Self::register(&self.summary_gates);
        let result = self.inner.fetch_summary(filter).await;
        gate.acquire().await.expect("gate open").forget();
        result
    }

    async fn create(&self, new: &NewExpense) -> Result<Expense, ClientError> {
        self.inner.create(new).await
    }

    async fn delete(&self, id: ExpenseId) -> Result<DeleteAck, ClientError> {
        self.inner.delete(id).await
    }
}
