//! Client-side core of the expense tracker.
//!
//! - [`client`]: HTTP round trips to the remote expense store
//! - [`store`]: the cached list, summary and request status
//! - [`filter`]: the active category filter
//! - [`sync`]: turns user intents into remote calls and store writes
//! - [`config`]: where the store lives and how long to wait for it

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod store;
pub mod sync;

#[cfg(test)]
mod tests;

pub use client::{AggregationClient, ExpenseApi};
pub use config::AppConfig;
pub use error::CoreError;
pub use error::client::ClientError;
pub use error::config::ConfigError;
pub use filter::FilterController;
pub use store::{Completion, ExpenseStore, Operation, RequestStatus, StoreSnapshot};
pub use sync::{Intent, IntentOutcome, RefreshOutcome, SyncCoordinator};
