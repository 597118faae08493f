//! Shared plumbing for the expense tracker workspace.
//!
//! Everything here is free of domain knowledge so that both the data model
//! (`models`) and the synchronisation core (`expense-core`) can depend on it.
//!
//! ## Architecture
//!
//! - **common** (this crate): error locations, HTTP status helpers
//! - **models**: expense data structures and validation
//! - **expense-core**: remote client, store, filter and sync coordinator
//! - **expenses**: command-line application wiring it together

pub mod error;
pub mod http_status;


pub use error::error_location::ErrorLocation;
pub use http_status::HttpStatusCode;
