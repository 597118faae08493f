//! Round trips to the remote expense store.
//!
//! [`ExpenseApi`] is the seam the sync coordinator talks to; [`AggregationClient`]
//! is the HTTP implementation of the store's REST contract:
//!
//! - `GET    /api/expenses?category={name}`
//! - `POST   /api/expenses`
//! - `DELETE /api/expenses/{id}`
//! - `GET    /api/expenses/summary?category={name}`
//!
//! The client never caches. Every call is a fresh request; caching belongs to
//! [`crate::store::ExpenseStore`].

use crate::error::client::ClientError;

use common::{ErrorLocation, HttpStatusCode};
use models::{CategoryFilter, DeleteAck, Expense, ExpenseId, HealthReport, NewExpense, Summary};

use std::future::Future;
use std::panic::Location;
use std::time::Duration;

use log::{debug, trace, warn};
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const EXPENSES_ENDPOINT: &str = "api/expenses";
const SUMMARY_ENDPOINT: &str = "api/expenses/summary";
const HEALTH_ENDPOINT: &str = "api/health";
const CATEGORY_QUERY_KEY: &str = "category";
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Operations the coordinator needs from the remote store.
///
/// Each method is exactly one round trip and fails with a [`ClientError`] on
/// connectivity problems or a non-success response.
pub trait ExpenseApi {
    /// Expenses in the store's order, restricted to `filter`.
    fn fetch_list(
        &self,
        filter: CategoryFilter,
    ) -> impl Future<Output = Result<Vec<Expense>, ClientError>>;

    /// Totals for `filter`, recomputed by the store.
    fn fetch_summary(
        &self,
        filter: CategoryFilter,
    ) -> impl Future<Output = Result<Summary, ClientError>>;

    /// Creates an expense and returns it with its server-assigned id.
    fn create(&self, expense: &NewExpense) -> impl Future<Output = Result<Expense, ClientError>>;

    /// Deletes by id. Unknown ids fail with [`ClientError::NotFound`], so a
    /// second delete of the same id is an error.
    fn delete(&self, id: ExpenseId) -> impl Future<Output = Result<DeleteAck, ClientError>>;
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for the remote expense store.
#[derive(Clone)]
pub struct AggregationClient {
    base_url: Url,
    client: Client,
}

impl AggregationClient {
    pub fn new(base_url_str: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    /// `timeout` bounds each whole request; it is the only timeout in the stack.
    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url_str)?;

        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, filter: CategoryFilter) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(path)?;
        if let Some(category) = filter.as_query() {
            url.query_pairs_mut()
                .append_pair(CATEGORY_QUERY_KEY, category);
        }
        Ok(url)
    }

    /// Returns `true` when `GET /api/health` answers with a healthy status.
    ///
    /// Never errors: unreachable hosts, bad bodies and timeouts all read as unhealthy.
    pub async fn check_health(&self) -> bool {
        let url = match self.base_url.join(HEALTH_ENDPOINT) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid health URL: {e}");
                return false;
            }
        };

        trace!("GET {url}");
        let response = match self
            .client
            .get(url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Health check returned HTTP {}", response.status().as_u16());
                return false;
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                return false;
            }
        };

        match response.json::<HealthReport>().await {
            Ok(report) => report.is_healthy(),
            Err(e) => {
                debug!("Health check body unreadable: {e}");
                false
            }
        }
    }
}

/// Turns a non-success response into [`ClientError::Server`], preferring the
/// store's `{"error": "..."}` body as the message.
async fn server_error(response: Response) -> ClientError {
    let status = HttpStatusCode::from(response.status().as_u16());
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);

    ClientError::Server {
        status,
        message: format!("HTTP {status} - {detail}"),
        location: ErrorLocation::from(Location::caller()),
    }
}

impl ExpenseApi for AggregationClient {
    async fn fetch_list(&self, filter: CategoryFilter) -> Result<Vec<Expense>, ClientError> {
        let url = self.endpoint(EXPENSES_ENDPOINT, filter)?;
        trace!("GET {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let expenses: Vec<Expense> = response.json().await?;
        debug!("Fetched {} expenses for {filter}", expenses.len());
        Ok(expenses)
    }

    async fn fetch_summary(&self, filter: CategoryFilter) -> Result<Summary, ClientError> {
        let url = self.endpoint(SUMMARY_ENDPOINT, filter)?;
        trace!("GET {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let summary: Summary = response.json().await?;
        debug!(
            "Fetched summary for {filter}: total {} over {} expenses",
            summary.overall_total, summary.count
        );
        Ok(summary)
    }

    async fn create(&self, expense: &NewExpense) -> Result<Expense, ClientError> {
        let url = self.base_url.join(EXPENSES_ENDPOINT)?;
        trace!("POST {url}");

        let response = self.client.post(url).json(expense).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let created: Expense = response.json().await?;
        debug!("Created expense {}", created.id);
        Ok(created)
    }

    async fn delete(&self, id: ExpenseId) -> Result<DeleteAck, ClientError> {
        let url = self.base_url.join(&format!("{EXPENSES_ENDPOINT}/{id}"))?;
        trace!("DELETE {url}");

        let response = self.client.delete(url).send().await?;
        let status = HttpStatusCode::from(response.status().as_u16());

        if status.is_not_found() {
            return Err(ClientError::NotFound {
                message: format!("Expense {id} does not exist"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        // The acknowledgement body is informational; an empty body still means success.
        let body = response.text().await?;
        let ack = if body.trim().is_empty() {
            DeleteAck::default()
        } else {
            serde_json::from_str(&body)?
        };
        debug!("Deleted expense {id}");
        Ok(ack)
    }
}
