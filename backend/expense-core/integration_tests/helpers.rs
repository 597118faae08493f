//! Test helpers for HTTP integration tests.
//!
//! Builds clients against a `wiremock` server and provides the JSON bodies the
//! remote expense store sends.

use expense_core::AggregationClient;

use serde_json::{Value, json};
use wiremock::MockServer;

pub async fn start_store() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> AggregationClient {
    AggregationClient::new(&server.uri()).expect("Failed to build client for mock server")
}

pub fn expense_json(id: i64, amount: f64, description: &str, category: &str, date: &str) -> Value {
    json!({
        "id": id,
        "amount": amount,
        "description": description,
        "category": category,
        "date": date,
    })
}

pub fn all_expenses_json() -> Value {
    json!([
        expense_json(3, 80.0, "Electricity", "Bills", "2024-03-12"),
        expense_json(2, 12.0, "Cinema", "Entertainment", "2024-03-12"),
        expense_json(1, 45.0, "Groceries", "Food", "2024-03-10"),
    ])
}

pub fn all_summary_json() -> Value {
    json!({
        "overall_total": 137.0,
        "totals_by_category": {"Bills": 80.0, "Entertainment": 12.0, "Food": 45.0},
        "count": 3,
    })
}

pub fn food_expenses_json() -> Value {
    json!([expense_json(1, 45.0, "Groceries", "Food", "2024-03-10")])
}

pub fn food_summary_json() -> Value {
    json!({
        "overall_total": 45.0,
        "totals_by_category": {"Food": 45.0},
        "count": 1,
    })
}
