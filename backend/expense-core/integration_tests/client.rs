use crate::helpers::{
    all_expenses_json, all_summary_json, client_for, expense_json, food_expenses_json,
    food_summary_json, start_store,
};

use expense_core::{AggregationClient, ClientError, ExpenseApi};
use models::{Category, CategoryFilter, ExpenseId, Money, NewExpenseBuilder};

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: Verifies the unfiltered list request carries no category parameter and decodes
/// amounts to exact cents.
///
/// **WHY THIS MATTERS**: "All" is expressed by omitting the parameter; sending `category=All`
/// would return nothing from the store.
///
/// **BUG THIS CATCHES**: Would catch the "All" label leaking into the query string.
#[tokio::test]
async fn given_all_filter_when_fetch_list_then_no_category_param() {
    // GIVEN: A store that only answers the unparameterised list request
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_expenses_json()))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Fetching with no filter
    let expenses = client_for(&server)
        .fetch_list(CategoryFilter::All)
        .await
        .expect("list fetch");

    // THEN: All records decoded, in the store's order
    assert_eq!(expenses.len(), 3);
    assert_eq!(expenses[0].id, ExpenseId::new(3));
    assert_eq!(expenses[0].amount, Money::from_cents(8000));
    assert_eq!(expenses[2].category, Category::Food);
    assert_eq!(
        expenses[2].date,
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    );
}

/// **VALUE**: Verifies list and summary requests both carry `category={name}` when filtered.
///
/// **WHY THIS MATTERS**: Filtering is done by the store; the client only forwards the choice.
///
/// **BUG THIS CATCHES**: Would catch the summary endpoint ignoring the active filter.
#[tokio::test]
async fn given_food_filter_when_fetching_then_category_param_sent() {
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(query_param("category", "Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(food_expenses_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .and(query_param("category", "Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(food_summary_json()))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let food = CategoryFilter::Only(Category::Food);

    let expenses = client.fetch_list(food).await.expect("list fetch");
    let summary = client.fetch_summary(food).await.expect("summary fetch");

    assert_eq!(expenses.len(), 1);
    assert_eq!(summary.overall_total, Money::from_cents(4500));
    assert_eq!(summary.total_for(Category::Food), Money::from_cents(4500));
    assert_eq!(summary.count, 1);
}

/// **VALUE**: Verifies the unfiltered summary decodes every category total.
///
/// **WHY THIS MATTERS**: The summary panel renders straight from this payload.
///
/// **BUG THIS CATCHES**: Would catch category keys failing to decode into the enum.
#[tokio::test]
async fn given_all_filter_when_fetch_summary_then_totals_decoded() {
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_summary_json()))
        .mount(&server)
        .await;

    let summary = client_for(&server)
        .fetch_summary(CategoryFilter::All)
        .await
        .expect("summary fetch");

    assert_eq!(summary.overall_total, Money::from_cents(13700));
    assert_eq!(summary.total_for(Category::Bills), Money::from_cents(8000));
    assert_eq!(summary.total_for(Category::Transport), Money::ZERO);
    assert!(summary.is_consistent());
}

/// **VALUE**: Verifies create posts the exact JSON body the store expects and returns the
/// server-assigned record.
///
/// **WHY THIS MATTERS**: Amount must go out as a decimal number and the date as `YYYY-MM-DD`.
///
/// **BUG THIS CATCHES**: Would catch amounts serialised as cents or dates with a time part.
#[tokio::test]
async fn given_new_expense_when_created_then_posts_body_and_returns_record() {
    let server = start_store().await;
    Mock::given(method("POST"))
        .and(path("/api/expenses"))
        .and(body_json(json!({
            "amount": 12.5,
            "description": "Lunch",
            "category": "Food",
            "date": "2024-03-20",
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(expense_json(7, 12.5, "Lunch", "Food", "2024-03-20")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let new = NewExpenseBuilder::default()
        .with_amount(Money::from_cents(1250))
        .with_description("  Lunch ")
        .with_category(Category::Food)
        .with_date(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
        .build()
        .unwrap();

    let created = client_for(&server).create(&new).await.expect("create");

    assert_eq!(created.id, ExpenseId::new(7));
    assert_eq!(created.amount, Money::from_cents(1250));
    assert_eq!(created.description, "Lunch");
}

/// **VALUE**: Verifies deleting the same id twice succeeds once and then fails with NotFound.
///
/// **WHY THIS MATTERS**: The second delete must be reported, not treated as idempotent.
///
/// **BUG THIS CATCHES**: Would catch 404 being folded into success or a generic server error.
#[tokio::test]
async fn given_existing_id_when_deleted_twice_then_second_is_not_found() {
    let server = start_store().await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Expense deleted successfully"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Expense not found"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let first = client.delete(ExpenseId::new(3)).await.expect("first delete");
    let second = client.delete(ExpenseId::new(3)).await;

    assert_eq!(first.message, "Expense deleted successfully");
    let error = second.expect_err("second delete fails");
    assert!(error.is_not_found());
    assert!(!error.is_transport());
    assert_eq!(error.message(), "Expense 3 does not exist");
}

/// **VALUE**: Verifies a delete acknowledged with an empty body still counts as success.
///
/// **WHY THIS MATTERS**: The acknowledgement text is informational only.
///
/// **BUG THIS CATCHES**: Would catch a JSON decode error on `204 No Content`.
#[tokio::test]
async fn given_empty_ack_when_deleted_then_success() {
    let server = start_store().await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .delete(ExpenseId::new(9))
        .await
        .expect("delete");

    assert!(ack.message.is_empty());
}

/// **VALUE**: Verifies the store's `{"error": ...}` body becomes the server error message.
///
/// **WHY THIS MATTERS**: The store explains validation failures there; losing it leaves only a
/// bare status code in the logs.
///
/// **BUG THIS CATCHES**: Would catch error bodies being discarded or decoded as success.
#[tokio::test]
async fn given_store_error_body_when_request_fails_then_message_preserved() {
    let server = start_store().await;
    Mock::given(method("POST"))
        .and(path("/api/expenses"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Amount must be positive"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Database unavailable"})))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let new = NewExpenseBuilder::default()
        .with_amount(Money::from_cents(100))
        .with_description("Snack")
        .with_category(Category::Food)
        .build()
        .unwrap();

    let rejected = client.create(&new).await.expect_err("create rejected");
    let failed = client
        .fetch_list(CategoryFilter::All)
        .await
        .expect_err("list fails");

    match rejected {
        ClientError::Server { status, message, .. } => {
            assert_eq!(status.0, 400);
            assert!(message.contains("Amount must be positive"), "got: {message}");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
    assert!(failed.is_transport());
    assert!(failed.is_retryable());
    assert!(failed.message().contains("Database unavailable"));
}

/// **VALUE**: Verifies an unparseable success body is reported as a JSON error.
///
/// **WHY THIS MATTERS**: A proxy answering with HTML must not be mistaken for an empty list.
///
/// **BUG THIS CATCHES**: Would catch decode failures being mapped to an empty result.
#[tokio::test]
async fn given_malformed_body_when_fetch_list_then_json_error() {
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch_list(CategoryFilter::All)
        .await
        .expect_err("decode fails");

    assert!(matches!(error, ClientError::Json { .. }), "got {error:?}");
}

/// **VALUE**: Verifies an unreachable store fails with a transport error.
///
/// **WHY THIS MATTERS**: "Backend not running" is the most common failure in development.
///
/// **BUG THIS CATCHES**: Would catch connection errors escaping as panics or hangs.
#[tokio::test]
async fn given_unreachable_store_when_fetch_list_then_http_error() {
    let server = start_store().await;
    let uri = server.uri();
    drop(server);
    let client = AggregationClient::new(&uri).unwrap();

    let error = client
        .fetch_list(CategoryFilter::All)
        .await
        .expect_err("connection refused");

    assert!(matches!(error, ClientError::Http { .. }), "got {error:?}");
    assert!(error.is_retryable());
}

/// **VALUE**: Verifies a base URL with a path prefix keeps the prefix.
///
/// **WHY THIS MATTERS**: Stores behind a reverse proxy are mounted under a sub-path.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` dropping the last path segment.
#[tokio::test]
async fn given_base_url_with_prefix_when_fetching_then_prefix_kept() {
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/tracker/api/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = AggregationClient::new(&format!("{}/tracker", server.uri())).unwrap();

    let expenses = client.fetch_list(CategoryFilter::All).await.expect("list");

    assert!(expenses.is_empty());
    assert_eq!(client.base_url().path(), "/tracker/");
}

/// **VALUE**: Verifies the health probe reads healthy, unhealthy and unreachable correctly.
///
/// **WHY THIS MATTERS**: The CLI uses it to tell "store down" apart from "store erroring".
///
/// **BUG THIS CATCHES**: Would catch any 2xx being read as healthy regardless of body.
#[tokio::test]
async fn given_health_endpoint_when_checked_then_reports_status() {
    let healthy = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "service": "expense-tracker"})),
        )
        .mount(&healthy)
        .await;
    let degraded = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "degraded"})))
        .mount(&degraded)
        .await;
    let gone = start_store().await;
    let gone_uri = gone.uri();
    drop(gone);

    assert!(client_for(&healthy).check_health().await);
    assert!(!client_for(&degraded).check_health().await);
    assert!(!AggregationClient::new(&gone_uri).unwrap().check_health().await);
}
