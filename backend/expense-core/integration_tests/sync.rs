use crate::helpers::{
    all_expenses_json, all_summary_json, client_for, food_expenses_json, food_summary_json,
    start_store,
};

use expense_core::sync::{CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, LIST_FAILED_MESSAGE};
use expense_core::{Completion, Operation, SyncCoordinator};
use models::{Category, CategoryFilter, ExpenseId, Money, NewExpenseBuilder};

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_all(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_expenses_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_summary_json()))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the coordinator drives a real HTTP client through an initial load and a
/// filter change.
///
/// **WHY THIS MATTERS**: This is the startup path end to end: config, client, store.
///
/// **BUG THIS CATCHES**: Would catch the selected filter not reaching the query string.
#[tokio::test]
async fn given_http_store_when_loaded_and_filtered_then_store_follows() {
    // GIVEN: A store answering both "All" and "Food"
    let server = start_store().await;
    mount_all(&server).await;
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
    let coordinator = SyncCoordinator::new(client_for(&server));

    // WHEN: Loading, then selecting Food
    let initial = coordinator.initial_load().await;
    let snapshot_all = coordinator.store().snapshot();
    let filtered = coordinator.select(Category::Food).await;

    // THEN: Each step applied with its own scope
    assert!(initial.is_applied());
    assert_eq!(snapshot_all.expenses.len(), 3);
    assert_eq!(
        snapshot_all.summary.map(|s| s.overall_total),
        Some(Money::from_cents(13700))
    );
    assert!(filtered.is_applied());
    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.expenses.len(), 1);
    assert_eq!(snapshot.summary_scope, Some(CategoryFilter::Only(Category::Food)));
    assert_eq!(
        snapshot.summary.map(|s| s.count),
        Some(1)
    );
}

/// **VALUE**: Verifies a stopped backend produces the list banner and an empty, non-crashing view.
///
/// **WHY THIS MATTERS**: The banner text tells the user what to check.
///
/// **BUG THIS CATCHES**: Would catch summary failures being the ones that set the banner.
#[tokio::test]
async fn given_backend_down_when_initial_load_then_list_banner() {
    let server = start_store().await;
    let uri = server.uri();
    drop(server);
    let client = expense_core::AggregationClient::new(&uri).unwrap();
    let coordinator = SyncCoordinator::new(client);

    let outcome = coordinator.initial_load().await;

    assert_eq!(outcome.list, Completion::Failed);
    assert_eq!(outcome.summary, Completion::Failed);
    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.banner.as_deref(), Some(LIST_FAILED_MESSAGE));
    assert!(snapshot.expenses.is_empty());
    assert!(snapshot.summary.is_none());
}

/// **VALUE**: Verifies a rejected create sets the banner and issues no follow-up fetch.
///
/// **WHY THIS MATTERS**: Refreshing after a failed write would hide that nothing changed.
///
/// **BUG THIS CATCHES**: Would catch the post-create refresh running on failure.
#[tokio::test]
async fn given_store_rejects_create_when_created_then_banner_and_no_refetch() {
    let server = start_store().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_expenses_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_summary_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "disk full"})))
        .expect(1)
        .mount(&server)
        .await;
    let coordinator = SyncCoordinator::new(client_for(&server));
    coordinator.initial_load().await;
    let before = coordinator.store().snapshot();
    let new = NewExpenseBuilder::default()
        .with_amount(Money::from_cents(1250))
        .with_description("Lunch")
        .with_category(Category::Food)
        .build()
        .unwrap();

    let result = coordinator.create_expense(&new).await;

    assert!(result.is_err());
    let after = coordinator.store().snapshot();
    assert_eq!(after.banner.as_deref(), Some(CREATE_FAILED_MESSAGE));
    assert_eq!(after.expenses, before.expenses);
    assert_eq!(after.summary, before.summary);
}

/// **VALUE**: Verifies delete refreshes on success and raises the banner on the repeat 404.
///
/// **WHY THIS MATTERS**: Two quick clicks on delete are a real user pattern.
///
/// **BUG THIS CATCHES**: Would catch the second delete passing silently.
#[tokio::test]
async fn given_delete_twice_when_over_http_then_second_raises_banner() {
    let server = start_store().await;
    mount_all(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Expense deleted successfully"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Expense not found"})))
        .mount(&server)
        .await;
    let coordinator = SyncCoordinator::new(client_for(&server));
    coordinator.initial_load().await;

    coordinator
        .delete_expense(ExpenseId::new(2))
        .await
        .expect("first delete");
    assert!(coordinator.store().banner().is_none());
    assert!(!coordinator.store().status(Operation::Delete).is_failed());

    let second = coordinator.delete_expense(ExpenseId::new(2)).await;

    assert!(second.expect_err("second delete").is_not_found());
    assert_eq!(
        coordinator.store().banner().as_deref(),
        Some(DELETE_FAILED_MESSAGE)
    );
}
