use expenses::app::run;
use expenses::cli::Cli;
use expenses::error::AppError;

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(server_uri: &str, config_dir: &TempDir, args: &[&str]) -> Cli {
    let dir = config_dir.path().to_string_lossy().into_owned();
    let mut argv = vec!["expenses", "--api-url", server_uri, "--config-dir", dir.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid test arguments")
}

async fn mount_all(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "amount": 3.0, "description": "Bus ticket", "category": "Transport", "date": "2024-03-18"},
            {"id": 1, "amount": 45.0, "description": "Groceries", "category": "Food", "date": "2024-03-10"},
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "overall_total": 48.0,
            "totals_by_category": {"Food": 45.0, "Transport": 3.0},
            "count": 2,
        })))
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the default command renders list and totals and exits cleanly.
///
/// **WHY THIS MATTERS**: `expenses` with no arguments is the everyday entry point.
///
/// **BUG THIS CATCHES**: Would catch a missing default command or an unrendered summary.
#[tokio::test]
async fn given_running_store_when_no_command_then_full_view() {
    // GIVEN: A store with two expenses
    let server = MockServer::start().await;
    mount_all(&server).await;
    let dir = TempDir::new().unwrap();

    // WHEN: Running with no subcommand
    let report = run(cli(&server.uri(), &dir, &[])).await.expect("run");

    // THEN: Both rows and the totals are printed, exit is success
    assert!(report.success);
    assert!(report.output.contains("Bus ticket"));
    assert!(report.output.contains("Groceries"));
    assert!(report.output.contains("Total Expenses: $48.00"));
    assert!(report.output.contains("Total Count: 2"));
}

/// **VALUE**: Verifies `summary --category Food` sends the filter and prints the category total.
///
/// **WHY THIS MATTERS**: The category flag must reach both remote calls.
///
/// **BUG THIS CATCHES**: Would catch the CLI filter not reaching the coordinator.
#[tokio::test]
async fn given_category_flag_when_summary_then_filtered_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .and(query_param("category", "Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "amount": 45.0, "description": "Groceries", "category": "Food", "date": "2024-03-10"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .and(query_param("category", "Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "overall_total": 45.0,
            "totals_by_category": {"Food": 45.0},
            "count": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let report = run(cli(&server.uri(), &dir, &["summary", "--category", "Food"]))
        .await
        .expect("run");

    assert!(report.success);
    assert!(report.output.contains("Food Total: $45.00"));
    assert!(report.output.contains("Expenses Count: 1"));
    assert!(!report.output.contains("Groceries"), "summary view has no rows");
}

/// **VALUE**: Verifies a stopped store renders the list banner and exits non-zero.
///
/// **WHY THIS MATTERS**: Scripts rely on the exit status to notice the backend is down.
///
/// **BUG THIS CATCHES**: Would catch a zero exit with an error banner on screen.
#[tokio::test]
async fn given_stopped_store_when_list_then_banner_and_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    let dir = TempDir::new().unwrap();

    let report = run(cli(&uri, &dir, &["list"])).await.expect("run");

    assert!(!report.success);
    assert!(
        report
            .output
            .contains("Error: Failed to load expenses. Please check if the backend is running.")
    );
}

/// **VALUE**: Verifies `add` posts, refreshes and shows the new expense.
///
/// **WHY THIS MATTERS**: The confirmation and the refreshed view are how the user knows it
/// worked.
///
/// **BUG THIS CATCHES**: Would catch the follow-up refresh not running after a create.
#[tokio::test]
async fn given_valid_expense_when_add_then_confirmation_and_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "amount": 12.5, "description": "Lunch", "category": "Food", "date": "2024-03-20",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "amount": 12.5, "description": "Lunch", "category": "Food", "date": "2024-03-20"},
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expenses/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "overall_total": 12.5, "totals_by_category": {"Food": 12.5}, "count": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let report = run(cli(
        &server.uri(),
        &dir,
        &["add", "-a", "12.50", "-d", "Lunch", "-c", "Food", "--date", "2024-03-20"],
    ))
    .await
    .expect("run");

    assert!(report.success);
    assert!(report.output.starts_with("Added expense #3: $12.50 Lunch (Food)"));
    assert!(report.output.contains("Total Expenses: $12.50"));
}

/// **VALUE**: Verifies an invalid description is rejected locally with no request sent.
///
/// **WHY THIS MATTERS**: Validation mirrors the store so bad input never costs a round trip.
///
/// **BUG THIS CATCHES**: Would catch whitespace-only descriptions reaching the network.
#[tokio::test]
async fn given_blank_description_when_add_then_invalid_input_and_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let result = run(cli(&server.uri(), &dir, &["add", "-a", "5", "-d", "   ", "-c", "Other"])).await;

    let err = result.expect_err("blank description rejected");
    assert!(matches!(err, AppError::InvalidInput { .. }));
    assert_eq!(err.message(), "Description is required");
}

/// **VALUE**: Verifies deleting an unknown id renders the delete banner and fails.
///
/// **WHY THIS MATTERS**: A second delete of the same id must be visible to the user.
///
/// **BUG THIS CATCHES**: Would catch 404 being reported as "Deleted".
#[tokio::test]
async fn given_unknown_id_when_delete_then_banner_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/expenses/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Expense not found"})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let report = run(cli(&server.uri(), &dir, &["delete", "42"])).await.expect("run");

    assert!(!report.success);
    assert!(!report.output.contains("Deleted"));
    assert!(report.output.contains("Error: Failed to delete expense. Please try again."));
}

/// **VALUE**: Verifies `health` reports a healthy store with a zero exit.
///
/// **WHY THIS MATTERS**: Used as a readiness probe in scripts.
///
/// **BUG THIS CATCHES**: Would catch the health command ignoring the response body.
#[tokio::test]
async fn given_healthy_store_when_health_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "service": "expense-tracker"})),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let report = run(cli(&server.uri(), &dir, &["health"])).await.expect("run");

    assert!(report.success);
    assert!(report.output.contains("is healthy"));
}
