use crate::new_expense::MAX_DESCRIPTION_CHARS;
use crate::{Category, ModelError, Money, NewExpenseBuilder};

use chrono::{Local, NaiveDate};

fn lunch() -> NewExpenseBuilder {
    NewExpenseBuilder::default()
        .with_amount(Money::from_cents(1250))
        .with_description("Lunch")
        .with_category(Category::Food)
        .with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
}

fn validation_message(result: Result<crate::NewExpense, ModelError>) -> String {
    match result {
        Err(ModelError::Validation { message, .. }) => message,
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies a complete builder produces the expected payload.
///
/// **BUG THIS CATCHES**: Would catch a field being dropped between builder and payload.
#[test]
fn given_complete_builder_when_built_then_returns_payload() {
    let expense = lunch().build().unwrap();

    assert_eq!(expense.amount(), Money::from_cents(1250));
    assert_eq!(expense.description(), "Lunch");
    assert_eq!(expense.category(), Category::Food);
    assert_eq!(expense.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

/// **VALUE**: Verifies the request body matches the remote store's create contract.
///
/// **WHY THIS MATTERS**: The store reads `amount`, `description`, `category`, `date`.
///
/// **BUG THIS CATCHES**: Would catch a renamed field or a date serialised with time.
#[test]
fn given_payload_when_serialised_then_matches_create_contract() {
    let json = serde_json::to_value(lunch().build().unwrap()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "amount": 12.5,
            "description": "Lunch",
            "category": "Food",
            "date": "2024-03-01"
        })
    );
}

/// **VALUE**: Verifies amounts below one cent are rejected.
///
/// **WHY THIS MATTERS**: The store rejects non-positive amounts; catching it locally keeps
/// the create intent from ever reaching the network.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one on the minimum.
#[test]
fn given_zero_amount_when_built_then_returns_validation_error() {
    let result = lunch().with_amount(Money::ZERO).build();

    assert_eq!(validation_message(result), "Amount must be at least 0.01");
    assert!(lunch().with_amount(Money::MIN_EXPENSE).build().is_ok());
}

/// **VALUE**: Verifies descriptions are trimmed and must not be blank.
///
/// **BUG THIS CATCHES**: Would catch whitespace-only descriptions passing validation.
#[test]
fn given_blank_description_when_built_then_returns_validation_error() {
    let result = lunch().with_description("   ").build();
    assert_eq!(validation_message(result), "Description is required");

    let trimmed = lunch().with_description("  Lunch  ").build().unwrap();
    assert_eq!(trimmed.description(), "Lunch");
}

/// **VALUE**: Verifies the description length cap.
///
/// **BUG THIS CATCHES**: Would catch byte-length counting or a missing cap.
#[test]
fn given_overlong_description_when_built_then_returns_validation_error() {
    let at_limit = "é".repeat(MAX_DESCRIPTION_CHARS);
    assert!(lunch().with_description(at_limit).build().is_ok());

    let over = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
    let result = lunch().with_description(over).build();
    assert!(validation_message(result).contains("at most 200"));
}

/// **VALUE**: Verifies required fields are enforced.
///
/// **BUG THIS CATCHES**: Would catch a missing category defaulting silently.
#[test]
fn given_missing_fields_when_built_then_returns_validation_errors() {
    let no_amount = NewExpenseBuilder::default()
        .with_description("Lunch")
        .with_category(Category::Food)
        .build();
    assert_eq!(validation_message(no_amount), "Amount is required");

    let no_category = NewExpenseBuilder::default()
        .with_amount(Money::from_cents(100))
        .with_description("Lunch")
        .build();
    assert_eq!(validation_message(no_category), "Category is required");
}

/// **VALUE**: Verifies a missing date defaults to today.
///
/// **BUG THIS CATCHES**: Would catch the builder rejecting date-less input.
#[test]
fn given_no_date_when_built_then_defaults_to_today() {
    let expense = NewExpenseBuilder::default()
        .with_amount(Money::from_cents(100))
        .with_description("Coffee")
        .with_category(Category::Food)
        .build()
        .unwrap();

    let today = Local::now().date_naive();
    let delta = (expense.date() - today).num_days().abs();
    assert!(delta <= 1, "Date should be today (allowing for midnight rollover)");
}
