use crate::error::client::ClientError;
use crate::store::{Completion, Operation, RequestStatus};
use crate::sync::{
    CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, Intent, IntentOutcome, LIST_FAILED_MESSAGE,
    SyncCoordinator,
};
use crate::tests::support::{FakeRemote, GatedRemote, date, new_expense, seed};

use models::{Category, CategoryFilter, ExpenseId, Money, Summary};

fn coordinator() -> SyncCoordinator<FakeRemote> {
    SyncCoordinator::new(FakeRemote::seeded(seed()))
}

/// **VALUE**: Verifies the initial load fills list and summary for "All", newest first.
///
/// **WHY THIS MATTERS**: This is the first thing the user sees after startup.
///
/// **BUG THIS CATCHES**: Would catch a missing summary fetch or reordering of the store's
/// list on the client.
#[tokio::test]
async fn given_seeded_store_when_initial_load_then_list_and_summary_populated() {
    // GIVEN: A remote with four expenses
    let coordinator = coordinator();

    // WHEN: Loading for the first time
    let outcome = coordinator.initial_load().await;

    // THEN: Both halves applied, list in store order (date desc, then id desc)
    assert!(outcome.is_applied());
    let snapshot = coordinator.store().snapshot();
    let ids: Vec<i64> = snapshot.expenses.iter().map(|e| e.id.value()).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
    let summary = snapshot.summary.expect("summary loaded");
    assert_eq!(summary.count, 4);
    assert_eq!(summary.overall_total, Money::from_cents(14600));
    assert_eq!(snapshot.expenses_scope, Some(CategoryFilter::All));
    assert_eq!(snapshot.list_status, RequestStatus::Succeeded);
    assert!(snapshot.banner.is_none());
}

/// **VALUE**: Verifies the unfiltered summary agrees with the unfiltered list.
///
/// **WHY THIS MATTERS**: The count and total shown above the table must describe the table.
///
/// **BUG THIS CATCHES**: Would catch list and summary being fetched for different scopes.
#[tokio::test]
async fn given_all_filter_when_settled_then_summary_matches_list() {
    let coordinator = coordinator();

    coordinator.initial_load().await;

    let snapshot = coordinator.store().snapshot();
    let summary = snapshot.summary.expect("summary loaded");
    let listed: Money = snapshot.expenses.iter().map(|e| e.amount).sum();
    assert_eq!(summary.count as usize, snapshot.expenses.len());
    assert_eq!(summary.overall_total, listed);
    assert!(summary.is_consistent());
}

/// **VALUE**: Verifies an unfiltered summary whose totals disagree is still shown as sent.
///
/// **WHY THIS MATTERS**: The store is authoritative; a mismatch is worth a warning in the
/// log, not a rejected or corrected response.
///
/// **BUG THIS CATCHES**: Would catch the consistency check dropping the summary, patching
/// the overall total, or panicking when the category totals overflow.
#[tokio::test]
async fn given_inconsistent_summary_when_loaded_then_applied_unchanged() {
    // GIVEN: A remote whose summaries do not add up, one of them overflowing
    let coordinator = coordinator();
    let drifting: Summary = serde_json::from_str(
        r#"{"overall_total": 100.0, "totals_by_category": {"Food": 45.0, "Bills": 80.0}, "count": 4}"#,
    )
    .unwrap();
    let overflowing: Summary = serde_json::from_str(
        r#"{"overall_total": 9.0e16, "totals_by_category": {"Food": 6.0e16, "Bills": 6.0e16}, "count": 2}"#,
    )
    .unwrap();
    assert!(!drifting.is_consistent());
    coordinator.client().answer_summaries_with(drifting.clone());

    // WHEN: Loading unfiltered
    let outcome = coordinator.initial_load().await;

    // THEN: The summary is stored exactly as received, with no banner
    assert!(outcome.is_applied());
    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.summary, Some(drifting));
    assert_eq!(snapshot.summary_status, RequestStatus::Succeeded);
    assert!(snapshot.banner.is_none());

    // WHEN: The next refresh brings totals whose sum overflows
    coordinator.client().answer_summaries_with(overflowing.clone());
    coordinator.refresh().await;

    // THEN: It is applied as well
    assert_eq!(coordinator.store().snapshot().summary, Some(overflowing));
}

/// **VALUE**: Verifies selecting a category scopes both the list and the summary.
///
/// **WHY THIS MATTERS**: The summary panel must describe the filtered view, not the whole store.
///
/// **BUG THIS CATCHES**: Would catch the summary request omitting the category parameter.
#[tokio::test]
async fn given_food_selected_when_settled_then_only_food_shown() {
    let coordinator = coordinator();
    coordinator.initial_load().await;

    let outcome = coordinator.select(Category::Food).await;

    assert!(outcome.is_applied());
    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.expenses.iter().all(|e| e.category == Category::Food));
    assert_eq!(snapshot.expenses.len(), 2);
    let summary = snapshot.summary.expect("summary loaded");
    assert_eq!(summary.overall_total, Money::from_cents(5400));
    assert_eq!(summary.count, 2);
    assert_eq!(snapshot.summary_scope, Some(CategoryFilter::Only(Category::Food)));
}

/// **VALUE**: Verifies an empty category yields an empty list and a zero summary, not an error.
///
/// **WHY THIS MATTERS**: Empty views are normal; showing the error banner for them would
/// train users to ignore it.
///
/// **BUG THIS CATCHES**: Would catch treating an empty result as a failure.
#[tokio::test]
async fn given_no_transport_expenses_when_transport_selected_then_empty_and_zero() {
    let coordinator = coordinator();

    coordinator.select(Category::Transport).await;

    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.expenses.is_empty());
    let summary = snapshot.summary.expect("summary loaded");
    assert_eq!(summary.overall_total, Money::ZERO);
    assert_eq!(summary.count, 0);
    assert!(summary.totals_by_category.is_empty());
    assert!(snapshot.banner.is_none());
}

/// **VALUE**: Verifies a create shows up in both list and summary after the follow-up refresh.
///
/// **WHY THIS MATTERS**: Adding "Lunch 12.50 Food" is the most common user action.
///
/// **BUG THIS CATCHES**: Would catch a missing post-create refresh, which leaves the new
/// expense invisible until the next manual reload.
#[tokio::test]
async fn given_loaded_view_when_lunch_created_then_list_and_summary_include_it() {
    // GIVEN: A loaded "All" view
    let coordinator = coordinator();
    coordinator.initial_load().await;
    let before = coordinator.store().summary().expect("summary loaded");

    // WHEN: Creating a 12.50 Food expense
    let created = coordinator
        .create_expense(&new_expense(1250, "Lunch", Category::Food))
        .await
        .expect("create succeeds");

    // THEN: The server-assigned record is listed and totals moved by exactly 12.50
    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.expenses.contains(&created));
    assert_eq!(snapshot.expenses[0], created, "newest date sorts first");
    let after = snapshot.summary.expect("summary loaded");
    assert_eq!(after.count, before.count + 1);
    assert_eq!(
        after.total_for(Category::Food),
        before.total_for(Category::Food) + Money::from_cents(1250)
    );
    assert_eq!(after.overall_total, before.overall_total + Money::from_cents(1250));
    assert_eq!(snapshot.create_status, RequestStatus::Succeeded);
}

/// **VALUE**: Verifies creating under a different filter leaves the filtered view correct.
///
/// **WHY THIS MATTERS**: The refresh after a create reloads the active filter, not "All".
///
/// **BUG THIS CATCHES**: Would catch an optimistic insert that shows a Bills expense under Food.
#[tokio::test]
async fn given_food_filter_when_bills_expense_created_then_not_listed() {
    let coordinator = coordinator();
    coordinator.select(Category::Food).await;

    coordinator
        .create_expense(&new_expense(6000, "Water bill", Category::Bills))
        .await
        .expect("create succeeds");

    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.expenses.len(), 2);
    assert!(snapshot.expenses.iter().all(|e| e.category == Category::Food));
    assert_eq!(coordinator.client().stored(), 5);
}

/// **VALUE**: Verifies a failed create changes nothing but the banner and create status.
///
/// **WHY THIS MATTERS**: The user's view must stay trustworthy after an error.
///
/// **BUG THIS CATCHES**: Would catch an optimistic insert, or a refresh that runs anyway.
#[tokio::test]
async fn given_remote_rejects_create_when_created_then_state_unchanged_and_banner_set() {
    let coordinator = coordinator();
    coordinator.initial_load().await;
    let before = coordinator.store().snapshot();
    let list_calls = coordinator.client().list_calls();
    coordinator.client().fail(Operation::Create);

    let result = coordinator
        .create_expense(&new_expense(1250, "Lunch", Category::Food))
        .await;

    assert!(matches!(result, Err(ClientError::Http { .. })));
    let after = coordinator.store().snapshot();
    assert_eq!(after.expenses, before.expenses);
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.banner.as_deref(), Some(CREATE_FAILED_MESSAGE));
    assert!(after.create_status.is_failed());
    assert_eq!(coordinator.client().list_calls(), list_calls, "no refresh after failure");
}

/// **VALUE**: Verifies delete removes the record and a second delete of the same id fails.
///
/// **WHY THIS MATTERS**: A double click on "delete" must not pretend the second one worked.
///
/// **BUG THIS CATCHES**: Would catch treating 404 as success, or clearing the list on failure.
#[tokio::test]
async fn given_expense_when_deleted_twice_then_second_fails_not_found() {
    // GIVEN: A loaded view that contains expense 3
    let coordinator = coordinator();
    coordinator.initial_load().await;
    let id = ExpenseId::new(3);

    // WHEN: Deleting it once
    coordinator.delete_expense(id).await.expect("first delete succeeds");

    // THEN: It is gone and totals dropped
    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.expenses.iter().all(|e| e.id != id));
    assert_eq!(snapshot.summary.as_ref().map(|s| s.count), Some(3));
    assert!(snapshot.banner.is_none());

    // WHEN: Deleting it again
    let second = coordinator.delete_expense(id).await;

    // THEN: NotFound, banner raised, cached list untouched
    let error = second.expect_err("second delete fails");
    assert!(error.is_not_found());
    let after = coordinator.store().snapshot();
    assert_eq!(after.banner.as_deref(), Some(DELETE_FAILED_MESSAGE));
    assert_eq!(after.expenses, snapshot.expenses);
    assert!(after.delete_status.is_failed());
}

/// **VALUE**: Verifies a list outage raises the banner, keeps cached rows, and a manual
/// refresh clears it once the store is back.
///
/// **WHY THIS MATTERS**: There are no automatic retries; refresh is the recovery path.
///
/// **BUG THIS CATCHES**: Would catch a banner that sticks after recovery or rows that vanish.
#[tokio::test]
async fn given_list_outage_when_refreshed_after_recovery_then_banner_cleared() {
    let coordinator = coordinator();
    coordinator.initial_load().await;
    coordinator.client().fail(Operation::ListFetch);

    let failed = coordinator.refresh().await;

    assert_eq!(failed.list, Completion::Failed);
    assert_eq!(failed.summary, Completion::Applied);
    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.banner.as_deref(), Some(LIST_FAILED_MESSAGE));
    assert_eq!(snapshot.expenses.len(), 4);

    coordinator.client().recover(Operation::ListFetch);
    let recovered = coordinator.dispatch(Intent::Refresh).await.expect("refresh");

    assert!(matches!(recovered, IntentOutcome::Refreshed(outcome) if outcome.is_applied()));
    assert!(coordinator.store().banner().is_none());
}

/// **VALUE**: Verifies a summary outage is silent and keeps the previous totals.
///
/// **WHY THIS MATTERS**: The list is still usable; the banner is reserved for failures that
/// stop the user.
///
/// **BUG THIS CATCHES**: Would catch summary errors setting the banner or clearing the panel.
#[tokio::test]
async fn given_summary_outage_when_refreshed_then_no_banner_and_summary_kept() {
    let coordinator = coordinator();
    coordinator.initial_load().await;
    let previous = coordinator.store().summary();
    coordinator.client().fail(Operation::SummaryFetch);

    let outcome = coordinator.refresh().await;

    assert_eq!(outcome.list, Completion::Applied);
    assert_eq!(outcome.summary, Completion::Failed);
    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.banner.is_none());
    assert_eq!(snapshot.summary, previous);
    assert!(snapshot.summary_status.is_failed());
}

/// **VALUE**: Verifies rapid filter switching ends on the last selection when the stale
/// response arrives last.
///
/// **WHY THIS MATTERS**: A slow Food response landing after the user chose Transport would
/// otherwise show Food rows under the Transport heading.
///
/// **BUG THIS CATCHES**: Would catch a store that applies responses in arrival order.
#[tokio::test]
async fn given_food_then_transport_when_food_answers_last_then_transport_shown() {
    // GIVEN: A remote that holds every fetch until released
    let coordinator = SyncCoordinator::new(GatedRemote::seeded(seed()));
    let remote = coordinator.client();

    // WHEN: Food is selected, then Transport, and Food's answers arrive last
    let (food, transport, ()) = tokio::join!(
        coordinator.select(Category::Food),
        async {
            remote.wait_for_refreshes(1).await;
            coordinator.select(Category::Transport).await
        },
        async {
            remote.wait_for_refreshes(2).await;
            remote.release(1);
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            remote.release(0);
        }
    );

    // THEN: Transport applied, Food discarded, view shows Transport
    assert_eq!(food.list, Completion::Discarded);
    assert_eq!(food.summary, Completion::Discarded);
    assert!(transport.is_applied());
    let snapshot = coordinator.store().snapshot();
    assert_eq!(coordinator.filter().current(), CategoryFilter::Only(Category::Transport));
    assert!(snapshot.expenses.is_empty());
    assert_eq!(snapshot.expenses_scope, Some(CategoryFilter::Only(Category::Transport)));
    assert_eq!(snapshot.summary.map(|s| s.count), Some(0));
}

/// **VALUE**: Verifies the same race ends on the last selection when the answers arrive in
/// request order.
///
/// **WHY THIS MATTERS**: Completion order is arbitrary; the outcome must not depend on it.
///
/// **BUG THIS CATCHES**: Would catch a Food response being applied while Transport is active.
#[tokio::test]
async fn given_food_then_transport_when_answers_in_order_then_transport_shown() {
    let coordinator = SyncCoordinator::new(GatedRemote::seeded(seed()));
    let remote = coordinator.client();

    let (food, transport, ()) = tokio::join!(
        coordinator.select(Category::Food),
        async {
            remote.wait_for_refreshes(1).await;
            coordinator.select(Category::Transport).await
        },
        async {
            remote.wait_for_refreshes(2).await;
            remote.release(0);
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            remote.release(1);
        }
    );

    assert!(!food.is_applied());
    assert!(transport.is_applied());
    let snapshot = coordinator.store().snapshot();
    assert!(snapshot.expenses.is_empty());
    assert_eq!(snapshot.summary_scope, Some(CategoryFilter::Only(Category::Transport)));
}

/// **VALUE**: Verifies an older refresh of the same filter cannot overwrite a newer one.
///
/// **WHY THIS MATTERS**: The filter check alone cannot tell two "All" responses apart.
///
/// **BUG THIS CATCHES**: Would catch an expense added between two refreshes disappearing when
/// the earlier response lands last.
#[tokio::test]
async fn given_two_refreshes_of_same_filter_when_older_answers_last_then_newer_kept() {
    let coordinator = SyncCoordinator::new(GatedRemote::seeded(seed()));
    let remote = coordinator.client();

    let (older, newer, ()) = tokio::join!(
        coordinator.refresh(),
        async {
            remote.wait_for_refreshes(1).await;
            remote
                .inner()
                .insert(300, "Bus ticket", Category::Transport, date(2024, 3, 18));
            coordinator.refresh().await
        },
        async {
            remote.wait_for_refreshes(2).await;
            remote.release(1);
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            remote.release(0);
        }
    );

    assert!(newer.is_applied());
    assert_eq!(older.list, Completion::Discarded);
    assert_eq!(older.summary, Completion::Discarded);
    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.expenses.len(), 5);
    assert_eq!(snapshot.summary.map(|s| s.count), Some(5));
}

/// **VALUE**: Verifies `dispatch` routes every intent to its operation.
///
/// **WHY THIS MATTERS**: Front ends drive the coordinator through intents only.
///
/// **BUG THIS CATCHES**: Would catch FilterChanged not updating the active filter.
#[tokio::test]
async fn given_intents_when_dispatched_then_each_operation_runs() {
    let coordinator = coordinator();

    let loaded = coordinator.dispatch(Intent::InitialLoad).await.expect("initial load");
    assert!(matches!(loaded, IntentOutcome::Refreshed(outcome) if outcome.filter == CategoryFilter::All));

    coordinator
        .dispatch(Intent::FilterChanged(CategoryFilter::Only(Category::Bills)))
        .await
        .expect("filter change");
    assert_eq!(coordinator.filter().current(), CategoryFilter::Only(Category::Bills));
    assert_eq!(coordinator.store().expenses().len(), 1);

    let created = coordinator
        .dispatch(Intent::CreateExpense(new_expense(4200, "Phone", Category::Bills)))
        .await
        .expect("create");
    let IntentOutcome::Created(expense) = created else {
        panic!("expected Created outcome");
    };
    assert_eq!(coordinator.store().expenses().len(), 2);

    let deleted = coordinator
        .dispatch(Intent::DeleteExpense(expense.id))
        .await
        .expect("delete");
    assert!(matches!(deleted, IntentOutcome::Deleted(id) if id == expense.id));
    assert_eq!(coordinator.store().expenses().len(), 1);
}

/// **VALUE**: Verifies every selection triggers exactly one list and one summary fetch.
///
/// **WHY THIS MATTERS**: The summary must follow the filter; skipping it would leave totals
/// for the old scope on screen.
///
/// **BUG THIS CATCHES**: Would catch a selection that only reloads the list.
#[tokio::test]
async fn given_selection_when_made_then_one_fetch_of_each_kind() {
    let coordinator = coordinator();

    coordinator.select(Category::Entertainment).await;
    coordinator.select(CategoryFilter::All).await;

    assert_eq!(coordinator.client().list_calls(), 2);
    assert_eq!(coordinator.client().summary_calls(), 2);
}
