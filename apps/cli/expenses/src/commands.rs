use crate::cli::Command;
use crate::error::AppError;
use crate::render::{View, render_snapshot};

use expense_core::{AggregationClient, ClientError, ExpenseApi, SyncCoordinator};
use models::{CategoryFilter, NewExpenseBuilder};

use log::{debug, info, warn};

/// Text to print and whether the command ended cleanly.
///
/// `success` is false when the banner is set after the command, even if the
/// intent itself completed (e.g. a create whose follow-up list fetch failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub output: String,
    pub success: bool,
}

/// Runs one command against the store and renders what it left in the cache.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] when an expense fails validation; nothing
/// is sent in that case. Remote failures are reported through the banner.
pub async fn execute(
    coordinator: &SyncCoordinator<AggregationClient>,
    command: Command,
) -> Result<CommandReport, AppError> {
    debug!("Executing {command:?}");

    match command {
        Command::Show(args) => Ok(show(coordinator, args.category, View::Full).await),
        Command::List(args) => Ok(show(coordinator, args.category, View::List).await),
        Command::Summary(args) => Ok(show(coordinator, args.category, View::Summary).await),
        Command::Add {
            amount,
            description,
            category,
            date,
        } => {
            let mut builder = NewExpenseBuilder::default()
                .with_amount(amount)
                .with_description(description)
                .with_category(category);
            if let Some(date) = date {
                builder = builder.with_date(date);
            }
            let expense = builder.build()?;

            let mut report = match coordinator.create_expense(&expense).await {
                Ok(created) => {
                    info!("Added expense {}", created.id);
                    CommandReport {
                        output: format!(
                            "Added expense #{}: ${} {} ({})\n\n",
                            created.id, created.amount, created.description, created.category
                        ),
                        success: true,
                    }
                }
                Err(e) => {
                    log_failure("Adding the expense", &e);
                    CommandReport {
                        output: String::new(),
                        success: false,
                    }
                }
            };
            append_view(coordinator, &mut report, View::Full);
            Ok(report)
        }
        Command::Delete { id } => {
            let mut report = match coordinator.delete_expense(id).await {
                Ok(()) => CommandReport {
                    output: format!("Deleted expense #{id}\n\n"),
                    success: true,
                },
                Err(e) => {
                    log_failure(&format!("Deleting expense #{id}"), &e);
                    CommandReport {
                        output: String::new(),
                        success: false,
                    }
                }
            };
            append_view(coordinator, &mut report, View::Full);
            Ok(report)
        }
        Command::Health => Ok(health(coordinator.client()).await),
    }
}

async fn show<C: ExpenseApi>(
    coordinator: &SyncCoordinator<C>,
    filter: CategoryFilter,
    view: View,
) -> CommandReport {
    coordinator.select(filter).await;

    let mut report = CommandReport {
        output: String::new(),
        success: true,
    };
    append_view(coordinator, &mut report, view);
    report
}

fn append_view<C: ExpenseApi>(coordinator: &SyncCoordinator<C>, report: &mut CommandReport, view: View) {
    let snapshot = coordinator.store().snapshot();
    if snapshot.banner.is_some() {
        report.success = false;
    }
    report.output.push_str(&render_snapshot(&snapshot, view));
}

/// The banner already tells the user something failed; this says whether
/// running the command again is worth it.
fn log_failure(action: &str, error: &ClientError) {
    if error.is_not_found() {
        warn!("{action} failed: the expense no longer exists on the store");
    } else if error.is_retryable() {
        warn!(
            "{action} failed, the store may be temporarily unavailable: {}",
            error.message()
        );
    } else {
        warn!("{action} failed: {}", error.message());
    }
}

async fn health(client: &AggregationClient) -> CommandReport {
    let healthy = client.check_health().await;
    let output = if healthy {
        format!("Expense store at {} is healthy\n", client.base_url())
    } else {
        format!("Expense store at {} is not reachable\n", client.base_url())
    };

    CommandReport {
        output,
        success: healthy,
    }
}
