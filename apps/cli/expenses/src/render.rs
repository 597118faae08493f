//! Plain-text rendering of store snapshots.

use expense_core::StoreSnapshot;
use models::{CategoryFilter, Expense, Summary};

pub const NO_EXPENSES_MESSAGE: &str = "No expenses yet.";
pub const NO_SUMMARY_MESSAGE: &str = "Summary unavailable.";

/// Which parts of the snapshot a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Full,
    List,
    Summary,
}

impl View {
    fn shows_list(self) -> bool {
        matches!(self, View::Full | View::List)
    }

    fn shows_summary(self) -> bool {
        matches!(self, View::Full | View::Summary)
    }
}

/// Renders a fixed-width table, one expense per line, in the given order.
pub fn render_expenses(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return format!("{NO_EXPENSES_MESSAGE}\n");
    }

    let mut out = format!(
        "{:>6}  {:<10}  {:<13}  {:>10}  DESCRIPTION\n",
        "ID", "DATE", "CATEGORY", "AMOUNT"
    );
    for expense in expenses {
        out.push_str(&format!(
            "{:>6}  {:<10}  {:<13}  {:>10}  {}\n",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.category,
            format!("${}", expense.amount),
            expense.description
        ));
    }
    out
}

/// Renders totals. A category scope shows that category's total and count; the
/// unfiltered scope adds the per-category breakdown.
pub fn render_summary(summary: &Summary, scope: CategoryFilter) -> String {
    let mut lines = Vec::new();

    match scope.category() {
        Some(category) => {
            lines.push(format!("{category} Total: ${}", summary.total_for(category)));
            lines.push(format!("Expenses Count: {}", summary.count));
        }
        None => {
            lines.push(format!("Total Expenses: ${}", summary.overall_total));
            lines.push(format!("Total Count: {}", summary.count));
            if !summary.totals_by_category.is_empty() {
                lines.push(String::from("By Category:"));
                for (category, total) in &summary.totals_by_category {
                    lines.push(format!("  {:<13} ${total}", format!("{category}:")));
                }
            }
        }
    }

    lines.iter().map(|line| format!("{line}\n")).collect()
}

pub fn render_banner(banner: &str) -> String {
    format!("Error: {banner}\n")
}

/// Renders the parts of `snapshot` selected by `view`, banner last.
///
/// Sections whose data was never loaded are skipped; a missing summary in a
/// summary view prints a short notice instead.
pub fn render_snapshot(snapshot: &StoreSnapshot, view: View) -> String {
    let mut sections = Vec::new();

    if view.shows_list() && snapshot.expenses_scope.is_some() {
        sections.push(render_expenses(&snapshot.expenses));
    }

    if view.shows_summary() {
        match (&snapshot.summary, snapshot.summary_scope) {
            (Some(summary), Some(scope)) => sections.push(render_summary(summary, scope)),
            _ if view == View::Summary => sections.push(format!("{NO_SUMMARY_MESSAGE}\n")),
            _ => {}
        }
    }

    if let Some(banner) = &snapshot.banner {
        sections.push(render_banner(banner));
    }

    sections.join("\n")
}
