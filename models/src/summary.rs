use crate::{Category, Expense, Money};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate totals for one filter scope, as computed by the remote store.
///
/// `totals_by_category` only has keys for categories with at least one expense;
/// a missing key reads as zero through [`Summary::total_for`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub overall_total: Money,
    #[serde(default)]
    pub totals_by_category: BTreeMap<Category, Money>,
    pub count: u64,
}

impl Summary {
    /// Aggregates a slice of expenses the same way the remote store does.
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut summary = Summary::default();
        for expense in expenses {
            *summary
                .totals_by_category
                .entry(expense.category)
                .or_insert(Money::ZERO) += expense.amount;
            summary.overall_total += expense.amount;
            summary.count += 1;
        }
        summary
    }

    pub fn total_for(&self, category: Category) -> Money {
        self.totals_by_category
            .get(&category)
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Sum of the per-category totals, or `None` if it overflows.
    pub fn categories_total(&self) -> Option<Money> {
        self.totals_by_category
            .values()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(*amount))
    }

    /// `overall_total` equals the sum of the per-category totals.
    ///
    /// A sum that overflows never matches.
    pub fn is_consistent(&self) -> bool {
        self.categories_total() == Some(self.overall_total)
    }
}
