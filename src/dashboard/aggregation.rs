//! Expense aggregation for the category totals chart.

use std::collections::HashMap;

use crate::expense::Expense;

/// Sums expense amounts per category.
///
/// Categories appear in the order they are first seen in `expenses`, which is
/// insertion order for the expense listing. Category names are compared as
/// literal strings, so rows with categories outside the fixed set are grouped
/// under whatever string they carry.
///
/// # Returns
/// A tuple of (category labels, corresponding totals), both empty when
/// `expenses` is empty.
pub(super) fn aggregate_by_category(expenses: &[Expense]) -> (Vec<String>, Vec<f64>) {
    let mut labels = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for expense in expenses {
        if !totals.contains_key(expense.category.as_str()) {
            labels.push(expense.category.clone());
        }
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let values = labels.iter().map(|label| totals[label.as_str()]).collect();

    (labels, values)
}
