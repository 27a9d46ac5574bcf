//! Transaction data aggregation and transformation for charts.
//!
//! Provides functions to bucket transaction amounts into day-of-week
//! slots and to sum expenses by category. All functions are pure:
//! retrieval and the fail-open policy live in the pipeline layer.

use std::collections::HashMap;

use time::UtcOffset;

use crate::dashboard::transaction::Transaction;

/// The seven weekday labels in fixed calendar order starting Sunday.
///
/// Every weekly series uses this order, zero-filled, regardless of
/// which days actually saw transactions.
pub(super) const DAY_LABELS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Sums the absolute value of transaction amounts into seven
/// day-of-week buckets.
///
/// The weekday of each transaction is taken from its creation time
/// converted to `local_offset`, so a late-night UTC timestamp lands
/// on the user's local calendar day.
///
/// # Returns
/// Exactly seven totals in `SUN..SAT` order; days with no matching
/// transactions are zero.
pub(super) fn sum_absolute_by_weekday(
    transactions: &[Transaction],
    local_offset: UtcOffset,
) -> [f64; 7] {
    let mut totals = [0.0; 7];

    for transaction in transactions {
        let weekday = transaction.created_at.to_offset(local_offset).weekday();
        totals[weekday.number_days_from_sunday() as usize] += transaction.amount.abs();
    }

    totals
}

/// Sums expense amounts per category.
///
/// Amounts are summed as stored, not as absolute values: expense
/// amounts are assumed non-negative at the point of entry. A negative
/// amount is still included in the sum but logged, since it indicates
/// the upstream assumption was violated.
///
/// # Returns
/// Parallel label and value vectors with one entry per distinct
/// category observed, sorted by label so repeated calls over the same
/// data produce identical output. Categories with no transactions are
/// omitted entirely.
pub(super) fn sum_by_category(transactions: &[Transaction]) -> (Vec<String>, Vec<f64>) {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.amount < 0.0 {
            tracing::warn!(
                "negative expense amount {} in category \"{}\"",
                transaction.amount,
                transaction.category
            );
        }

        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
    }

    let mut labels: Vec<&str> = totals.keys().copied().collect();
    labels.sort_unstable();

    let values = labels.iter().map(|label| totals[label]).collect();
    let labels = labels.into_iter().map(str::to_owned).collect();

    (labels, values)
}
