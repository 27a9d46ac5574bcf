//! The weekly aggregation pipeline.
//!
//! Each operation is a stateless read-and-transform over the
//! transaction store for a single user and a trailing-7-day window
//! anchored on "now". Store failures are absorbed: the caller always
//! gets a well-formed payload, with the `stale` flag set when the
//! data could not be fetched.

use rusqlite::Connection;
use serde::Serialize;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    dashboard::{
        aggregation::{DAY_LABELS, sum_absolute_by_weekday, sum_by_category},
        transaction::get_transactions_in_window,
    },
};

/// Number of days in the trailing reporting window.
const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Selects which transaction types contribute to a weekly series.
///
/// The income series, the expense series, and the generic weekly
/// totals chart all share one bucketing path parameterized by this
/// filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// Aggregate across all transaction types.
    All,
    /// Income transactions only.
    Income,
    /// Expense transactions only.
    Expense,
}

impl TypeFilter {
    /// Parse an optional `type` query parameter. An absent parameter
    /// aggregates across all types.
    ///
    /// # Errors
    /// Returns [Error::UnknownTransactionType] for any value other
    /// than `income` or `expense`.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        match raw {
            None => Ok(TypeFilter::All),
            Some("income") => Ok(TypeFilter::Income),
            Some("expense") => Ok(TypeFilter::Expense),
            Some(other) => Err(Error::UnknownTransactionType(other.to_owned())),
        }
    }

    /// The stored `kind` value to filter on, or `None` for all types.
    pub(super) fn as_kind(self) -> Option<&'static str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Income => Some("income"),
            TypeFilter::Expense => Some("expense"),
        }
    }
}

/// A chart-ready day-of-week series for the trailing week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySeries {
    /// The seven weekday labels, always `SUN..SAT`.
    pub labels: [&'static str; 7],
    /// One total per weekday, zero for days with no transactions.
    pub values: [f64; 7],
    /// True when the store could not be reached and the values are a
    /// zeroed placeholder rather than real (possibly empty) data.
    pub stale: bool,
}

/// A chart-ready per-category expense summary for the trailing week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Category labels, sorted, one per distinct category observed.
    pub labels: Vec<String>,
    /// The summed expense amount for each label.
    pub values: Vec<f64>,
    /// True when the store could not be reached and the mapping is an
    /// empty placeholder rather than real data.
    pub stale: bool,
}

/// The trailing reporting window ending at `now`, both ends inclusive.
fn reporting_window(now: OffsetDateTime) -> std::ops::RangeInclusive<OffsetDateTime> {
    (now - Duration::days(WEEKLY_WINDOW_DAYS))..=now
}

/// Build the day-of-week series for `user_id` over the trailing week.
///
/// Sums the absolute value of amounts so the income and expense
/// charts both plot positive magnitudes. A store failure degrades to
/// an all-zero series with `stale` set; it is never surfaced to the
/// caller.
pub(super) fn weekly_series(
    user_id: &str,
    filter: TypeFilter,
    now: OffsetDateTime,
    local_offset: UtcOffset,
    connection: &Connection,
) -> WeeklySeries {
    let window = reporting_window(now);

    match get_transactions_in_window(user_id, &window, filter, connection) {
        Ok(transactions) => WeeklySeries {
            labels: DAY_LABELS,
            values: sum_absolute_by_weekday(&transactions, local_offset),
            stale: false,
        },
        Err(error) => {
            tracing::error!("serving zeroed weekly series for {filter:?}: {error}");
            WeeklySeries {
                labels: DAY_LABELS,
                values: [0.0; 7],
                stale: true,
            }
        }
    }
}

/// Build the per-category expense summary for `user_id` over the
/// trailing week.
///
/// Only expense transactions contribute. A store failure degrades to
/// an empty mapping with `stale` set.
pub(super) fn category_summary(
    user_id: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> CategorySummary {
    let window = reporting_window(now);

    match get_transactions_in_window(user_id, &window, TypeFilter::Expense, connection) {
        Ok(transactions) => {
            let (labels, values) = sum_by_category(&transactions);
            CategorySummary {
                labels,
                values,
                stale: false,
            }
        }
        Err(error) => {
            tracing::error!("serving empty category summary: {error}");
            CategorySummary {
                labels: Vec::new(),
                values: Vec::new(),
                stale: true,
            }
        }
    }
}
