//! Database queries for retrieving dashboard transaction data.
//!
//! This module provides a simplified transaction view optimized for
//! the weekly aggregations, containing only the fields needed for
//! charting (amount, category, creation time). Rows with a
//! non-numeric amount or an unparsable timestamp are skipped with a
//! warning rather than failing the whole query.

use std::ops::RangeInclusive;

use rusqlite::{Connection, params_from_iter};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, dashboard::core::TypeFilter, timestamp::format_utc_timestamp};

pub(super) const UNCATEGORIZED_LABEL: &str = "Other";

/// A simplified transaction view for dashboard aggregations.
///
/// This is separate from the main transaction model because the
/// dashboard only needs amount, category, and creation time, and
/// wants them parsed rather than as the raw stored text.
#[derive(Debug)]
pub(super) struct Transaction {
    pub amount: f64,
    pub category: String,
    pub created_at: OffsetDateTime,
}

/// Gets transactions for a user whose creation time falls within
/// `window` (both endpoints inclusive), optionally filtered to a
/// single transaction type.
///
/// Timestamps are stored as whole-second RFC 3339 UTC strings, so the
/// window filter is a plain string comparison in SQL; the bounds are
/// formatted at the same precision. Rows that fail to parse afterwards
/// are logged and dropped.
///
/// # Errors
/// Returns [Error::UpstreamUnavailable] if the store query fails for
/// any reason. Callers are expected to absorb this and degrade to
/// empty output.
pub(super) fn get_transactions_in_window(
    user_id: &str,
    window: &RangeInclusive<OffsetDateTime>,
    filter: TypeFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let base_query = format!(
        "SELECT
            amount,
            COALESCE(category, '{UNCATEGORIZED_LABEL}') AS category,
            created_at
        FROM \"transaction\"
        WHERE user_id = ?1 AND created_at BETWEEN ?2 AND ?3"
    );

    let mut params = vec![
        user_id.to_owned(),
        format_utc_timestamp(*window.start()),
        format_utc_timestamp(*window.end()),
    ];

    let query = match filter.as_kind() {
        Some(kind) => {
            params.push(kind.to_owned());
            format!("{base_query} AND kind = ?4")
        }
        None => base_query,
    };

    let mut stmt = connection
        .prepare(&query)
        .map_err(store_unavailable)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(store_unavailable)?;

    let mut transactions = Vec::new();

    for row in rows {
        let (amount, category, created_at) = row.map_err(store_unavailable)?;

        match parse_row(&amount, category, &created_at) {
            Ok(transaction) => transactions.push(transaction),
            Err(error) => tracing::warn!("{error}"),
        }
    }

    Ok(transactions)
}

fn store_unavailable(error: rusqlite::Error) -> Error {
    tracing::error!("transaction store query failed: {error}");
    Error::UpstreamUnavailable
}

/// Parse the raw stored text fields of a row into the dashboard view.
///
/// # Errors
/// Returns [Error::MalformedRow] if the amount is not a finite number
/// or the timestamp is not valid RFC 3339.
fn parse_row(amount: &str, category: String, created_at: &str) -> Result<Transaction, Error> {
    let parsed_amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| Error::MalformedRow(format!("non-numeric amount \"{amount}\"")))?;

    if !parsed_amount.is_finite() {
        return Err(Error::MalformedRow(format!(
            "non-finite amount \"{amount}\""
        )));
    }

    let timestamp = OffsetDateTime::parse(created_at, &Rfc3339)
        .map_err(|_| Error::MalformedRow(format!("unparsable timestamp \"{created_at}\"")))?;

    Ok(Transaction {
        amount: parsed_amount,
        category,
        created_at: timestamp,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        Error, dashboard::core::TypeFilter, db::initialize, timestamp::format_utc_timestamp,
    };

    use super::get_transactions_in_window;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_row(
        conn: &Connection,
        user_id: &str,
        amount: &str,
        kind: &str,
        category: Option<&str>,
        created_at: &str,
    ) {
        conn.execute(
            "INSERT INTO \"transaction\" (user_id, title, amount, kind, category, date, created_at)
            VALUES (?1, 'test', ?2, ?3, ?4, '2024-06-01', ?5)",
            (user_id, amount, kind, category, created_at),
        )
        .unwrap();
    }

    #[test]
    fn returns_rows_within_window() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "50", "expense", Some("food"), "2024-06-05T09:00:00Z");
        insert_row(&conn, "user_1", "20", "income", None, "2024-06-07T18:30:00Z");

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions.len(), 2);
    }

    #[test]
    fn excludes_other_users() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "50", "expense", None, "2024-06-05T09:00:00Z");
        insert_row(&conn, "user_2", "75", "expense", None, "2024-06-05T09:00:00Z");

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 50.0);
    }

    #[test]
    fn filters_by_transaction_type() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "50", "expense", None, "2024-06-05T09:00:00Z");
        insert_row(&conn, "user_1", "100", "income", None, "2024-06-05T10:00:00Z");

        let window = (now - Duration::days(7))..=now;
        let expenses =
            get_transactions_in_window("user_1", &window, TypeFilter::Expense, &conn).unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 50.0);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);
        let start = now - Duration::days(7);

        insert_row(&conn, "user_1", "1", "expense", None, &format_utc_timestamp(start));
        insert_row(&conn, "user_1", "2", "expense", None, &format_utc_timestamp(now));
        // One second before the window opens.
        insert_row(
            &conn,
            "user_1",
            "4",
            "expense",
            None,
            &format_utc_timestamp(start - Duration::seconds(1)),
        );

        let window = start..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        let total: f64 = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(total, 3.0, "expected only the boundary rows at the window edges");
    }

    #[test]
    fn window_bounds_ignore_sub_second_precision() {
        let conn = get_test_connection();
        // A fractional "now" formats after a whole-second timestamp in
        // the same second under string comparison, so an unnormalized
        // upper bound would drop the newest row.
        let now = datetime!(2024-06-08 12:00:00.75 UTC);

        insert_row(&conn, "user_1", "2", "expense", None, &format_utc_timestamp(now));

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
    }

    #[test]
    fn skips_rows_with_malformed_amounts() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "fifty", "expense", None, "2024-06-05T09:00:00Z");
        insert_row(&conn, "user_1", "NaN", "expense", None, "2024-06-05T09:30:00Z");
        insert_row(&conn, "user_1", "25.5", "expense", None, "2024-06-05T10:00:00Z");

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 25.5);
    }

    #[test]
    fn skips_rows_with_malformed_timestamps() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "10", "expense", None, "2024-06-05T09");
        insert_row(&conn, "user_1", "20", "expense", None, "2024-06-05T10:00:00Z");

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 20.0);
    }

    #[test]
    fn labels_uncategorized_rows_as_other() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        insert_row(&conn, "user_1", "10", "expense", None, "2024-06-05T09:00:00Z");

        let window = (now - Duration::days(7))..=now;
        let transactions =
            get_transactions_in_window("user_1", &window, TypeFilter::All, &conn).unwrap();

        assert_eq!(transactions[0].category, "Other");
    }

    #[test]
    fn reports_store_unavailable_when_table_is_missing() {
        // No call to initialize, so the table does not exist.
        let conn = Connection::open_in_memory().unwrap();
        let now = OffsetDateTime::now_utc();

        let window = (now - Duration::days(7))..=now;
        let result = get_transactions_in_window("user_1", &window, TypeFilter::All, &conn);

        assert_eq!(result.unwrap_err(), Error::UpstreamUnavailable);
    }
}
