//! Core logic for creating and listing transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, timestamp::format_utc_timestamp};

/// How many rows the recent-activity feed shows.
const RECENT_TRANSACTION_COUNT: u32 = 3;

/// A transaction as stored, with the amount kept as the raw submitted
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The row ID.
    pub id: i64,
    /// The owning user.
    pub user_id: String,
    /// Free-text reason for the transaction.
    pub title: String,
    /// The amount as submitted by the client.
    pub amount: String,
    /// Either `income` or `expense`.
    pub kind: String,
    /// Free-text category label, if any.
    pub category: Option<String>,
    /// The display date as entered by the user.
    pub date: String,
    /// RFC 3339 UTC creation timestamp, used for window filtering.
    pub created_at: String,
}

/// The client-submitted fields for a new transaction.
///
/// Every field is optional at the wire level so that a missing field
/// produces a 400 naming the field, not a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    /// The owning user. Required.
    pub user_id: Option<String>,
    /// Free-text reason for the transaction. Required.
    pub title: Option<String>,
    /// The amount; must parse as a finite number. Required.
    pub amount: Option<String>,
    /// Either `income` or `expense`. Required.
    pub kind: Option<String>,
    /// Free-text category label.
    pub category: Option<String>,
    /// The display date; defaults to the date of `now`.
    pub date: Option<String>,
}

/// Validate and insert a new transaction.
///
/// The amount is validated but stored as submitted, preserving the
/// client's formatting. The creation timestamp is always `now` in
/// UTC at whole-second precision, matching the precision of the
/// dashboard's window bounds.
///
/// # Errors
/// Returns [Error::MissingParameter] for an absent required field,
/// [Error::InvalidAmount] if the amount is not a finite number,
/// [Error::UnknownTransactionType] for a kind other than
/// `income`/`expense`, and [Error::Sql] on insert failure.
pub fn create_transaction(
    new_transaction: NewTransaction,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let user_id = new_transaction
        .user_id
        .ok_or(Error::MissingParameter("user_id"))?;
    let title = new_transaction.title.ok_or(Error::MissingParameter("title"))?;
    let amount = new_transaction
        .amount
        .ok_or(Error::MissingParameter("amount"))?;
    let kind = new_transaction.kind.ok_or(Error::MissingParameter("kind"))?;

    let parsed_amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(amount.clone()))?;
    if !parsed_amount.is_finite() {
        return Err(Error::InvalidAmount(amount));
    }

    if kind != "income" && kind != "expense" {
        return Err(Error::UnknownTransactionType(kind));
    }

    let created_at = format_utc_timestamp(now);
    let date = new_transaction
        .date
        .unwrap_or_else(|| now.date().to_string());

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, title, amount, kind, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, title, amount, kind, category, date, created_at",
        )?
        .query_row(
            (
                user_id,
                title,
                amount,
                kind,
                new_transaction.category,
                date,
                created_at,
            ),
            map_row,
        )?;

    Ok(transaction)
}

/// Retrieve the most recent transactions for a user, newest first.
///
/// # Errors
/// Returns [Error::Sql] if the query fails.
pub fn get_recent_transactions(
    user_id: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, kind, category, date, created_at
            FROM \"transaction\"
            WHERE user_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2",
        )?
        .query_map((user_id, RECENT_TRANSACTION_COUNT), map_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{Error, db::initialize};

    use super::{NewTransaction, create_transaction, get_recent_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn build_test_transaction(amount: &str) -> NewTransaction {
        NewTransaction {
            user_id: Some("user_1".to_owned()),
            title: Some("Groceries".to_owned()),
            amount: Some(amount.to_owned()),
            kind: Some("expense".to_owned()),
            category: Some("food".to_owned()),
            date: None,
        }
    }

    #[test]
    fn create_transaction_succeeds() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        let transaction = create_transaction(build_test_transaction("42.50"), now, &conn).unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, "42.50");
        assert_eq!(transaction.created_at, "2024-06-08T12:00:00Z");
        assert_eq!(transaction.date, "2024-06-08");
    }

    #[test]
    fn create_transaction_stores_whole_second_timestamps() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00.75 UTC);

        let transaction = create_transaction(build_test_transaction("10"), now, &conn).unwrap();

        assert_eq!(transaction.created_at, "2024-06-08T12:00:00Z");
    }

    #[test]
    fn create_transaction_requires_user_id() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        let new_transaction = NewTransaction {
            user_id: None,
            ..build_test_transaction("10")
        };
        let result = create_transaction(new_transaction, now, &conn);

        assert_eq!(result.unwrap_err(), Error::MissingParameter("user_id"));
    }

    #[test]
    fn create_transaction_rejects_non_numeric_amount() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        let result = create_transaction(build_test_transaction("ten dollars"), now, &conn);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidAmount("ten dollars".to_owned())
        );
    }

    #[test]
    fn create_transaction_rejects_unknown_kind() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        let new_transaction = NewTransaction {
            kind: Some("transfer".to_owned()),
            ..build_test_transaction("10")
        };
        let result = create_transaction(new_transaction, now, &conn);

        assert_eq!(
            result.unwrap_err(),
            Error::UnknownTransactionType("transfer".to_owned())
        );
    }

    #[test]
    fn recent_transactions_returns_newest_first_capped_at_three() {
        let conn = get_test_connection();

        for hour in 8..12 {
            let now = datetime!(2024-06-08 00:00:00 UTC) + time::Duration::hours(hour);
            let new_transaction = NewTransaction {
                title: Some(format!("purchase {hour}")),
                ..build_test_transaction("5")
            };
            create_transaction(new_transaction, now, &conn).unwrap();
        }

        let recent = get_recent_transactions("user_1", &conn).unwrap();

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].title, "purchase 11");
        assert_eq!(recent[2].title, "purchase 9");
    }

    #[test]
    fn recent_transactions_only_returns_own_rows() {
        let conn = get_test_connection();
        let now = datetime!(2024-06-08 12:00:00 UTC);

        create_transaction(build_test_transaction("5"), now, &conn).unwrap();
        let other_user = NewTransaction {
            user_id: Some("user_2".to_owned()),
            ..build_test_transaction("9")
        };
        create_transaction(other_user, now, &conn).unwrap();

        let recent = get_recent_transactions("user_1", &conn).unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].user_id, "user_1");
    }
}
