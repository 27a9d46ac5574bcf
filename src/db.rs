//! Schema creation for the application's SQLite database.

use rusqlite::Connection;

use crate::Error;

/// Create the transaction table and its indices if they do not exist.
///
/// Amounts and timestamps are stored as text: the upstream mobile
/// client submits amounts as strings, and keeping the raw value means
/// a bad record shows up as a skipped row in the aggregation pipeline
/// instead of an insert failure.
///
/// # Errors
/// Returns [Error::Sql] if the schema statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            amount TEXT NOT NULL,
            kind TEXT NOT NULL,
            category TEXT,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
            )",
        (),
    )?;

    // The dashboard only ever filters by user and creation time.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS transaction_user_created_at
            ON \"transaction\" (user_id, created_at)",
        (),
    )?;

    Ok(())
}
