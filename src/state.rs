//! Implements a struct that holds the state of the HTTP server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the HTTP server.
///
/// The database connection is shared behind a mutex: each handler
/// acquires the lock for the duration of a single operation and
/// releases it when the operation returns, so no request holds the
/// connection across await points.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Transaction timestamps are stored in UTC; this timezone decides
    /// which local calendar day a transaction falls on when it is
    /// bucketed into the weekly series.
    pub local_timezone: String,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the
    /// transaction table. `local_timezone` should be a valid,
    /// canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
