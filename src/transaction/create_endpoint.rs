//! The HTTP endpoint for submitting a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    transaction::core::{NewTransaction, Transaction, create_transaction},
};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection holding the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a new transaction from a JSON request body.
///
/// # Errors
/// Returns a 400 for a missing required field, a non-numeric amount,
/// or an unknown transaction kind, and a 500 if the insert fails.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    let transaction = create_transaction(new_transaction, OffsetDateTime::now_utc(), &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
