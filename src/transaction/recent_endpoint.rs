//! The HTTP endpoint for the recent-activity feed.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error,
    transaction::{
        core::{Transaction, get_recent_transactions},
        create_endpoint::TransactionState,
    },
};

/// Query parameters for the recent transactions endpoint.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// The user whose transactions to list.
    pub user_id: Option<String>,
}

/// Serve the most recent transactions for a user, newest first.
///
/// Unlike the dashboard aggregations this endpoint is not fail-open:
/// the activity feed has no meaningful zeroed fallback, so a store
/// failure surfaces as a 500.
///
/// # Errors
/// Returns [Error::MissingParameter] if `user_id` is absent and
/// [Error::Sql] if the query fails.
pub async fn recent_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let user_id = query.user_id.ok_or(Error::MissingParameter("user_id"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    Ok(Json(get_recent_transactions(&user_id, &connection)?))
}
