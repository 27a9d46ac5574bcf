//! Dashboard HTTP handlers.
//!
//! Thin JSON endpoints over the aggregation pipeline. Parameter
//! validation happens here, before any store access; everything past
//! that point is fail-open and always returns a well-formed payload.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    dashboard::core::{CategorySummary, TypeFilter, WeeklySeries, category_summary, weekly_series},
    timezone::get_local_offset,
};

/// The state needed by the dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection holding the transaction store.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the weekly series endpoint.
#[derive(Debug, Deserialize)]
pub struct WeeklySeriesQuery {
    /// The user whose transactions to aggregate.
    pub user_id: Option<String>,
    /// Optional `income`/`expense` filter; absent means all types.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Query parameters for the category summary endpoint.
#[derive(Debug, Deserialize)]
pub struct CategorySummaryQuery {
    /// The user whose expenses to summarize.
    pub user_id: Option<String>,
}

/// Serve the trailing-week day-of-week series for a user.
///
/// # Errors
/// Returns [Error::MissingParameter] if `user_id` is absent and
/// [Error::UnknownTransactionType] for an unrecognized `type` value,
/// both checked before the store is touched. Store failures do not
/// error: they produce a zeroed series with `stale` set.
pub async fn get_weekly_series(
    State(state): State<DashboardState>,
    Query(query): Query<WeeklySeriesQuery>,
) -> Result<Json<WeeklySeries>, Error> {
    let user_id = query.user_id.ok_or(Error::MissingParameter("user_id"))?;
    let filter = TypeFilter::parse(query.transaction_type.as_deref())?;

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    Ok(Json(weekly_series(
        &user_id,
        filter,
        OffsetDateTime::now_utc(),
        local_offset,
        &connection,
    )))
}

/// Serve the trailing-week per-category expense summary for a user.
///
/// # Errors
/// Returns [Error::MissingParameter] if `user_id` is absent, checked
/// before the store is touched. Store failures produce an empty
/// mapping with `stale` set.
pub async fn get_category_summary(
    State(state): State<DashboardState>,
    Query(query): Query<CategorySummaryQuery>,
) -> Result<Json<CategorySummary>, Error> {
    let user_id = query.user_id.ok_or(Error::MissingParameter("user_id"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLock)?;

    Ok(Json(category_summary(
        &user_id,
        OffsetDateTime::now_utc(),
        &connection,
    )))
}
