//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{get_category_summary, get_weekly_series},
    endpoints,
    logging::logging_middleware,
    transaction::{create_transaction_endpoint, recent_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::WEEKLY_SERIES, get(get_weekly_series))
        .route(endpoints::CATEGORY_SUMMARY, get(get_category_summary))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::RECENT_TRANSACTIONS,
            get(recent_transactions_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
