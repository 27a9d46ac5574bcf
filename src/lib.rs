//! Spendsight is the HTTP backend for a personal-finance dashboard.
//!
//! It serves chart-ready JSON: trailing-week income/expense series
//! bucketed by day of week, and per-category expense summaries. The
//! aggregation pipeline is deliberately fail-open so that a store
//! outage degrades to an empty chart instead of an error page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod dashboard;
mod db;
mod endpoints;
mod logging;
mod routing;
mod state;
mod timestamp;
mod timezone;
mod transaction;

pub use dashboard::{CategorySummary, TypeFilter, WeeklySeries};
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use state::AppState;
pub use transaction::{NewTransaction, Transaction, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller omitted a required request parameter.
    ///
    /// Handlers must surface this before any store access is
    /// attempted.
    #[error("missing {0} parameter")]
    MissingParameter(&'static str),

    /// The caller supplied a transaction type that is neither
    /// `income` nor `expense`.
    #[error("unknown transaction type \"{0}\"")]
    UnknownTransactionType(String),

    /// The amount string could not be parsed as a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The transaction store could not be queried.
    ///
    /// The aggregation pipeline absorbs this error and degrades to a
    /// zeroed series or an empty mapping with the `stale` flag set,
    /// so it should never reach an HTTP response from a dashboard
    /// handler.
    #[error("the transaction store could not be reached")]
    UpstreamUnavailable,

    /// A retrieved row has a non-numeric amount or an unparsable
    /// timestamp. The offending row is skipped and aggregation
    /// continues with the remaining rows.
    #[error("malformed transaction row: {0}")]
    MalformedRow(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),

    /// The configured server timezone is not a canonical timezone
    /// name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {error}");
        Error::Sql(error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::MissingParameter(_)
            | Error::UnknownTransactionType(_)
            | Error::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn missing_parameter_maps_to_bad_request() {
        let response = Error::MissingParameter("user_id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_type_maps_to_bad_request() {
        let response = Error::UnknownTransactionType("transfer".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lock_error_maps_to_internal_server_error() {
        let response = Error::DatabaseLock.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
