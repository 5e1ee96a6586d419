//! A minimal personal finance ledger.
//!
//! This library provides a JSON REST API for recording credit and debit
//! transactions and reading them back as a list, by ID, or as a summed total.
//! Data can either be shared by every caller or partitioned by an opaque
//! session cookie, see [Tenancy].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod db;
pub mod endpoints;
mod logging;
mod not_found;
mod routing;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, Tenancy};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_REQUEST_BODY_LENGTH, logging_middleware};
pub use routing::build_router;
pub use session::{SESSION_COOKIE, SESSION_COOKIE_DURATION, SessionId};
pub use transaction::{
    CreateTransactionBody, SQLiteTransactionStore, Summary, SummaryResponse, Transaction,
    TransactionBuilder, TransactionId, TransactionResponse, TransactionStore, TransactionType,
    TransactionsResponse, ValidationError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
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
    /// The request parameters or body did not have the expected shape.
    ///
    /// Validation happens before the database is touched, so no data has
    /// been read or written when this error is returned.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session cookie is missing from the cookie jar in the request.
    ///
    /// Only returned when the server runs with [Tenancy::Session].
    #[error("the session cookie is missing")]
    SessionMissing,

    /// An unhandled/unexpected SQL error.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients only see a generic internal server error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The sum of the stored amounts does not fit in an `f64`.
    #[error("the sum of the transaction amounts is not a finite number: {0}")]
    NonFiniteTotal(f64),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// A machine readable error kind, e.g. "validation_error".
    pub error: String,
    /// A human readable description of what went wrong.
    pub message: String,
}

impl ErrorBody {
    pub(crate) fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_owned(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new("validation_error", error.to_string())),
            )
                .into_response(),
            Error::SessionMissing => StatusCode::UNAUTHORIZED.into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(
                        "internal_error",
                        "An unexpected error occurred, check the server logs for more details.",
                    )),
                )
                    .into_response()
            }
        }
    }
}
