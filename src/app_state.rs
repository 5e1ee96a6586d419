//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    db::initialize,
    session::SESSION_COOKIE_DURATION,
    transaction::{SQLiteTransactionStore, TransactionStore},
};

/// Controls whether transactions are shared by every caller or partitioned by session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tenancy {
    /// Every caller sees every transaction and no cookies are used.
    SingleTenant,
    /// Transactions belong to the session named in the session cookie.
    ///
    /// Reads without a session cookie are rejected, and the first create
    /// without a cookie mints a new session.
    #[default]
    Session,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: TransactionStore + Clone + Send + Sync,
{
    /// The store for managing [transactions](crate::Transaction).
    pub transaction_store: S,

    /// Whether transactions are partitioned by session.
    pub tenancy: Tenancy,

    /// How long a session cookie is valid for after the last create.
    pub session_duration: Duration,
}

impl AppState<SQLiteTransactionStore> {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the transactions table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, tenancy: Tenancy) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self::with_store(
            SQLiteTransactionStore::new(connection),
            tenancy,
        ))
    }
}

impl<S> AppState<S>
where
    S: TransactionStore + Clone + Send + Sync,
{
    /// Create a new [AppState] around an existing `transaction_store`.
    pub fn with_store(transaction_store: S, tenancy: Tenancy) -> Self {
        Self {
            transaction_store,
            tenancy,
            session_duration: SESSION_COOKIE_DURATION,
        }
    }
}

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState<S>
where
    S: TransactionStore + Clone + Send + Sync,
{
    /// The store for managing [transactions](crate::Transaction).
    pub transaction_store: S,
    /// Whether transactions are partitioned by session.
    pub tenancy: Tenancy,
    /// How long a session cookie is valid for after the last create.
    pub session_duration: Duration,
}

impl<S> FromRef<AppState<S>> for TransactionState<S>
where
    S: TransactionStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            tenancy: state.tenancy,
            session_duration: state.session_duration,
        }
    }
}
