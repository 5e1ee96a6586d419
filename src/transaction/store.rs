//! Defines the transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};

use crate::{
    Error,
    session::SessionId,
    transaction::{Transaction, TransactionBuilder, TransactionId, core::map_transaction_row},
};

/// Handles the creation and retrieval of transactions.
///
/// Every read takes a `session`. `None` reads across all transactions,
/// `Some` only sees the transactions created by that session.
pub trait TransactionStore {
    /// Insert a new transaction into the store.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns `Ok(None)` if there is no transaction with `id` visible to `session`.
    fn get(
        &self,
        id: TransactionId,
        session: Option<&SessionId>,
    ) -> Result<Option<Transaction>, Error>;

    /// Retrieve all transactions visible to `session` in the order they were created.
    fn list(&self, session: Option<&SessionId>) -> Result<Vec<Transaction>, Error>;

    /// The sum of the amounts of all transactions visible to `session`.
    ///
    /// Returns zero if there are no transactions.
    ///
    /// # Errors
    /// Returns [Error::NonFiniteTotal] if the sum overflows.
    fn sum_amount(&self, session: Option<&SessionId>) -> Result<f64, Error>;
}

/// Stores transactions in a SQLite database.
///
/// The transactions table must have been created with [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert a new transaction into the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is some SQL
    /// error, e.g. a constraint violation.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(
                "INSERT INTO transactions (id, title, amount, session_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, title, amount, session_id, created_at",
            )?
            .query_row(
                (
                    builder.id,
                    builder.title,
                    builder.amount,
                    builder.session_id,
                    builder.created_at,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn get(
        &self,
        id: TransactionId,
        session: Option<&SessionId>,
    ) -> Result<Option<Transaction>, Error> {
        let connection = self.lock()?;

        let transaction = match session {
            Some(session_id) => connection
                .prepare(
                    "SELECT id, title, amount, session_id, created_at FROM transactions
                     WHERE id = :id AND session_id = :session_id",
                )?
                .query_row(
                    rusqlite::named_params! { ":id": id, ":session_id": session_id },
                    map_transaction_row,
                )
                .optional()?,
            None => connection
                .prepare(
                    "SELECT id, title, amount, session_id, created_at FROM transactions
                     WHERE id = :id",
                )?
                .query_row(
                    rusqlite::named_params! { ":id": id },
                    map_transaction_row,
                )
                .optional()?,
        };

        Ok(transaction)
    }

    fn list(&self, session: Option<&SessionId>) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        let transactions = match session {
            Some(session_id) => connection
                .prepare(
                    "SELECT id, title, amount, session_id, created_at FROM transactions
                     WHERE session_id = :session_id
                     ORDER BY created_at ASC, rowid ASC",
                )?
                .query_map(
                    rusqlite::named_params! { ":session_id": session_id },
                    map_transaction_row,
                )?
                .collect::<Result<Vec<_>, _>>()?,
            None => connection
                .prepare(
                    "SELECT id, title, amount, session_id, created_at FROM transactions
                     ORDER BY created_at ASC, rowid ASC",
                )?
                .query_map([], map_transaction_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(transactions)
    }

    fn sum_amount(&self, session: Option<&SessionId>) -> Result<f64, Error> {
        let connection = self.lock()?;

        // SUM over zero rows is NULL in SQL.
        let total: f64 = match session {
            Some(session_id) => connection.query_row(
                "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE session_id = :session_id",
                rusqlite::named_params! { ":session_id": session_id },
                |row| row.get(0),
            )?,
            None => connection.query_row(
                "SELECT COALESCE(SUM(amount), 0.0) FROM transactions",
                [],
                |row| row.get(0),
            )?,
        };

        if !total.is_finite() {
            tracing::error!("sum of transaction amounts is not finite: {total}");
            return Err(Error::NonFiniteTotal(total));
        }

        Ok(total)
    }
}
