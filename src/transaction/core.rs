//! Defines the core data models and table schema for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::session::SessionId;

// ============================================================================
// MODELS
// ============================================================================

/// The unique ID of a transaction.
///
/// IDs are random UUIDs, stored as lowercase hyphenated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Mint a new, random transaction ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl ToSql for TransactionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TransactionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Uuid::parse_str(text)
            .map(TransactionId)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, stored as a positive amount.
    Credit,
    /// Money going out, stored as a negative amount.
    Debit,
}

impl TransactionType {
    /// Apply the sign convention to an unsigned `magnitude`.
    ///
    /// Credits are positive and debits are negative. Zero is always stored as
    /// positive zero.
    pub fn signed_amount(self, magnitude: f64) -> f64 {
        match self {
            _ if magnitude == 0.0 => 0.0,
            TransactionType::Credit => magnitude,
            TransactionType::Debit => -magnitude,
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text label for what the transaction was for.
    pub title: String,
    /// The amount of money earned (positive) or spent (negative).
    pub amount: f64,
    /// The session that created the transaction, `None` when sessions are not used.
    pub session_id: Option<SessionId>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction with a fresh ID and a creation time of now.
    ///
    /// `amount` is the already signed amount, see [TransactionType::signed_amount].
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            id: TransactionId::generate(),
            title: title.to_owned(),
            amount,
            session_id: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds the full record, ID included, so that the store only
/// has to persist it.
///
/// # Examples
///
/// ```ignore
/// use crate::transaction::{Transaction, TransactionType};
///
/// let rent = Transaction::build("Rent", TransactionType::Debit.signed_amount(1200.0))
///     .session_id(Some(SessionId::generate()));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID the transaction will be stored under.
    pub id: TransactionId,

    /// A human-readable label for the transaction, e.g. "Salary".
    pub title: String,

    /// The signed monetary amount of the transaction.
    ///
    /// Positive values represent income/credits, negative values represent
    /// expenses/debits.
    pub amount: f64,

    /// The session that owns the transaction.
    ///
    /// - `Some(id)` - the server runs in session mode
    /// - `None` - the server runs in single-tenant mode
    pub session_id: Option<SessionId>,

    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the owning session for the transaction.
    pub fn session_id(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Set the creation time for the transaction.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                session_id TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Every read in session mode filters on the session.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_session_id ON transactions(session_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns in the order: id, title, amount, session_id, created_at.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let session_id = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        amount,
        session_id,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
