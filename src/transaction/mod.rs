//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The `TransactionStore` trait and its SQLite implementation
//! - Validation of route inputs
//! - The route handlers for listing, getting, summing and creating transactions

mod core;
mod create_endpoint;
mod get_endpoint;
mod list_endpoint;
mod store;
mod summary_endpoint;
mod validation;

pub use self::core::{
    Transaction, TransactionBuilder, TransactionId, TransactionType, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use get_endpoint::{TransactionResponse, get_transaction_endpoint};
pub use list_endpoint::{TransactionsResponse, list_transactions_endpoint};
pub use store::{SQLiteTransactionStore, TransactionStore};
pub use summary_endpoint::{Summary, SummaryResponse, get_summary_endpoint};
pub use validation::{CreateTransactionBody, ValidationError};
