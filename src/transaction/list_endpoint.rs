//! Defines the endpoint for listing transactions.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::TransactionState,
    session::resolve_scope,
    transaction::{Transaction, TransactionStore},
};

/// The response body for [list_transactions_endpoint].
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionsResponse {
    /// The transactions visible to the caller, oldest first.
    pub transactions: Vec<Transaction>,
}

/// A route handler for listing all of the caller's transactions.
///
/// In session mode the request is rejected before touching the database if
/// the session cookie is missing.
pub async fn list_transactions_endpoint<S>(
    State(state): State<TransactionState<S>>,
    jar: CookieJar,
) -> Result<Json<TransactionsResponse>, Error>
where
    S: TransactionStore + Clone + Send + Sync,
{
    let session_id = resolve_scope(state.tenancy, &jar)?;

    let transactions = state.transaction_store.list(session_id.as_ref())?;

    Ok(Json(TransactionsResponse { transactions }))
}
