//! Defines the endpoint for getting a single transaction by its ID.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::TransactionState,
    session::resolve_scope,
    transaction::{Transaction, TransactionStore, validation::parse_transaction_id_param},
};

/// The response body for [get_transaction_endpoint].
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransactionResponse {
    /// The requested transaction, or `null` if it does not exist for the caller.
    pub transaction: Option<Transaction>,
}

/// A route handler for getting a transaction by its ID.
///
/// A missing transaction is not an error: the response is 200 OK with a
/// `null` transaction. Transactions created by other sessions are treated
/// as missing.
///
/// The path parameter is taken as a `Result` so that the session cookie is
/// checked before the ID is, even when the path cannot be decoded.
pub async fn get_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    jar: CookieJar,
    transaction_id: Result<Path<String>, PathRejection>,
) -> Result<Json<TransactionResponse>, Error>
where
    S: TransactionStore + Clone + Send + Sync,
{
    let session_id = resolve_scope(state.tenancy, &jar)?;
    let transaction_id = parse_transaction_id_param(transaction_id)?;

    let transaction = state
        .transaction_store
        .get(transaction_id, session_id.as_ref())?;

    Ok(Json(TransactionResponse { transaction }))
}
