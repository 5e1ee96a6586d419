//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    Error, Tenancy,
    app_state::TransactionState,
    session::{session_or_generate, set_session_cookie},
    transaction::{
        Transaction, TransactionStore,
        validation::{CreateTransactionBody, parse_create_body},
    },
};

/// A route handler for creating a new transaction, responds with 201 Created and an empty body.
///
/// In session mode the transaction is stored under the session from the
/// session cookie, or a newly minted session if there is no cookie. Either
/// way the session cookie is set again so that its expiry is pushed back.
pub async fn create_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    jar: CookieJar,
    payload: Result<Json<CreateTransactionBody>, JsonRejection>,
) -> Result<Response, Error>
where
    S: TransactionStore + Clone + Send + Sync,
{
    let request = parse_create_body(payload)?;

    let session_id = match state.tenancy {
        Tenancy::SingleTenant => None,
        Tenancy::Session => Some(session_or_generate(&jar)),
    };

    let transaction = state.transaction_store.create(
        Transaction::build(&request.title, request.signed_amount).session_id(session_id.clone()),
    )?;
    tracing::debug!("Created transaction {}", transaction.id);

    let jar = match session_id {
        Some(session_id) => set_session_cookie(jar, &session_id, state.session_duration),
        None => jar,
    };

    Ok((StatusCode::CREATED, jar).into_response())
}
