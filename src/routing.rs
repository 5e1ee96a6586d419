//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    transaction::{
        TransactionStore, create_transaction_endpoint, get_summary_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Whether the transaction routes require a session cookie is decided by
/// the [Tenancy](crate::Tenancy) in `state`.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint::<S>).post(create_transaction_endpoint::<S>),
        )
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint::<S>))
        .route(endpoints::TRANSACTION, get(get_transaction_endpoint::<S>))
        .fallback(get_404_not_found)
        .with_state(state)
}
