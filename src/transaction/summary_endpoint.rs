//! Defines the endpoint for summing the amounts of transactions.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    Error, app_state::TransactionState, session::resolve_scope, transaction::TransactionStore,
};

/// The total of the caller's transactions.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// The sum of all signed amounts, zero when there are no transactions.
    pub amount: f64,
}

/// The response body for [get_summary_endpoint].
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SummaryResponse {
    /// The caller's totals.
    pub summary: Summary,
}

/// A route handler for the sum of the caller's transactions.
pub async fn get_summary_endpoint<S>(
    State(state): State<TransactionState<S>>,
    jar: CookieJar,
) -> Result<Json<SummaryResponse>, Error>
where
    S: TransactionStore + Clone + Send + Sync,
{
    let session_id = resolve_scope(state.tenancy, &jar)?;

    let amount = state.transaction_store.sum_amount(session_id.as_ref())?;

    Ok(Json(SummaryResponse {
        summary: Summary { amount },
    }))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State};
    use axum_extra::extract::CookieJar;

    use crate::{
        Error, Tenancy,
        test_utils::{SpyTransactionStore, jar_with_session, transaction_state},
        transaction::{Summary, SummaryResponse, get_summary_endpoint},
    };

    #[tokio::test]
    async fn rejects_missing_session_without_touching_store() {
        let store = SpyTransactionStore::default();
        let state = transaction_state(store.clone(), Tenancy::Session);

        let result = get_summary_endpoint(State(state), CookieJar::new()).await;

        assert_eq!(result.map(|_| ()), Err(Error::SessionMissing));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_session_sums_to_zero() {
        let store = SpyTransactionStore::default();
        let state = transaction_state(store.clone(), Tenancy::Session);

        let Json(response) = get_summary_endpoint(State(state), jar_with_session("abc"))
            .await
            .unwrap();

        assert_eq!(
            response,
            SummaryResponse {
                summary: Summary { amount: 0.0 }
            }
        );
        assert_eq!(store.calls(), vec!["sum_amount(Some(\"abc\"))".to_owned()]);
    }
}
