use std::sync::{Arc, Mutex};

use axum_extra::extract::{CookieJar, cookie::Cookie};

use crate::{
    Error, SESSION_COOKIE, SESSION_COOKIE_DURATION, Tenancy,
    app_state::TransactionState,
    session::SessionId,
    transaction::{Transaction, TransactionBuilder, TransactionId, TransactionStore},
};

/// A transaction store that records every call and keeps created transactions in memory.
///
/// Reads only see what was created through this store and ignore the session.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpyTransactionStore {
    calls: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<Vec<Transaction>>>,
}

impl SpyTransactionStore {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn created(&self) -> Vec<Transaction> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn scope(session: Option<&SessionId>) -> Option<&str> {
    session.map(SessionId::as_str)
}

impl TransactionStore for SpyTransactionStore {
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        self.record(format!("create({})", builder.id));

        let transaction = Transaction {
            id: builder.id,
            title: builder.title,
            amount: builder.amount,
            session_id: builder.session_id,
            created_at: builder.created_at,
        };
        self.created.lock().unwrap().push(transaction.clone());

        Ok(transaction)
    }

    fn get(
        &self,
        id: TransactionId,
        session: Option<&SessionId>,
    ) -> Result<Option<Transaction>, Error> {
        self.record(format!("get({id}, {:?})", scope(session)));

        Ok(self
            .created
            .lock()
            .unwrap()
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned())
    }

    fn list(&self, session: Option<&SessionId>) -> Result<Vec<Transaction>, Error> {
        self.record(format!("list({:?})", scope(session)));

        Ok(self.created())
    }

    fn sum_amount(&self, session: Option<&SessionId>) -> Result<f64, Error> {
        self.record(format!("sum_amount({:?})", scope(session)));

        Ok(self
            .created
            .lock()
            .unwrap()
            .iter()
            .map(|transaction| transaction.amount)
            .sum())
    }
}

pub(crate) fn transaction_state(
    store: SpyTransactionStore,
    tenancy: Tenancy,
) -> TransactionState<SpyTransactionStore> {
    TransactionState {
        transaction_store: store,
        tenancy,
        session_duration: SESSION_COOKIE_DURATION,
    }
}

pub(crate) fn jar_with_session(session_id: &str) -> CookieJar {
    CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_owned()))
}
