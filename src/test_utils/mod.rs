#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod store;

pub(crate) use http::{assert_content_type, get_header, parse_json_body};
pub(crate) use store::{SpyTransactionStore, jar_with_session, transaction_state};
