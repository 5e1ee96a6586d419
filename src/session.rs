//! Session cookies for partitioning transactions between callers.
//!
//! A session is not stored anywhere on the server. It only exists as the
//! value of the [SESSION_COOKIE] on the client and as the `session_id` column
//! of the transactions created with it.

use std::fmt::Display;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use crate::{Error, Tenancy};

/// The name of the cookie that holds the session ID.
pub const SESSION_COOKIE: &str = "sessionId";

/// How long a session cookie lives after it was last set.
pub const SESSION_COOKIE_DURATION: Duration = Duration::days(7);

/// An opaque identifier grouping the transactions of one caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a new, random session ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing session ID, e.g. from a cookie.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The session ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for SessionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for SessionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).map(SessionId)
    }
}

/// Get the session ID from the session cookie in `jar`.
///
/// Only the presence of a non-blank cookie is checked. The value is not
/// required to look like a generated ID nor to belong to any transaction.
///
/// # Errors
/// Returns [Error::SessionMissing] if there is no session cookie.
pub(crate) fn require_session(jar: &CookieJar) -> Result<SessionId, Error> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().trim())
        .filter(|value| !value.is_empty())
        .map(SessionId::new)
        .ok_or(Error::SessionMissing)
}

/// Get the session that a read request is scoped to.
///
/// Returns `None` for [Tenancy::SingleTenant] without looking at the cookies.
///
/// # Errors
/// Returns [Error::SessionMissing] in [Tenancy::Session] mode if there is no session cookie.
pub(crate) fn resolve_scope(tenancy: Tenancy, jar: &CookieJar) -> Result<Option<SessionId>, Error> {
    match tenancy {
        Tenancy::SingleTenant => Ok(None),
        Tenancy::Session => require_session(jar).map(Some),
    }
}

/// Get the session ID from `jar`, or mint a new one if there is no session cookie.
pub(crate) fn session_or_generate(jar: &CookieJar) -> SessionId {
    require_session(jar).unwrap_or_else(|_| {
        let session_id = SessionId::generate();
        tracing::debug!("Minted new session {session_id}");
        session_id
    })
}

/// Add the session cookie to `jar` so that it expires `duration` from now.
///
/// Returns the cookie jar with the cookie added, replacing any existing session cookie.
pub(crate) fn set_session_cookie(
    jar: CookieJar,
    session_id: &SessionId,
    duration: Duration,
) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session_id.as_str().to_owned()))
            .path("/")
            .max_age(duration)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}
