//! Per-browser sessions.
//!
//! Each browser carries a random token in the `methodnet_session` cookie. The
//! store maps that token to the browser's selection state and view options.
//! Sessions live in memory only and expire after [`SESSION_TTL_HOURS`] idle.

use crate::network::ViewParams;
use crate::selection::SelectionState;
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Session cookie name
pub const SESSION_COOKIE: &str = "methodnet_session";

/// Idle time after which a session is forgotten
pub const SESSION_TTL_HOURS: i64 = 24;

const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub selection: SelectionState,
    pub view: ViewParams,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new(view: ViewParams, now: DateTime<Utc>) -> Self {
        Self {
            selection: SelectionState::default(),
            view,
            last_seen: now,
        }
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(SESSION_TTL_HOURS))
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `f` to the session named by `token`, creating a fresh one when
    /// the token is absent, unknown or expired. Returns the token actually
    /// used and a snapshot of the session after `f` ran.
    ///
    /// The whole update runs under the store lock, so two events for the same
    /// session are applied one after the other.
    pub fn with_session<F>(&self, token: Option<&str>, default_view: &ViewParams, f: F) -> (String, Session)
    where
        F: FnOnce(&mut Session),
    {
        self.with_session_at(token, default_view, Utc::now(), f)
    }

    fn with_session_at<F>(
        &self,
        token: Option<&str>,
        default_view: &ViewParams,
        now: DateTime<Utc>,
        f: F,
    ) -> (String, Session)
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.lock();
        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen < ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "purged idle sessions");
        }

        let token = match token.filter(|t| sessions.contains_key(*t)) {
            Some(t) => t.to_string(),
            None => new_token(),
        };
        let session = sessions.entry(token.clone()).or_insert_with(|| {
            tracing::debug!("starting new session");
            Session::new(default_view.clone(), now)
        });
        session.last_seen = now;
        f(session);
        (token, session.clone())
    }

    /// Snapshot without modification (still refreshes the idle timer).
    pub fn get_or_create(&self, token: Option<&str>, default_view: &ViewParams) -> (String, Session) {
        self.with_session(token, default_view, |_| {})
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Random alphanumeric session token.
pub fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Token from the request cookies, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// `Set-Cookie` value for a session token.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_HOURS * 3600
    )
}
