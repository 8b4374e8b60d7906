//! Optimistic client-side authentication record.
//!
//! `AuthState` caches what the dashboard last learned about the session:
//! a flag, the user's identity and a bearer token with its expiry. It is a
//! UI hint only; the backend decides every protected request on its own.
//!
//! The record is persisted under `auth-storage` and changes only through
//! [`AuthStore::set_auth`], [`AuthStore::clear_auth`] and
//! [`AuthStore::set_token`].

use serde::{Deserialize, Serialize};

use crate::persist::{PersistentStore, Record, StateStorage};

/// Storage key of the persisted auth record.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Absolute expiry for a token issued at `now_ms` with a lifetime of
/// `ttl_secs` seconds.
pub fn expiry_from_ttl(now_ms: i64, ttl_secs: Option<i64>) -> Option<i64> {
    ttl_secs.map(|secs| now_ms.saturating_add(secs.saturating_mul(1000)))
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthState {
    is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    /// Epoch milliseconds. `None` counts as already expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    token_expiry: Option<i64>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn token_expiry(&self) -> Option<i64> {
        self.token_expiry
    }

    /// Whether the cached token should be considered expired at `now_ms`.
    /// Reaching the expiry instant exactly counts as expired.
    pub fn is_token_expired_at(&self, now_ms: i64) -> bool {
        match self.token_expiry {
            None => true,
            Some(expiry) => now_ms >= expiry,
        }
    }

    fn merge(&mut self, patch: AuthPatch) {
        self.is_authenticated = patch.is_authenticated.unwrap_or(true);
        if patch.user_id.is_some() {
            self.user_id = patch.user_id;
        }
        if patch.username.is_some() {
            self.username = patch.username;
        }
        if patch.token.is_some() {
            self.token = patch.token;
        }
        if patch.token_expiry.is_some() {
            self.token_expiry = patch.token_expiry;
        }
    }
}

impl Record for AuthState {
    const KEY: &'static str = AUTH_STORAGE_KEY;
}

/// Partial update for [`AuthStore::set_auth`]. Unset fields keep their
/// current value, except `is_authenticated`, which defaults to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPatch {
    pub is_authenticated: Option<bool>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub token_expiry: Option<i64>,
}

impl AuthPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticated(mut self, value: bool) -> Self {
        self.is_authenticated = Some(value);
        self
    }

    pub fn user_id(mut self, value: impl Into<String>) -> Self {
        self.user_id = Some(value.into());
        self
    }

    pub fn username(mut self, value: impl Into<String>) -> Self {
        self.username = Some(value.into());
        self
    }

    pub fn token(mut self, value: impl Into<String>) -> Self {
        self.token = Some(value.into());
        self
    }

    pub fn token_expiry(mut self, value: i64) -> Self {
        self.token_expiry = Some(value);
        self
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Persisted auth record with its mutators.
pub type AuthStore<S> = PersistentStore<AuthState, S>;

impl<S: StateStorage> PersistentStore<AuthState, S> {
    /// Merge `patch` into the record.
    pub fn set_auth(&mut self, patch: AuthPatch) {
        self.update(|state| state.merge(patch));
    }

    /// Reset to the logged-out initial record.
    pub fn clear_auth(&mut self) {
        self.update(|state| *state = AuthState::default());
    }

    /// Cache a token. Always marks the record authenticated; `expiry`
    /// replaces any previous expiry, including with `None`.
    pub fn set_token(&mut self, token: impl Into<String>, expiry: Option<i64>) {
        let token = token.into();
        self.update(|state| {
            state.token = Some(token);
            state.token_expiry = expiry;
            state.is_authenticated = true;
        });
    }

    /// Whether the cached token is expired right now.
    pub fn check_token_expiry(&self) -> bool {
        self.check_token_expiry_at(now_millis())
    }

    pub fn check_token_expiry_at(&self, now_ms: i64) -> bool {
        self.state().is_token_expired_at(now_ms)
    }

    /// Drop a cached session whose recorded expiry has passed. A record
    /// without an expiry is left alone. Returns whether it was cleared.
    pub fn invalidate_if_expired(&mut self, now_ms: i64) -> bool {
        let state = self.state();
        let lapsed = state.token_expiry.is_some_and(|expiry| now_ms >= expiry);
        if state.is_authenticated && lapsed {
            log::info!("cached session expired, clearing auth record");
            self.clear_auth();
            return true;
        }
        false
    }
}
