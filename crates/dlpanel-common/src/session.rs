//! Session gate state machine.
//!
//! Each time a protected view mounts it asks the backend for the session
//! status. The gate tracks that one request:
//!
//! ```text
//!   mount ──► Checking ──ok──► Authenticated | Unauthenticated
//!                 │
//!                 └──err──► ErrorTreatedAsUnauthenticated
//! ```
//!
//! A [`MountTicket`] ties a response to the mount that asked for it. Only
//! the live ticket may resolve the gate. Responses for an unmounted or
//! superseded mount are dropped.
//!
//! The gate never blocks the protected content once something has been
//! decided. Not being authenticated only adds a login banner.

use serde_json::Value;
use thiserror::Error;

use crate::status::resolve_auth_status;

// ── Errors ──────────────────────────────────────────────────────────

/// Why a status check produced no usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("status check timed out after {0} ms")]
    Timeout(u32),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed status response: {0}")]
    Decode(String),
}

// ── Decision ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Authenticated,
    Unauthenticated,
    /// The check itself failed. Rendered exactly like `Unauthenticated`.
    Unreachable,
}

impl AuthDecision {
    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthDecision::Authenticated)
    }
}

/// Map a status-check outcome to a decision. Never fails: errors become
/// [`AuthDecision::Unreachable`].
pub fn decide(result: Result<Value, QueryError>) -> AuthDecision {
    match result {
        Ok(raw) if resolve_auth_status(&raw) => AuthDecision::Authenticated,
        Ok(_) => AuthDecision::Unauthenticated,
        Err(e) => {
            log::debug!("auth status check failed, treating as logged out: {e}");
            AuthDecision::Unreachable
        }
    }
}

// ── Gate ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Request in flight. `previous` is the last decision, if any mount
    /// has resolved before.
    Checking { previous: Option<AuthDecision> },
    Authenticated,
    Unauthenticated,
    ErrorTreatedAsUnauthenticated,
}

impl Default for GateState {
    fn default() -> Self {
        GateState::Checking { previous: None }
    }
}

impl From<AuthDecision> for GateState {
    fn from(decision: AuthDecision) -> Self {
        match decision {
            AuthDecision::Authenticated => GateState::Authenticated,
            AuthDecision::Unauthenticated => GateState::Unauthenticated,
            AuthDecision::Unreachable => GateState::ErrorTreatedAsUnauthenticated,
        }
    }
}

/// What the guard should put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Full-viewport spinner, nothing else.
    Loading,
    /// The protected children, optionally preceded by a login banner.
    Content { login_banner: bool },
}

/// Identifies one mount's status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    next_ticket: u64,
    live: Option<MountTicket>,
    state: GateState,
    last: Option<AuthDecision>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh check. Any earlier ticket stops being current.
    pub fn mount(&mut self) -> MountTicket {
        self.next_ticket += 1;
        let ticket = MountTicket(self.next_ticket);
        self.live = Some(ticket);
        self.state = GateState::Checking {
            previous: self.last,
        };
        log::debug!("session gate mounted ({ticket:?})");
        ticket
    }

    /// The view owning `ticket` went away; its response must not land.
    pub fn unmount(&mut self, ticket: MountTicket) {
        if self.live == Some(ticket) {
            self.live = None;
        }
    }

    pub fn is_current(&self, ticket: MountTicket) -> bool {
        self.live == Some(ticket)
    }

    /// Apply a status-check outcome. Returns `false` when `ticket` is stale
    /// and the outcome was discarded.
    pub fn resolve(&mut self, ticket: MountTicket, result: Result<Value, QueryError>) -> bool {
        if !self.is_current(ticket) {
            log::debug!("discarding stale auth status response ({ticket:?})");
            return false;
        }
        let decision = decide(result);
        self.last = Some(decision);
        self.state = decision.into();
        log::debug!("session gate resolved: {:?}", self.state);
        true
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn view(&self) -> GateView {
        let decision = match self.state {
            GateState::Checking { previous: None } => return GateView::Loading,
            GateState::Checking {
                previous: Some(decision),
            } => decision,
            GateState::Authenticated => AuthDecision::Authenticated,
            GateState::Unauthenticated => AuthDecision::Unauthenticated,
            GateState::ErrorTreatedAsUnauthenticated => AuthDecision::Unreachable,
        };
        GateView::Content {
            login_banner: !decision.is_authenticated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decide_maps_errors_to_unreachable() {
        assert_eq!(
            decide(Err(QueryError::Network("connection refused".into()))),
            AuthDecision::Unreachable
        );
        assert_eq!(decide(Err(QueryError::Timeout(10_000))), AuthDecision::Unreachable);
        assert_eq!(decide(Err(QueryError::Status(502))), AuthDecision::Unreachable);
    }

    #[test]
    fn decide_resolves_payloads() {
        assert_eq!(
            decide(Ok(json!({ "data": { "authenticated": true } }))),
            AuthDecision::Authenticated
        );
        assert_eq!(decide(Ok(json!({ "hasToken": true }))), AuthDecision::Unauthenticated);
    }

    #[test]
    fn first_mount_shows_loading() {
        let mut gate = SessionGate::new();
        assert_eq!(gate.view(), GateView::Loading);
        gate.mount();
        assert_eq!(gate.state(), GateState::Checking { previous: None });
        assert_eq!(gate.view(), GateView::Loading);
    }

    #[test]
    fn resolved_states_always_render_content() {
        let mut gate = SessionGate::new();

        let t = gate.mount();
        assert!(gate.resolve(t, Ok(json!({ "isAuthenticated": true }))));
        assert_eq!(gate.state(), GateState::Authenticated);
        assert_eq!(gate.view(), GateView::Content { login_banner: false });

        let t = gate.mount();
        assert!(gate.resolve(t, Ok(json!({ "isAuthenticated": false }))));
        assert_eq!(gate.state(), GateState::Unauthenticated);
        assert_eq!(gate.view(), GateView::Content { login_banner: true });

        let t = gate.mount();
        assert!(gate.resolve(t, Err(QueryError::Status(500))));
        assert_eq!(gate.state(), GateState::ErrorTreatedAsUnauthenticated);
        assert_eq!(gate.view(), GateView::Content { login_banner: true });
    }

    #[test]
    fn remount_keeps_previous_decision_while_checking() {
        let mut gate = SessionGate::new();
        let t = gate.mount();
        gate.resolve(t, Ok(json!({ "authenticated": true })));

        gate.mount();
        assert_eq!(
            gate.state(),
            GateState::Checking {
                previous: Some(AuthDecision::Authenticated)
            }
        );
        assert_eq!(gate.view(), GateView::Content { login_banner: false });
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut gate = SessionGate::new();
        let old = gate.mount();
        let new = gate.mount();

        assert!(gate.resolve(new, Ok(json!({ "authenticated": false }))));
        assert!(!gate.resolve(old, Ok(json!({ "authenticated": true }))));
        assert_eq!(gate.state(), GateState::Unauthenticated);
    }

    #[test]
    fn response_after_unmount_is_discarded() {
        let mut gate = SessionGate::new();
        let t = gate.mount();
        gate.unmount(t);

        assert!(!gate.resolve(t, Ok(json!({ "authenticated": true }))));
        assert_eq!(gate.state(), GateState::Checking { previous: None });
    }

    #[test]
    fn unmounting_a_stale_ticket_leaves_live_mount_alone() {
        let mut gate = SessionGate::new();
        let old = gate.mount();
        let new = gate.mount();
        gate.unmount(old);

        assert!(gate.is_current(new));
        assert!(gate.resolve(new, Ok(json!({ "authenticated": true }))));
    }
}
