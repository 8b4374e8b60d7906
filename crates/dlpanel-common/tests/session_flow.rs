//! End-to-end flows over the public API: persisted auth surviving a
//! reload, and the gate's rendering decisions for the three status-check
//! outcomes.

use dlpanel_common::auth::{AuthPatch, AuthStore, now_millis};
use dlpanel_common::persist::MemoryStorage;
use dlpanel_common::session::{GateState, GateView, QueryError, SessionGate};
use dlpanel_common::ui::{Theme, UiStore};
use serde_json::json;

/// Count how many login banners a view would render.
fn banners(view: GateView) -> usize {
    match view {
        GateView::Content { login_banner: true } => 1,
        _ => 0,
    }
}

#[test]
fn auth_record_survives_reload() {
    let storage = MemoryStorage::new();
    let mut store = AuthStore::init(storage.clone());
    store.set_auth(
        AuthPatch::new()
            .authenticated(true)
            .user_id("123")
            .username("u")
            .token("abc"),
    );

    let reloaded = AuthStore::init(storage);
    assert_eq!(reloaded.state(), store.state());
    assert!(reloaded.state().is_authenticated());
    assert_eq!(reloaded.state().user_id(), Some("123"));
    assert_eq!(reloaded.state().username(), Some("u"));
    assert_eq!(reloaded.state().token(), Some("abc"));
}

#[test]
fn dispose_flushes_and_returns_storage() {
    let mut store = AuthStore::init(MemoryStorage::new());
    store.set_token("abc", Some(now_millis() + 60_000));
    let storage = store.dispose();

    let reloaded = AuthStore::init(storage);
    assert_eq!(reloaded.state().token(), Some("abc"));
    assert!(!reloaded.check_token_expiry());
}

#[test]
fn login_then_logout_round_trip() {
    let storage = MemoryStorage::new();
    let mut store = AuthStore::init(storage.clone());
    store.set_auth(AuthPatch::new().user_id("7").username("admin"));
    store.set_token("tok", Some(now_millis() + 3_600_000));
    assert!(AuthStore::init(storage.clone()).state().is_authenticated());

    store.clear_auth();
    let reloaded = AuthStore::init(storage);
    assert!(!reloaded.state().is_authenticated());
    assert_eq!(reloaded.state().token(), None);
}

#[test]
fn unauthenticated_status_renders_children_with_one_banner() {
    let mut gate = SessionGate::new();
    let ticket = gate.mount();
    assert_eq!(gate.view(), GateView::Loading);

    gate.resolve(ticket, Ok(json!({ "data": { "authenticated": false } })));
    assert_eq!(gate.state(), GateState::Unauthenticated);
    assert_eq!(banners(gate.view()), 1);
}

#[test]
fn authenticated_status_renders_children_without_banner() {
    let mut gate = SessionGate::new();
    let ticket = gate.mount();
    gate.resolve(ticket, Ok(json!({ "data": { "authenticated": true } })));

    assert_eq!(gate.state(), GateState::Authenticated);
    assert_eq!(gate.view(), GateView::Content { login_banner: false });
}

#[test]
fn network_failure_renders_like_unauthenticated() {
    let mut gate = SessionGate::new();
    let ticket = gate.mount();
    gate.resolve(ticket, Err(QueryError::Network("failed to fetch".into())));

    assert_eq!(gate.state(), GateState::ErrorTreatedAsUnauthenticated);
    assert_eq!(banners(gate.view()), 1);
}

#[test]
fn navigation_race_keeps_latest_mount() {
    let mut gate = SessionGate::new();
    let first = gate.mount();
    gate.unmount(first);
    let second = gate.mount();

    gate.resolve(second, Ok(json!({ "isAuthenticated": true })));
    gate.resolve(first, Err(QueryError::Timeout(10_000)));
    assert_eq!(gate.state(), GateState::Authenticated);
}

#[test]
fn ui_preferences_do_not_touch_auth() {
    let storage = MemoryStorage::new();
    let mut auth = AuthStore::init(storage.clone());
    auth.set_token("abc", None);

    let mut ui = UiStore::init(storage.clone());
    ui.set_theme(Theme::Dark);
    ui.toggle_sidebar();

    let auth = AuthStore::init(storage);
    assert_eq!(auth.state().token(), Some("abc"));
}
