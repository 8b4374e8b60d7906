//! Shared client-side core for the dlpanel dashboard.
//!
//! This crate contains:
//! - **Persistence** — the `{ state, version }` record envelope and the storage seam
//! - **Auth state** — the optimistic, persisted auth record and its mutators
//! - **UI state** — persisted presentation preferences
//! - **Status resolution** — decoding the backend's auth-status response shapes
//! - **Session gating** — the route-guard state machine and its stale-response discipline
//! - **Config** — dashboard endpoints, timeouts and log level
//!
//! Nothing here touches the browser; the dashboard crate supplies the
//! `localStorage` backend and the HTTP calls.

pub mod auth;
pub mod config;
pub mod persist;
pub mod session;
pub mod status;
pub mod ui;
