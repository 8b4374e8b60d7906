//! Decoding the backend's auth-status response.
//!
//! The status endpoint is not consistent about its payload. The flag may
//! sit at the top level, under one `data` envelope or under two, and it may
//! be called `isAuthenticated` or `authenticated`. Each known layout is a
//! [`StatusShape`]; shapes are tried in [`StatusShape::PRIORITY`] order and
//! the first one that recognises the payload decides.
//!
//! `hasToken` is never read. A token existing says nothing about whether
//! the server still accepts it.

use serde_json::{Map, Value};

const ENVELOPE: &str = "data";
const IS_AUTHENTICATED: &str = "isAuthenticated";
const AUTHENTICATED: &str = "authenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusShape {
    /// `{ data: { data: { isAuthenticated } } }`
    DoubleEnvelope,
    /// `{ data: { isAuthenticated } }`
    SingleEnvelope,
    /// `{ isAuthenticated }`
    DirectShape,
    /// `isAuthenticated` or `authenticated` on the innermost object present.
    LegacyFields,
}

impl StatusShape {
    pub const PRIORITY: [StatusShape; 4] = [
        StatusShape::DoubleEnvelope,
        StatusShape::SingleEnvelope,
        StatusShape::DirectShape,
        StatusShape::LegacyFields,
    ];

    /// `Some(flag)` when `raw` has this shape, `None` otherwise.
    pub fn decode(self, raw: &Value) -> Option<bool> {
        match self {
            StatusShape::DoubleEnvelope => {
                let inner = envelope(envelope(raw.as_object()?)?)?;
                inner.get(IS_AUTHENTICATED).map(is_true)
            }
            StatusShape::SingleEnvelope => {
                let outer = envelope(raw.as_object()?)?;
                if envelope(outer).is_some() {
                    return None;
                }
                outer.get(IS_AUTHENTICATED).map(is_true)
            }
            StatusShape::DirectShape => raw.as_object()?.get(IS_AUTHENTICATED).map(is_true),
            StatusShape::LegacyFields => {
                let target = innermost(raw)?;
                Some(flag(target, IS_AUTHENTICATED) || flag(target, AUTHENTICATED))
            }
        }
    }
}

/// Resolve a raw status payload to "is the session authenticated".
/// Anything unrecognised is `false`.
pub fn resolve_auth_status(raw: &Value) -> bool {
    classify(raw).is_some_and(|(_, authenticated)| authenticated)
}

/// The shape that decided `raw`, with its verdict.
pub fn classify(raw: &Value) -> Option<(StatusShape, bool)> {
    if is_falsy(raw) {
        return None;
    }
    StatusShape::PRIORITY
        .into_iter()
        .find_map(|shape| shape.decode(raw).map(|flag| (shape, flag)))
}

fn is_falsy(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn envelope(obj: &Map<String, Value>) -> Option<&Map<String, Value>> {
    obj.get(ENVELOPE)?.as_object()
}

/// First object among `raw.data.data`, `raw.data`, `raw`.
fn innermost(raw: &Value) -> Option<&Map<String, Value>> {
    let top = raw.as_object()?;
    match envelope(top) {
        Some(outer) => Some(envelope(outer).unwrap_or(outer)),
        None => Some(top),
    }
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(is_true)
}

fn is_true(value: &Value) -> bool {
    value.as_bool() == Some(true)
}
