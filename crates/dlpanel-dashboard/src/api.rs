//! HTTP client for the backend auth endpoints.
//!
//! All calls go through gloo-net with JSON bodies and, where a token is
//! cached, Bearer auth. Paths and the base URL come from
//! [`DashboardConfig`].

use std::future::Future;

use dlpanel_common::config::DashboardConfig;
use dlpanel_common::session::QueryError;
use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;

use crate::types::*;

/// Ergonomic result alias.
pub type ApiResult<T> = Result<T, String>;

fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Parse a non-2xx response into an error string.
async fn parse_error(resp: gloo_net::http::Response) -> String {
    let status = resp.status();
    match resp.json::<ApiErrorResponse>().await {
        Ok(e) => format!("{status}: {}", e.error),
        Err(_) => format!("HTTP {status}"),
    }
}

/// Race `fut` against a timer; losing the race is a [`QueryError::Timeout`].
async fn with_timeout<T>(
    ms: u32,
    fut: impl Future<Output = Result<T, QueryError>>,
) -> Result<T, QueryError> {
    let fut = std::pin::pin!(fut);
    let timer = std::pin::pin!(TimeoutFuture::new(ms));
    match select(fut, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(QueryError::Timeout(ms)),
    }
}

// ── Auth ────────────────────────────────────────────────────────────

/// Ask the backend whether the current session is authenticated.
///
/// The payload is returned untyped; its layout varies and is decoded by
/// `dlpanel_common::status`. The request bypasses HTTP caches.
pub async fn auth_status(config: &DashboardConfig, token: Option<&str>) -> Result<Value, QueryError> {
    let url = config.endpoint(&config.status_path);
    let mut req = Request::get(&url)
        .header("Cache-Control", "no-cache")
        .header("Pragma", "no-cache");
    if let Some(token) = token {
        req = req.header("Authorization", &auth_header(token));
    }

    let fetch = async move {
        let resp = req
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;
        if !resp.ok() {
            return Err(QueryError::Status(resp.status()));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))
    };

    with_timeout(config.status_timeout_ms, fetch).await
}

pub async fn login(
    config: &DashboardConfig,
    username: &str,
    password: &str,
) -> ApiResult<LoginResponse> {
    let body = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    let resp = Request::post(&config.endpoint(&config.login_path))
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if resp.ok() {
        resp.json::<LoginReply>()
            .await
            .map(LoginReply::into_inner)
            .map_err(|e| e.to_string())
    } else {
        Err(parse_error(resp).await)
    }
}

/// End the server-side session.
pub async fn logout(config: &DashboardConfig, token: Option<&str>) -> ApiResult<()> {
    let mut req = Request::post(&config.endpoint(&config.logout_path))
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        req = req.header("Authorization", &auth_header(token));
    }
    let resp = req
        .body("{}")
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if resp.ok() {
        Ok(())
    } else {
        Err(parse_error(resp).await)
    }
}
