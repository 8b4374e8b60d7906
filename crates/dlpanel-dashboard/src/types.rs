//! Request/response bodies for the backend auth endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default, alias = "expires_in")]
    pub expires_in: Option<i64>,
}

/// The backend sometimes wraps bodies in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginReply {
    Wrapped { data: LoginResponse },
    Bare(LoginResponse),
}

impl LoginReply {
    pub fn into_inner(self) -> LoginResponse {
        match self {
            LoginReply::Wrapped { data } => data,
            LoginReply::Bare(resp) => resp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(alias = "message", alias = "detail")]
    pub error: String,
}
