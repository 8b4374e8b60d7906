//! Dashboard configuration.
//!
//! Read from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid dashboard config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Prefix for every API path. Empty means same origin.
    pub api_base: String,
    pub status_path: String,
    pub login_path: String,
    pub logout_path: String,
    /// Status checks slower than this count as failed.
    pub status_timeout_ms: u32,
    /// `log` level name for the browser console.
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            status_path: "/api/auth/status".into(),
            login_path: "/api/auth/login".into(),
            logout_path: "/api/auth/logout".into(),
            status_timeout_ms: 10_000,
            log_level: "debug".into(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Absolute URL (or same-origin path) for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
