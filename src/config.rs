//! Session configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::AuthError;

pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SESSION_STORE_PATH: &str = ".scout-session.json";
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTH_CONNECT_TIMEOUT_SECS: u64 = 10;

/// What `fetch_current_user` does with the session when the identity check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Any failure clears the session.
    #[default]
    ClearOnAnyError,
    /// Transport failures keep the session; rejections still clear it.
    KeepOnTransportError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for AuthTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_AUTH_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_AUTH_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub auth_service_url: String,
    pub store_path: PathBuf,
    pub timeouts: AuthTimeouts,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_SESSION_STORE_PATH),
            timeouts: AuthTimeouts::default(),
            fetch_failure_policy: FetchFailurePolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_SERVICE_URL` (falls back to `NUXT_PUBLIC_AUTH_SERVICE_URL`): default `http://localhost:8080`
    /// - `SESSION_STORE_PATH`: default `.scout-session.json`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SESSION_FETCH_FAILURE_POLICY`: `clear` (default) or `keep_on_transport`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] for an unknown failure policy.
    pub fn from_env() -> Result<Self, AuthError> {
        let auth_service_url = std::env::var("AUTH_SERVICE_URL")
            .or_else(|_| std::env::var("NUXT_PUBLIC_AUTH_SERVICE_URL"))
            .unwrap_or_else(|_| DEFAULT_AUTH_SERVICE_URL.to_string());
        let store_path = std::env::var("SESSION_STORE_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_STORE_PATH), PathBuf::from);
        let timeouts = AuthTimeouts {
            request_secs: env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_AUTH_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_AUTH_CONNECT_TIMEOUT_SECS),
        };
        let fetch_failure_policy =
            parse_fetch_failure_policy(std::env::var("SESSION_FETCH_FAILURE_POLICY").ok().as_deref())?;

        Ok(Self { auth_service_url: normalize_base_url(&auth_service_url), store_path, timeouts, fetch_failure_policy })
    }
}

/// Trim whitespace and trailing slashes so paths can be appended with `format!`.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_fetch_failure_policy(raw: Option<&str>) -> Result<FetchFailurePolicy, AuthError> {
    match raw.map(str::trim).unwrap_or("clear") {
        "clear" => Ok(FetchFailurePolicy::ClearOnAnyError),
        "keep_on_transport" => Ok(FetchFailurePolicy::KeepOnTransportError),
        other => Err(AuthError::Config(format!(
            "unknown SESSION_FETCH_FAILURE_POLICY '{other}' (expected 'clear' or 'keep_on_transport')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
