//! Auth-service HTTP client.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam the session store depends on; `HttpAuthApi` is the
//! `reqwest` implementation. Status handling and body parsing live in small
//! pure functions so they can be tested without a server.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::{AuthTimeouts, SessionConfig, normalize_base_url};
use crate::error::AuthError;
use crate::types::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const ME_PATH: &str = "/api/v1/auth/me";

/// The three calls the session store makes against the auth service.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token, identity and profile id.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Create an account. Does not authenticate.
    async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<RegisterResponse, AuthError>;

    /// Resolve the identity behind `token`.
    async fn me(&self, token: &str) -> Result<MeResponse, AuthError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: AuthTimeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base_url(base_url) })
    }

    /// Build a client from parsed session config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AuthError> {
        Self::new(&config.auth_service_url, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, AuthError> {
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        check_status(status, &text)?;
        parse_body(&text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let url = endpoint(&self.base_url, LOGIN_PATH);
        self.send(self.http.post(url).json(&LoginRequest { email, password }))
            .await
    }

    async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<RegisterResponse, AuthError> {
        let url = endpoint(&self.base_url, REGISTER_PATH);
        self.send(self.http.post(url).json(&RegisterRequest { email, password, full_name }))
            .await
    }

    async fn me(&self, token: &str) -> Result<MeResponse, AuthError> {
        let url = endpoint(&self.base_url, ME_PATH);
        self.send(self.http.get(url).bearer_auth(token)).await
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

fn check_status(status: u16, body: &str) -> Result<(), AuthError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AuthError::Rejected { status, body: body.to_owned() })
    }
}

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, AuthError> {
    serde_json::from_str(text).map_err(|e| AuthError::Deserialization(e.to_string()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
