//! Wire DTOs for the auth-service boundary.
//!
//! DESIGN
//! ======
//! Request types borrow their fields; response types own them. `LoginResponse`
//! keeps unrecognised fields in `extra` so callers still see the whole body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record returned by the auth service and persisted under `user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Display name; the service omits it for some account kinds.
    #[serde(default)]
    pub full_name: String,
    /// Account role (`player`, `scout`, `club`, ...), when the service sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

/// Body of a successful `POST /api/v1/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Any other top-level fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a successful `POST /api/v1/auth/register`, passed through as-is.
pub type RegisterResponse = Value;

/// Body of a successful `GET /api/v1/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub profile_id: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
