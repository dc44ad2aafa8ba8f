//! Error types for auth-service calls and persistent session storage.

// =============================================================================
// AUTH
// =============================================================================

/// Errors produced by auth-service operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response (connect, DNS, timeout, TLS).
    #[error("auth request failed: {0}")]
    Transport(String),

    /// The auth service answered with a non-success HTTP status.
    #[error("auth service rejected request: status {status}")]
    Rejected { status: u16, body: String },

    /// A response body or persisted entry could not be deserialized.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}

impl AuthError {
    /// True when the failure happened before the service could answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status returned by the service, if it answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Errors produced by a [`crate::storage::KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
