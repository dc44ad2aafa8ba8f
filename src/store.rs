//! Session store — owns the in-memory session and keeps storage in step.
//!
//! DESIGN
//! ======
//! `SessionStore` is a cheap-clone handle: the session sits behind an
//! `Arc<RwLock<_>>`, the auth client and storage behind `Arc<dyn _>`. The
//! lock is never held across an HTTP await. Storage writes happen while the
//! write lock is held so memory and storage change together; storage is a
//! best-effort mirror, so its failures are logged and never surfaced.
//!
//! FAILURE POLICY
//! ==============
//! `fetch_current_user` never returns an error. A failed identity check is
//! reported through [`FetchOutcome`] and, depending on
//! [`FetchFailurePolicy`], clears the session.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::api::AuthApi;
use crate::config::FetchFailurePolicy;
use crate::error::AuthError;
use crate::session::Session;
use crate::storage::{KeyValueStore, PROFILE_ID_KEY, TOKEN_KEY, USER_KEY};
use crate::types::{LoginResponse, RegisterResponse, User};

/// Result of [`SessionStore::fetch_current_user`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// No token was held; nothing was checked.
    NoSession,
    /// The service confirmed the token; user and profile id were refreshed.
    Validated,
    /// The check failed and the session was cleared.
    Invalidated(AuthError),
    /// The check failed but the session was kept, unverified.
    Unverified(AuthError),
    /// A login or logout replaced the checked token while the check was in
    /// flight; the result was discarded and the session is whatever that
    /// operation left.
    Superseded,
}

impl FetchOutcome {
    /// True when the session was cleared as a result of the check.
    #[must_use]
    pub fn cleared_session(&self) -> bool {
        matches!(self, Self::Invalidated(_))
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    session: Arc<RwLock<Session>>,
    fetch_failure_policy: FetchFailurePolicy,
}

impl SessionStore {
    /// Create a store with an empty session.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            session: Arc::new(RwLock::new(Session::default())),
            fetch_failure_policy: FetchFailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_fetch_failure_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_failure_policy = policy;
        self
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    /// Copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.current_user().cloned()
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    pub async fn profile_id(&self) -> Option<String> {
        self.session.read().await.profile_id.clone()
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Log in and replace the session with the service's answer.
    ///
    /// Returns the full response so callers can read fields the store does
    /// not keep (e.g. `refresh_token`).
    ///
    /// # Errors
    ///
    /// Returns the auth client's error unchanged; the session is untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let response = self.api.login(email, password).await?;

        let mut session = self.session.write().await;
        *session = Session {
            user: Some(response.user.clone()),
            token: Some(response.access_token.clone()),
            profile_id: response.profile_id.clone(),
        };
        self.mirror(&session);
        drop(session);

        info!(user_id = %response.user.id, has_profile = response.profile_id.is_some(), "logged in");
        Ok(response)
    }

    /// Create an account. Leaves the session alone.
    ///
    /// # Errors
    ///
    /// Returns the auth client's error unchanged.
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<RegisterResponse, AuthError> {
        self.api.register(email, password, full_name).await
    }

    /// Check the held token against the service and refresh identity fields.
    pub async fn fetch_current_user(&self) -> FetchOutcome {
        let Some(token) = self.token().await else {
            return FetchOutcome::NoSession;
        };

        let result = self.api.me(&token).await;

        let mut session = self.session.write().await;
        // A login or logout finished while the check was in flight; its state wins.
        if session.token.as_deref() != Some(token.as_str()) {
            if let Err(e) = result {
                warn!(error = %e, "identity check failed for a superseded token");
            }
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(me) => {
                session.user = me.user;
                session.profile_id = me.profile_id;
                self.mirror(&session);
                FetchOutcome::Validated
            }
            Err(e) => {
                error!(error = %e, "failed to fetch current user");
                if e.is_transport() && self.fetch_failure_policy == FetchFailurePolicy::KeepOnTransportError {
                    warn!("keeping unverified session after transport failure");
                    return FetchOutcome::Unverified(e);
                }
                session.clear();
                self.forget();
                info!("session cleared after failed identity check");
                FetchOutcome::Invalidated(e)
            }
        }
    }

    /// Clear the session and its persisted entries. Safe to call repeatedly.
    pub async fn logout(&self) {
        let mut session = self.session.write().await;
        let was_authenticated = session.is_authenticated();
        session.clear();
        self.forget();
        drop(session);

        if was_authenticated {
            info!("logged out");
        }
    }

    /// Restore a session persisted by an earlier process.
    ///
    /// Returns true when a token was found. Without a persisted token the
    /// in-memory session is left as it is. No HTTP call is made; the
    /// restored token is trusted until the next [`Self::fetch_current_user`].
    pub async fn initialize_from_storage(&self) -> bool {
        let Some(token) = self.read_item(TOKEN_KEY) else {
            return false;
        };

        let user = self.read_item(USER_KEY).and_then(|raw| match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                let err = AuthError::Deserialization(e.to_string());
                warn!(error = %err, "ignoring malformed persisted user");
                None
            }
        });
        let profile_id = self.read_item(PROFILE_ID_KEY);

        let mut session = self.session.write().await;
        *session = Session { user, token: Some(token), profile_id };
        drop(session);

        info!("session restored from storage");
        true
    }

    // =========================================================================
    // STORAGE MIRROR
    // =========================================================================

    /// Non-empty value under `key`; read failures count as absent.
    fn read_item(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "session storage read failed");
                None
            }
        }
    }

    fn write_item(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set_item(key, value),
            None => self.storage.remove_item(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "session storage write failed");
        }
    }

    fn mirror(&self, session: &Session) {
        let user = match session.user.as_ref().map(serde_json::to_string).transpose() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to serialize user for storage");
                None
            }
        };
        self.write_item(TOKEN_KEY, session.token.as_deref());
        self.write_item(USER_KEY, user.as_deref());
        self.write_item(PROFILE_ID_KEY, session.profile_id.as_deref());
    }

    fn forget(&self) {
        for key in [TOKEN_KEY, USER_KEY, PROFILE_ID_KEY] {
            self.write_item(key, None);
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
