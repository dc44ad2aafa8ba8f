//! Auth-session state for the current client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Held in memory by [`crate::store::SessionStore`] and mirrored into
//! persistent storage. A session is authenticated exactly when it holds a
//! token.

use crate::types::User;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    /// Linked profile resource; not every account has one.
    pub profile_id: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Reset every field to absent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
