//! Session identity capability.
//!
//! Components never read ambient storage for the signed-in user; they are
//! handed a [`SessionProvider`] and ask it for the current session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed-in user identity and bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    /// A session is usable only when both parts are present.
    pub fn is_valid(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.token.trim().is_empty()
    }
}

// Tokens must not leak into logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Capability for reading the current session.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
}

/// Fixed session, used by tests and by configs that seed a token directly.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<Session>);

impl StaticSession {
    pub fn new(session: Session) -> Self {
        Self(Some(session))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current_session(&self) -> Option<Session> {
        self.0.clone().filter(Session::is_valid)
    }
}
