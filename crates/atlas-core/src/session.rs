//! # Session State
//!
//! Simulated authentication: there is no server, so a "login" fabricates an
//! identity locally and hands back a bearer token for durable storage.
//!
//! ## Token Format
//! ```text
//! <username>:<uuid-simple>
//!
//! alice:3f2b8c1d9e0a4b7c8d6e5f4a3b2c1d0e
//! └─┬─┘ └──────────────┬───────────────┘
//! username      user id (32 hex digits)
//! ```
//!
//! The token is the only thing persisted. On startup it is parsed back into a
//! [`User`] with [`User::from_token`].
//!
//! Clock reads stay outside this crate: callers pass `now` in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// User
// =============================================================================

/// A (simulated) authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub token: String,
    #[ts(type = "string")]
    pub logged_in_at: DateTime<Utc>,
}

impl User {
    /// Fabricates a fresh identity and token for `username`.
    pub fn fabricate(username: impl Into<String>, now: DateTime<Utc>) -> Self {
        let username = username.into();
        let id = Uuid::new_v4();
        User {
            id: id.to_string(),
            token: format!("{}:{}", username, id.simple()),
            username,
            logged_in_at: now,
        }
    }

    /// Rebuilds a user from a stored token.
    ///
    /// ## Errors
    /// [`CoreError::MalformedToken`] if the token has no `:` separator, an
    /// empty username, or an id that is not a UUID.
    pub fn from_token(token: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        let malformed = || CoreError::MalformedToken(token.to_string());

        let (username, id) = token.rsplit_once(':').ok_or_else(malformed)?;
        if username.trim().is_empty() {
            return Err(malformed());
        }
        let id = Uuid::parse_str(id).map_err(|_| malformed())?;

        Ok(User {
            id: id.to_string(),
            username: username.to_string(),
            token: token.to_string(),
            logged_in_at: now,
        })
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Who is logged in, if anyone.
///
/// `is_authenticated` is derived from the presence of a user, so the two can
/// never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    user: Option<User>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Token of the current user, if any.
    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    /// Replaces the session with `user`.
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Clears the session. Idempotent.
    pub fn logout(&mut self) {
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fabricate_token_format() {
        let user = User::fabricate("alice", Utc::now());
        let (name, id) = user.token.split_once(':').unwrap();
        assert_eq!(name, "alice");
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(Uuid::parse_str(id).unwrap().to_string(), user.id);
    }

    #[test]
    fn test_from_token_round_trip() {
        let now = Utc::now();
        let user = User::fabricate("alice", now);
        let restored = User::from_token(&user.token, now).unwrap();
        assert_eq!(restored, user);
    }

    #[test]
    fn test_from_token_username_may_contain_colon() {
        let user = User::fabricate("a:b", Utc::now());
        let restored = User::from_token(&user.token, Utc::now()).unwrap();
        assert_eq!(restored.username, "a:b");
    }

    #[test]
    fn test_from_token_rejects_malformed() {
        for token in ["", "alice", ":3f2b8c1d9e0a4b7c8d6e5f4a3b2c1d0e", "alice:not-a-uuid"] {
            let err = User::from_token(token, Utc::now()).unwrap_err();
            assert!(matches!(err, CoreError::MalformedToken(_)), "{token}");
        }
    }

    #[test]
    fn test_session_login_logout() {
        let mut session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());

        let user = User::fabricate("alice", Utc::now());
        session.login(user.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&user));
        assert_eq!(session.token(), Some(user.token.as_str()));

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());

        session.logout();
        assert!(!session.is_authenticated());
    }
}
