//! # Session Manager
//!
//! Simulated login, logout and registration on top of durable storage.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(form)                                                            │
//! │    validate ──fail──► Err(InvalidForm)      (immediate, no delay)       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │    sleep(simulated latency)                                             │
//! │    fabricate User + token                                               │
//! │    storage["userToken"] = token                                         │
//! │    session = authenticated                                              │
//! │                                                                         │
//! │  register(form)   validate → sleep → "Registration successful! ..."     │
//! │                   (never touches the session)                           │
//! │                                                                         │
//! │  logout()         session cleared, storage["userToken"] removed         │
//! │                                                                         │
//! │  rehydrate()      storage["userToken"] → User::from_token → session     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use atlas_core::validation::{validate_login, validate_register, LoginForm, RegisterForm};
use atlas_core::{SessionState, User, TOKEN_STORAGE_KEY};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ClientResult;
use crate::storage::KeyValueStore;

/// Shown after a successful registration.
pub const REGISTRATION_SUCCESS: &str = "Registration successful! Please log in.";

pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
    latency: Duration,
    state: Arc<RwLock<SessionState>>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn KeyValueStore>, latency: Duration) -> Self {
        SessionManager {
            storage,
            latency,
            state: Arc::new(RwLock::new(SessionState::new())),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Restores the session from the stored token.
    ///
    /// A malformed token is removed from storage and the session stays
    /// logged out.
    ///
    /// ## Returns
    /// Whether a session was restored.
    pub async fn rehydrate(&self) -> ClientResult<bool> {
        let Some(token) = self.storage.get(TOKEN_STORAGE_KEY)? else {
            debug!("No stored session token");
            return Ok(false);
        };

        match User::from_token(&token, Utc::now()) {
            Ok(user) => {
                info!(username = %user.username, "Session restored from stored token");
                self.state.write().await.login(user);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Discarding stored session token");
                self.storage.remove(TOKEN_STORAGE_KEY)?;
                Ok(false)
            }
        }
    }

    /// Validates the form, waits out the simulated latency and starts a
    /// session.
    pub async fn login(&self, form: &LoginForm) -> ClientResult<User> {
        validate_login(form)?;

        tokio::time::sleep(self.latency).await;

        let user = User::fabricate(form.username.trim(), Utc::now());
        self.storage.set(TOKEN_STORAGE_KEY, &user.token)?;
        self.state.write().await.login(user.clone());

        info!(username = %user.username, "Logged in");
        Ok(user)
    }

    /// Ends the session. Calling it while logged out is harmless.
    pub async fn logout(&self) -> ClientResult<()> {
        let previous = {
            let mut state = self.state.write().await;
            let previous = state.user().map(|u| u.username.clone());
            state.logout();
            previous
        };
        self.storage.remove(TOKEN_STORAGE_KEY)?;

        match previous {
            Some(username) => info!(username = %username, "Logged out"),
            None => debug!("Logout without an active session"),
        }
        Ok(())
    }

    /// Validates the registration form and acknowledges it. No account is
    /// created and the session is left as it was.
    pub async fn register(&self, form: &RegisterForm) -> ClientResult<&'static str> {
        validate_register(form)?;

        tokio::time::sleep(self.latency).await;

        info!(username = %form.username.trim(), "Registration accepted");
        Ok(REGISTRATION_SUCCESS)
    }
}
