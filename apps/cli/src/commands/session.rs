//! # Session Commands
//!
//! Simulated login, logout and registration. Forms are validated locally;
//! no credentials ever leave the machine.

use atlas_core::validation::{LoginForm, RegisterForm};

use super::CommandResult;
use crate::state::AppState;

pub async fn login(state: &AppState, form: &LoginForm) -> CommandResult {
    let user = state.session.login(form).await?;
    Ok(format!("Welcome, {}!", user.username))
}

pub async fn logout(state: &AppState) -> CommandResult {
    let was_logged_in = state.session.is_authenticated().await;
    state.session.logout().await?;
    Ok(if was_logged_in {
        "Logged out".to_string()
    } else {
        "Not logged in".to_string()
    })
}

pub async fn register(state: &AppState, form: &RegisterForm) -> CommandResult {
    Ok(state.session.register(form).await?.to_string())
}

pub async fn whoami(state: &AppState) -> CommandResult {
    let session = state.session.snapshot().await;
    Ok(match session.user() {
        Some(user) => format!(
            "{} (since {})",
            user.username,
            user.logged_in_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => "Not logged in".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let state = fixtures::state();
        assert_eq!(whoami(&state).await.unwrap(), "Not logged in");

        let out = login(&state, &login_form("  alice ", "secret1")).await.unwrap();
        assert_eq!(out, "Welcome, alice!");
        assert!(whoami(&state).await.unwrap().starts_with("alice (since "));

        assert_eq!(logout(&state).await.unwrap(), "Logged out");
        assert_eq!(logout(&state).await.unwrap(), "Not logged in");
    }

    #[tokio::test]
    async fn test_login_validation() {
        let state = fixtures::state();
        let err = login(&state, &login_form("alice", "12345")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Password must be at least 6 characters");
        assert!(!state.session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register() {
        let state = fixtures::state();
        let form = RegisterForm {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        };
        assert_eq!(
            register(&state, &form).await.unwrap(),
            "Registration successful! Please log in."
        );
        assert!(!state.session.is_authenticated().await);

        let err = register(
            &state,
            &RegisterForm {
                email: "invalid-email".to_string(),
                ..form
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "Email is invalid");
    }
}
