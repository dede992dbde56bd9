//! # Favorite Commands
//!
//! Bookmarking countries. Only logged-in users may change favorites; the
//! list itself lives in the catalog state and is not persisted.
//!
//! ## Guard
//! ```text
//! favorite add CAN
//!     │
//!     ├── logged out ──► "Please log in to add favorites" (no change)
//!     │
//!     └── logged in ───► look CAN up in the catalog ──► Favorites::add
//! ```

use atlas_core::validation::validate_country_code;
use atlas_core::{Country, CoreError};
use tracing::info;

use super::catalog::ensure_catalog;
use super::{country_table, CommandResult};
use crate::error::ApiError;
use crate::state::AppState;

const GUARDED_ACTION: &str = "add favorites";

async fn require_session(state: &AppState) -> Result<(), ApiError> {
    if state.session.is_authenticated().await {
        Ok(())
    } else {
        Err(CoreError::NotAuthenticated {
            action: GUARDED_ACTION.to_string(),
        }
        .into())
    }
}

/// Resolves a code to a country, preferring the loaded catalog and falling
/// back to the current selection.
async fn resolve(state: &AppState, code: &str) -> Result<Country, ApiError> {
    ensure_catalog(state).await?;
    state
        .catalog
        .read(|s| {
            s.find(code)
                .or_else(|| s.selected_country().filter(|c| c.has_code(code)))
                .cloned()
        })
        .await
        .ok_or_else(|| CoreError::CountryNotFound(code.to_string()).into())
}

/// Lists favorites in the order they were added.
pub async fn list(state: &AppState) -> CommandResult {
    Ok(state
        .catalog
        .read(|s| {
            let favorites = s.favorites();
            if favorites.is_empty() {
                return "No favorites yet".to_string();
            }
            format!(
                "Favorites ({})\n{}",
                favorites.len(),
                country_table(favorites.as_slice(), favorites)
            )
        })
        .await)
}

pub async fn add(state: &AppState, code: &str) -> CommandResult {
    require_session(state).await?;
    let code = validate_country_code(code)?;
    let country = resolve(state, &code).await?;
    let name = country.common_name().to_string();

    if state.catalog.add_favorite(country).await {
        info!(code = %code, "Favorite added");
        Ok(format!("Added {} to favorites", name))
    } else {
        Ok(format!("{} is already a favorite", name))
    }
}

pub async fn remove(state: &AppState, code: &str) -> CommandResult {
    require_session(state).await?;
    let code = validate_country_code(code)?;

    if state.catalog.remove_favorite(&code).await {
        info!(code = %code, "Favorite removed");
        Ok(format!("Removed {} from favorites", code))
    } else {
        Ok(format!("{} is not a favorite", code))
    }
}

/// Removes the country if it is a favorite, otherwise adds it.
pub async fn toggle(state: &AppState, code: &str) -> CommandResult {
    require_session(state).await?;
    let code = validate_country_code(code)?;

    let existing = state.catalog.read(|s| s.favorites().get(&code).cloned()).await;
    let country = match existing {
        Some(country) => country,
        None => resolve(state, &code).await?,
    };
    let name = country.common_name().to_string();

    if state.catalog.toggle_favorite(country).await {
        Ok(format!("Added {} to favorites", name))
    } else {
        Ok(format!("Removed {} from favorites", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_logged_out_is_refused() {
        let state = fixtures::state();

        for result in [
            add(&state, "CAN").await,
            remove(&state, "CAN").await,
            toggle(&state, "CAN").await,
        ] {
            let err = result.unwrap_err();
            assert_eq!(err.code, ErrorCode::NotAuthenticated);
            assert_eq!(err.message, "Please log in to add favorites");
        }
        assert!(state.catalog.read(|s| s.favorites().is_empty()).await);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let state = fixtures::logged_in_state().await;

        assert_eq!(add(&state, "can").await.unwrap(), "Added Canada to favorites");
        assert_eq!(
            add(&state, "CAN").await.unwrap(),
            "Canada is already a favorite"
        );
        add(&state, "FRA").await.unwrap();

        let out = list(&state).await.unwrap();
        assert!(out.starts_with("Favorites (2)"));
        let can = out.find("CAN").unwrap();
        let fra = out.find("FRA").unwrap();
        assert!(can < fra);
    }

    #[tokio::test]
    async fn test_remove_and_toggle() {
        let state = fixtures::logged_in_state().await;
        add(&state, "MEX").await.unwrap();

        assert_eq!(
            remove(&state, "MEX").await.unwrap(),
            "Removed MEX from favorites"
        );
        assert_eq!(remove(&state, "MEX").await.unwrap(), "MEX is not a favorite");

        assert_eq!(toggle(&state, "FRA").await.unwrap(), "Added France to favorites");
        assert_eq!(
            toggle(&state, "FRA").await.unwrap(),
            "Removed France from favorites"
        );
        assert_eq!(list(&state).await.unwrap(), "No favorites yet");
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let state = fixtures::logged_in_state().await;
        let err = add(&state, "XYZ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Country not found: XYZ");
    }
}
