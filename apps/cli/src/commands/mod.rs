//! # Commands Module
//!
//! Every action the CLI exposes, one async function per command.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (shared rendering)
//! ├── catalog.rs      ◄─── all, preview, search, region, name, show, status
//! ├── favorites.rs    ◄─── favorites, favorite add/remove/toggle
//! ├── session.rs      ◄─── login, logout, register, whoami
//! └── preferences.rs  ◄─── theme
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  argv / shell line ──► clap ──► Command::Show { code }                  │
//! │                                        │                                │
//! │                                        ▼                                │
//! │  async fn show(state: &AppState, code: &str, json: bool)                │
//! │      -> Result<String, ApiError>                                        │
//! │                                        │                                │
//! │                     ┌──────────────────┴──────────────┐                 │
//! │                     ▼                                 ▼                 │
//! │              Ok(text) → stdout              Err(e) → stderr, exit 1     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands return rendered text rather than printing, so tests can assert
//! on the output directly.

pub mod catalog;
pub mod favorites;
pub mod preferences;
pub mod session;

use atlas_core::{Country, Favorites, NOT_AVAILABLE};

use crate::error::ApiError;

/// What every command returns.
pub type CommandResult = Result<String, ApiError>;

/// One table row: favorite marker, code, name, region, population.
pub(crate) fn country_line(country: &Country, favorites: &Favorites) -> String {
    let marker = if favorites.contains(&country.code) { '*' } else { ' ' };
    format!(
        "{} {:<3}  {:<36} {:<10} {:>15}",
        marker,
        country.code,
        country.common_name(),
        country.region.as_deref().unwrap_or(NOT_AVAILABLE),
        country.population_display(),
    )
}

pub(crate) fn country_table(countries: &[Country], favorites: &Favorites) -> String {
    countries
        .iter()
        .map(|c| country_line(c, favorites))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Test Fixtures
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_line_marks_favorites() {
        let canada = Country::new("CAN", "Canada").with_population(38_005_238);
        let mut favorites = Favorites::new();

        let line = country_line(&canada, &favorites);
        assert!(line.starts_with("  CAN"));
        assert!(line.contains("N/A"));
        assert!(line.ends_with("38,005,238"));

        favorites.add(canada.clone());
        assert!(country_line(&canada, &favorites).starts_with("* CAN"));
    }
}
