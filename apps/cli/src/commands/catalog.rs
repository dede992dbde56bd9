//! # Catalog Commands
//!
//! Browsing, searching and inspecting countries.
//!
//! ## Fetch Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► CatalogStore::fetch_* ──► status                           │
//! │                                          │                              │
//! │                       ┌──────────────────┼───────────────────┐          │
//! │                       ▼                  ▼                   ▼          │
//! │                  succeeded            failed         (by code only)     │
//! │                  render view      ApiError FETCH_FAILED   NotFound      │
//! │                                   with state.error        is a view,    │
//! │                                                           not an error  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use atlas_core::query::{available_subregions, preview as preview_slice, CriteriaForm};
use atlas_core::validation::validate_country_code;
use atlas_core::{Country, Criteria, DetailView, FetchStatus, KNOWN_REGIONS, NOT_AVAILABLE};
use tracing::debug;

use super::{country_table, CommandResult};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Helpers
// =============================================================================

/// Turns a failed fetch into an error carrying the catalog's message.
async fn check_fetch(state: &AppState) -> Result<(), ApiError> {
    let failure = state
        .catalog
        .read(|s| {
            (s.status() == FetchStatus::Failed)
                .then(|| s.error().unwrap_or_default().to_string())
        })
        .await;
    match failure {
        Some(message) => Err(ApiError::fetch_failed(message)),
        None => Ok(()),
    }
}

/// Fetches the full list unless it is already loaded.
pub(crate) async fn ensure_catalog(state: &AppState) -> Result<(), ApiError> {
    if state.catalog.read(|s| s.all_countries().is_empty()).await {
        debug!("Catalog empty, fetching all countries");
        state.catalog.fetch_all().await;
        check_fetch(state).await?;
    }
    Ok(())
}

/// Renders the filtered view with a heading.
async fn render_filtered(state: &AppState, heading: &str) -> String {
    state
        .catalog
        .read(|s| {
            let countries = s.filtered_countries();
            if countries.is_empty() {
                return format!("{}: no countries found", heading);
            }
            format!(
                "{} ({} countries)\n{}",
                heading,
                countries.len(),
                country_table(countries, s.favorites())
            )
        })
        .await
}

fn list_or_na(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

fn render_detail(country: &Country, is_favorite: bool) -> String {
    let rows = [
        ("Official name", country.official_name().to_string()),
        ("Code", country.code.clone()),
        (
            "Region",
            country.region.as_deref().unwrap_or(NOT_AVAILABLE).to_string(),
        ),
        (
            "Subregion",
            country.subregion.as_deref().unwrap_or(NOT_AVAILABLE).to_string(),
        ),
        ("Capital", list_or_na(country.capitals())),
        ("Population", country.population_display()),
        ("Area", country.area_display()),
        ("Languages", country.languages_display()),
        ("Currencies", country.currencies_display()),
        ("Borders", list_or_na(&country.borders)),
        ("Timezones", list_or_na(&country.timezones)),
        (
            "Flag",
            country.flag_url().unwrap_or(NOT_AVAILABLE).to_string(),
        ),
        (
            "Map",
            country.google_maps_url().unwrap_or(NOT_AVAILABLE).to_string(),
        ),
        ("Favorite", if is_favorite { "yes" } else { "no" }.to_string()),
    ];

    let mut out = country.common_name().to_string();
    for (label, value) in rows {
        out.push_str(&format!("\n  {:<14} {}", format!("{}:", label), value));
    }
    out
}

// =============================================================================
// Commands
// =============================================================================

/// Fetches every country and lists the filtered view.
///
/// Criteria applied earlier in the session still hold.
pub async fn list_all(state: &AppState) -> CommandResult {
    state.catalog.fetch_all().await;
    check_fetch(state).await?;
    Ok(render_filtered(state, "All countries").await)
}

/// Landing overview: the first countries of the full list.
pub async fn preview(state: &AppState) -> CommandResult {
    ensure_catalog(state).await?;
    let limit = state.config.catalog.preview_limit;

    Ok(state
        .catalog
        .read(|s| {
            let all = s.all_countries();
            let shown = preview_slice(all, limit);
            format!(
                "Showing {} of {} countries\n{}",
                shown.len(),
                all.len(),
                country_table(shown, s.favorites())
            )
        })
        .await)
}

/// Applies search criteria to the full list.
pub async fn search(state: &AppState, form: &CriteriaForm) -> CommandResult {
    ensure_catalog(state).await?;
    let criteria = Criteria::from_form(form);
    debug!(?criteria, "Applying search criteria");
    state.catalog.apply_filter(criteria).await;
    Ok(render_filtered(state, "Search results").await)
}

/// Prints the current filtered view without fetching.
pub async fn results(state: &AppState) -> CommandResult {
    Ok(render_filtered(state, "Current results").await)
}

/// The regions offered by the region browser.
pub fn regions() -> String {
    KNOWN_REGIONS.join("\n")
}

/// Subregions present in the loaded catalog for `region`.
pub async fn subregions(state: &AppState, region: &str) -> CommandResult {
    ensure_catalog(state).await?;
    let found = state
        .catalog
        .read(|s| available_subregions(s.all_countries(), region))
        .await;

    if found.is_empty() {
        return Ok(format!("No subregions found for {}", region));
    }
    Ok(found.join("\n"))
}

pub async fn by_region(state: &AppState, region: &str) -> CommandResult {
    state.catalog.fetch_by_region(region).await;
    check_fetch(state).await?;
    Ok(render_filtered(state, &format!("Countries in {}", region)).await)
}

pub async fn by_name(state: &AppState, name: &str) -> CommandResult {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Search text is required"));
    }
    state.catalog.fetch_by_name(name).await;
    check_fetch(state).await?;
    Ok(render_filtered(state, &format!("Countries matching \"{}\"", name)).await)
}

/// Fetches one country and renders the detail view.
///
/// ## Returns
/// - The detail text, or `Country not found` when the lookup came back empty
/// - `FETCH_FAILED` when the request failed
/// - `VALIDATION_ERROR` for a malformed code
pub async fn show(state: &AppState, code: &str, json: bool) -> CommandResult {
    let code = validate_country_code(code)?;
    state.catalog.fetch_by_code(&code).await;

    let rendered = state
        .catalog
        .read(|s| match s.detail_view() {
            DetailView::Loading => Ok("Loading...".to_string()),
            DetailView::Failed(message) => Err(ApiError::fetch_failed(message)),
            DetailView::NotFound => Ok("Country not found".to_string()),
            DetailView::Found(country) if json => serde_json::to_string_pretty(country)
                .map_err(|e| ApiError::internal(e.to_string())),
            DetailView::Found(country) => Ok(render_detail(
                country,
                s.favorites().contains(&country.code),
            )),
        })
        .await?;

    Ok(rendered)
}

/// One-screen summary of the catalog and session.
pub async fn status(state: &AppState) -> CommandResult {
    let catalog = state
        .catalog
        .read(|s| {
            let mut lines = vec![
                format!("Status:     {}", s.status()),
                format!("Countries:  {}", s.all_countries().len()),
                format!("Filtered:   {}", s.filtered_countries().len()),
                format!("Favorites:  {}", s.favorites().len()),
            ];
            if let Some(kind) = s.last_fetch() {
                lines.push(format!("Last fetch: {}", kind));
            }
            if let Some(error) = s.error() {
                lines.push(format!("Error:      {}", error));
            }
            if let Some(country) = s.selected_country() {
                lines.push(format!("Selected:   {} ({})", country.common_name(), country.code));
            }
            lines
        })
        .await;

    let session = state.session.snapshot().await;
    let user = session
        .user()
        .map(|u| u.username.clone())
        .unwrap_or_else(|| "not logged in".to_string());

    let mut lines = catalog;
    lines.push(format!("User:       {}", user));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_preview_counts() {
        let mut state = fixtures::state();
        state.config.catalog.preview_limit = 2;

        let out = preview(&state).await.unwrap();
        assert!(out.starts_with("Showing 2 of 4 countries"));
        assert!(out.contains("Canada"));
        assert!(!out.contains("France"));
    }

    #[tokio::test]
    async fn test_search_by_term_and_population() {
        let state = fixtures::state();

        let out = search(
            &state,
            &CriteriaForm {
                search_term: "can".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(out.starts_with("Search results (1 countries)"));
        assert!(out.contains("CAN"));

        let out = search(
            &state,
            &CriteriaForm {
                min_population: "100".to_string(),
                max_population: "50".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(out, "Search results: no countries found");
    }

    #[tokio::test]
    async fn test_list_all_reapplies_criteria() {
        let state = fixtures::state();
        search(
            &state,
            &CriteriaForm {
                region: "Europe".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let out = list_all(&state).await.unwrap();
        assert!(out.starts_with("All countries (1 countries)"));
        assert!(out.contains("FRA"));
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_message() {
        let state = fixtures::offline_state();

        let err = list_all(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert_eq!(err.message, "Network Error");

        let out = status(&state).await.unwrap();
        assert!(out.contains("Status:     failed"));
        assert!(out.contains("Error:      Network Error"));
    }

    #[tokio::test]
    async fn test_subregions() {
        let state = fixtures::state();
        assert_eq!(
            subregions(&state, "Americas").await.unwrap(),
            "North America"
        );
        assert_eq!(
            subregions(&state, "Antarctic").await.unwrap(),
            "No subregions found for Antarctic"
        );
    }

    #[tokio::test]
    async fn test_by_region_and_name() {
        let state = fixtures::state();

        let out = by_region(&state, "Americas").await.unwrap();
        assert!(out.starts_with("Countries in Americas (2 countries)"));

        let out = by_name(&state, "republic").await.unwrap();
        assert!(out.contains("FRA"));
        assert!(!out.contains("MEX"));

        let err = by_name(&state, "zzz").await.unwrap_err();
        assert_eq!(err.message, "Request failed with status code 404");

        let err = by_name(&state, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_show_detail() {
        let state = fixtures::state();

        let out = show(&state, "can", false).await.unwrap();
        assert!(out.starts_with("Canada"));
        assert!(out.contains("Population:    38,005,238"));
        assert!(out.contains("Area:          9,984,670 km²"));
        assert!(out.contains("Languages:     N/A"));
        assert!(out.contains("Map:           https://goo.gl/maps/jmEVLugreeqiZXxbA"));
        assert!(out.contains("Favorite:      no"));

        let out = show(&state, "ATA", false).await.unwrap();
        assert!(out.contains("Capital:       N/A"));
        assert!(out.contains("Population:    N/A"));
        assert!(out.contains("Map:           N/A"));
    }

    #[tokio::test]
    async fn test_show_json() {
        let state = fixtures::state();
        let out = show(&state, "FRA", true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["cca3"], "FRA");
        assert_eq!(value["name"]["common"], "France");
    }

    #[tokio::test]
    async fn test_show_rejects_bad_code() {
        let state = fixtures::state();
        let err = show(&state, "!!", false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = show(&state, "XYZ", false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FetchFailed);
    }

    #[test]
    fn test_regions_lists_known() {
        assert_eq!(regions(), "Africa\nAmericas\nAsia\nEurope\nOceania");
    }
}
