//! # Catalog State
//!
//! The country catalog and its reducer.
//!
//! ## Fetch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Shared status (all request kinds)                     │
//! │                                                                         │
//! │              FetchStarted                 FetchSucceeded                │
//! │   ┌──────┐ ──────────────► ┌─────────┐ ──────────────► ┌───────────┐   │
//! │   │ Idle │                 │ Loading │                 │ Succeeded │   │
//! │   └──────┘                 └─────────┘ ──────┐         └─────┬─────┘   │
//! │                                 ▲            │ FetchFailed   │         │
//! │                                 │            ▼               │         │
//! │                                 │       ┌────────┐           │         │
//! │                                 └───────│ Failed │◄──────────┘         │
//! │                        FetchStarted     └────────┘   (any new request) │
//! │                                                                         │
//! │  Payload on success:                                                   │
//! │  • All       → all_countries, filtered_countries (criteria re-applied) │
//! │  • ByName    → filtered_countries                                      │
//! │  • ByRegion  → filtered_countries                                      │
//! │  • ByCode    → selected_country = first element (or none)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overlapping Requests
//! All kinds share one `status`. With [`StalePolicy::LastResolvedWins`] (the
//! default) every completion is applied in the order it arrives, so a slow
//! superseded request can overwrite a newer one. [`StalePolicy::DiscardStale`]
//! drops completions whose request id is older than the latest one issued.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::favorites::Favorites;
use crate::query::{apply_filter, Criteria};
use crate::types::Country;

// =============================================================================
// Status / Kind / Policy
// =============================================================================

/// Lifecycle of the most recent remote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Succeeded => write!(f, "succeeded"),
            FetchStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The four remote request kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    All,
    ByName,
    ByRegion,
    ByCode,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::All => write!(f, "all"),
            FetchKind::ByName => write!(f, "by_name"),
            FetchKind::ByRegion => write!(f, "by_region"),
            FetchKind::ByCode => write!(f, "by_code"),
        }
    }
}

/// How completions of superseded requests are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Apply every completion as it arrives.
    #[default]
    LastResolvedWins,

    /// Ignore completions older than the latest issued request.
    DiscardStale,
}

/// Monotonic id attached to each issued request.
pub type RequestId = u64;

// =============================================================================
// Events
// =============================================================================

/// Everything that can change the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A request was issued.
    FetchStarted { kind: FetchKind, request: RequestId },

    /// A request returned a collection.
    FetchSucceeded {
        kind: FetchKind,
        request: RequestId,
        countries: Vec<Country>,
    },

    /// A request failed.
    FetchFailed {
        kind: FetchKind,
        request: RequestId,
        message: String,
    },

    /// Recompute the filtered view from the full list.
    FilterApplied(Criteria),

    /// Replace the filtered view directly.
    FilteredCountriesSet(Vec<Country>),

    FavoriteAdded(Country),

    /// Remove a favorite by country code.
    FavoriteRemoved(String),

    CountrySelected(Option<Country>),
}

// =============================================================================
// Detail View
// =============================================================================

/// What a country detail screen should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    Failed(&'a str),
    /// The lookup finished but nothing is selected.
    NotFound,
    Found(&'a Country),
}

// =============================================================================
// Catalog State
// =============================================================================

/// The catalog: fetched records, the derived view, selection and favorites.
///
/// ## Invariants
/// - `error` is `Some` only while `status` is `Failed`
/// - `all_countries` is only ever replaced wholesale
/// - `favorites` never holds two records with the same code
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    all_countries: Vec<Country>,
    filtered_countries: Vec<Country>,
    selected_country: Option<Country>,
    favorites: Favorites,
    status: FetchStatus,
    error: Option<String>,
    criteria: Criteria,
    last_fetch: Option<FetchKind>,
    #[serde(skip)]
    #[ts(skip)]
    latest_request: RequestId,
    #[serde(skip)]
    #[ts(skip)]
    stale_policy: StalePolicy,
}

impl CatalogState {
    /// Creates an empty catalog (idle, nothing fetched).
    pub fn new(stale_policy: StalePolicy) -> Self {
        CatalogState {
            stale_policy,
            ..Default::default()
        }
    }

    /// Applies one event and returns the next state.
    pub fn reduce(mut self, event: CatalogEvent) -> Self {
        match event {
            CatalogEvent::FetchStarted { kind, request } => {
                self.latest_request = self.latest_request.max(request);
                self.status = FetchStatus::Loading;
                self.error = None;
                self.last_fetch = Some(kind);
            }

            CatalogEvent::FetchSucceeded {
                kind,
                request,
                countries,
            } => {
                if self.is_stale(request) {
                    return self;
                }
                self.status = FetchStatus::Succeeded;
                self.error = None;
                match kind {
                    FetchKind::All => {
                        self.filtered_countries = apply_filter(&self.criteria, &countries);
                        self.all_countries = countries;
                    }
                    FetchKind::ByName | FetchKind::ByRegion => {
                        self.filtered_countries = countries;
                    }
                    FetchKind::ByCode => {
                        self.selected_country = countries.into_iter().next();
                    }
                }
            }

            CatalogEvent::FetchFailed {
                request, message, ..
            } => {
                if self.is_stale(request) {
                    return self;
                }
                self.status = FetchStatus::Failed;
                self.error = Some(message);
            }

            CatalogEvent::FilterApplied(criteria) => {
                self.filtered_countries = apply_filter(&criteria, &self.all_countries);
                self.criteria = criteria;
            }

            CatalogEvent::FilteredCountriesSet(countries) => {
                self.filtered_countries = countries;
            }

            CatalogEvent::FavoriteAdded(country) => {
                self.favorites.add(country);
            }

            CatalogEvent::FavoriteRemoved(code) => {
                self.favorites.remove(&code);
            }

            CatalogEvent::CountrySelected(country) => {
                self.selected_country = country;
            }
        }
        self
    }

    /// True if a completion for `request` would be ignored by [`Self::reduce`].
    pub fn is_stale(&self, request: RequestId) -> bool {
        self.stale_policy == StalePolicy::DiscardStale && request < self.latest_request
    }

    // =========================================================================
    // Read Model
    // =========================================================================

    pub fn all_countries(&self) -> &[Country] {
        &self.all_countries
    }

    pub fn filtered_countries(&self) -> &[Country] {
        &self.filtered_countries
    }

    pub fn selected_country(&self) -> Option<&Country> {
        self.selected_country.as_ref()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Criteria most recently applied with [`CatalogEvent::FilterApplied`].
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Kind of the most recently issued request.
    pub fn last_fetch(&self) -> Option<FetchKind> {
        self.last_fetch
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }

    /// Looks a country up in the full list by code (case-insensitive).
    pub fn find(&self, code: &str) -> Option<&Country> {
        self.all_countries.iter().find(|c| c.has_code(code))
    }

    /// Maps the current state onto the detail screen.
    pub fn detail_view(&self) -> DetailView<'_> {
        match (self.status, &self.selected_country) {
            (FetchStatus::Loading, _) => DetailView::Loading,
            (FetchStatus::Failed, _) => {
                DetailView::Failed(self.error.as_deref().unwrap_or_default())
            }
            (_, Some(country)) => DetailView::Found(country),
            (_, None) => DetailView::NotFound,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
