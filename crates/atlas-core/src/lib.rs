//! # atlas-core: Pure Catalog Logic for Atlas
//!
//! This crate is the **heart** of the Atlas country explorer. It contains the
//! query engine, the catalog reducer and the session model as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Atlas Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (`atlas` binary)                    │   │
//! │  │    search, region, show, favorite, login, register, theme       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 atlas-client (I/O layer)                        │   │
//! │  │   CatalogStore ── HttpCountrySource ── SessionManager ── Storage │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atlas-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   query   │  │  catalog  │  │  session  │  │   │
//! │  │   │  Country  │  │ Criteria  │  │  Reducer  │  │   User    │  │   │
//! │  │   │   Name    │  │  filter   │  │  Status   │  │  Token    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │ favorites │  │validation │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Country record (REST Countries v3.1 shape) and display helpers
//! - [`query`] - Filter criteria and the pure filter engine
//! - [`catalog`] - Catalog state and its reducer
//! - [`favorites`] - Insertion-ordered favorites set keyed by country code
//! - [`session`] - Simulated session state and token format
//! - [`validation`] - Login / registration form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use atlas_core::query::{apply_filter, Criteria};
//! use atlas_core::Country;
//!
//! let countries = vec![Country::new("CAN", "Canada"), Country::new("MEX", "Mexico")];
//! let criteria = Criteria {
//!     search_term: Some("can".to_string()),
//!     ..Default::default()
//! };
//!
//! let filtered = apply_filter(&criteria, &countries);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].code, "CAN");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod query;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogEvent, CatalogState, DetailView, FetchKind, FetchStatus, StalePolicy};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use favorites::Favorites;
pub use query::Criteria;
pub use session::{SessionState, User};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base URL of the REST Countries API (v3.1).
pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Storage key holding the session token.
pub const TOKEN_STORAGE_KEY: &str = "userToken";

/// Storage key holding the dark-mode display preference.
pub const DARK_MODE_STORAGE_KEY: &str = "darkMode";

/// Quiet period before a typed search term is applied.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Minimum password length accepted by the login and registration forms.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of countries shown on the landing overview.
pub const PREVIEW_LIMIT: usize = 20;

/// Regions offered by the region browser.
pub const KNOWN_REGIONS: [&str; 5] = ["Africa", "Americas", "Asia", "Europe", "Oceania"];
