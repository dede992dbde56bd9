//! # atlas-client: I/O Layer for Atlas
//!
//! This crate wires the pure logic of `atlas-core` to the outside world: the
//! REST Countries API, a durable key-value file, timers and configuration.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Atlas Client Layer                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CatalogStore (async orchestrator)                │  │
//! │  │                                                                  │  │
//! │  │  Arc<RwLock<CatalogState>>, one reducer step per write lock      │  │
//! │  └───────────────┬──────────────────────────────────┬───────────────┘  │
//! │                  │                                  │                   │
//! │                  ▼                                  ▼                   │
//! │  ┌────────────────────────────┐    ┌────────────────────────────────┐  │
//! │  │ CountrySource (trait)      │    │ LiveSearch                     │  │
//! │  │                            │    │                                │  │
//! │  │ HttpCountrySource: reqwest │    │ Debouncer<String> (500 ms)     │  │
//! │  │ StaticCountrySource: fixed │    │ settled term → apply_filter    │  │
//! │  └────────────────────────────┘    └────────────────────────────────┘  │
//! │                                                                         │
//! │  ┌────────────────────────────┐    ┌────────────────────────────────┐  │
//! │  │ SessionManager             │    │ Preferences                    │  │
//! │  │ login / logout / register  │    │ darkMode flag                  │  │
//! │  └─────────────┬──────────────┘    └───────────────┬────────────────┘  │
//! │                └──────────────┬────────────────────┘                   │
//! │                               ▼                                         │
//! │                ┌────────────────────────────────┐                      │
//! │                │ KeyValueStore: File / Memory   │                      │
//! │                └────────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Client error types
//! - [`source`] - Country sources (HTTP and in-memory)
//! - [`store`] - Async catalog store
//! - [`session`] - Simulated session manager
//! - [`storage`] - Durable key-value storage
//! - [`preferences`] - Display preferences
//! - [`debounce`] - Generic debouncer
//! - [`search`] - Search-as-you-type
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use atlas_client::{AtlasConfig, CatalogStore, HttpCountrySource};
//!
//! let config = AtlasConfig::load_or_default(None);
//! let source = Arc::new(HttpCountrySource::from_config(&config)?);
//! let store = CatalogStore::new(source, config.stale_policy());
//!
//! store.fetch_all().await;
//! let state = store.snapshot().await;
//! println!("{} countries ({})", state.all_countries().len(), state.status());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod debounce;
pub mod error;
pub mod preferences;
pub mod search;
pub mod session;
pub mod source;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AtlasConfig;
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult};
pub use preferences::Preferences;
pub use search::{LiveSearch, ResultsListener};
pub use session::{SessionManager, REGISTRATION_SUCCESS};
pub use source::{CountrySource, HttpCountrySource, StaticCountrySource};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{CatalogEventEmitter, CatalogStore, NoOpEmitter};
