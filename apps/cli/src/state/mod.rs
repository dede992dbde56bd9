//! # State Module
//!
//! Application state shared by every CLI command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  │  built once per process (one-shot command or shell session)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────────┐            │
//! │  │ CatalogStore │  │ SessionManager │  │   Preferences    │            │
//! │  │              │  │                │  │                  │            │
//! │  │ Arc, shared  │  │ userToken in   │  │ darkMode in      │            │
//! │  │ with search  │  │ storage        │  │ storage          │            │
//! │  └──────────────┘  └────────────────┘  └──────────────────┘            │
//! │                              │                  │                       │
//! │                              └────────┬─────────┘                       │
//! │                                       ▼                                 │
//! │                         Arc<dyn KeyValueStore>                          │
//! │                         (FileStore or MemoryStore)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod emitter;

pub use emitter::TracingEmitter;

use std::sync::Arc;

use atlas_client::{
    AtlasConfig, CatalogStore, ClientResult, CountrySource, FileStore, HttpCountrySource,
    KeyValueStore, LiveSearch, MemoryStore, Preferences, ResultsListener, SessionManager,
};
use tracing::{info, warn};

/// What startup recovered from durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub username: Option<String>,
    pub dark_mode: bool,
}

pub struct AppState {
    pub config: AtlasConfig,
    pub catalog: Arc<CatalogStore>,
    pub session: SessionManager,
    pub preferences: Preferences,
}

impl AppState {
    /// Wires the state from explicit parts. Tests pass a
    /// `StaticCountrySource` and a `MemoryStore`.
    pub fn new(
        config: AtlasConfig,
        source: Arc<dyn CountrySource>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let catalog = Arc::new(CatalogStore::with_emitter(
            source,
            config.stale_policy(),
            Arc::new(TracingEmitter),
        ));
        let session = SessionManager::new(storage.clone(), config.simulated_latency());
        let preferences = Preferences::new(storage, config.display.dark_mode);

        AppState {
            config,
            catalog,
            session,
            preferences,
        }
    }

    /// Builds the production state: HTTP source plus file-backed storage,
    /// or in-memory storage when `ephemeral` is set.
    pub fn from_config(config: AtlasConfig, ephemeral: bool) -> ClientResult<Self> {
        let source = Arc::new(HttpCountrySource::from_config(&config)?);
        info!(base_url = %source.base_url(), "Country source ready");

        let storage: Arc<dyn KeyValueStore> = match (ephemeral, config.storage_path()) {
            (false, Some(path)) => Arc::new(FileStore::open(path)?),
            (false, None) => {
                warn!("No data directory available, session will not be persisted");
                Arc::new(MemoryStore::new())
            }
            (true, _) => Arc::new(MemoryStore::new()),
        };

        Ok(Self::new(config, source, storage))
    }

    /// Reads the stored session token and display preference. Unreadable
    /// values are logged and treated as absent.
    pub async fn restore(&self) -> Restored {
        if let Err(e) = self.session.rehydrate().await {
            warn!(error = %e, "Could not restore session");
        }
        let username = self
            .session
            .snapshot()
            .await
            .user()
            .map(|user| user.username.clone());

        let dark_mode = self.preferences.dark_mode().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read display preference");
            self.config.display.dark_mode
        });

        info!(user = ?username, dark_mode, "Restored local state");
        Restored {
            username,
            dark_mode,
        }
    }

    /// Search-as-you-type bound to this state's catalog.
    pub fn live_search(&self, listener: ResultsListener) -> LiveSearch {
        LiveSearch::with_listener(self.catalog.clone(), self.config.debounce(), listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::{DARK_MODE_STORAGE_KEY, TOKEN_STORAGE_KEY};

    #[tokio::test]
    async fn test_ephemeral_state_starts_empty() {
        let mut config = AtlasConfig::default();
        config.display.dark_mode = true;

        let state = AppState::from_config(config, true).unwrap();
        assert!(state.preferences.dark_mode().unwrap());
        assert!(!state.session.is_authenticated().await);
        assert!(state.catalog.read(|s| s.all_countries().is_empty()).await);
    }

    #[tokio::test]
    async fn test_restore_reads_token_and_dark_mode() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(DARK_MODE_STORAGE_KEY, "true").unwrap();
        storage
            .set(TOKEN_STORAGE_KEY, "alice:3f2b8c1d9e0a4b7c8d6e5f4a3b2c1d0e")
            .unwrap();

        let state = AppState::new(
            AtlasConfig::default(),
            Arc::new(atlas_client::StaticCountrySource::new(Vec::new())),
            storage.clone(),
        );
        let restored = state.restore().await;
        assert_eq!(restored.username.as_deref(), Some("alice"));
        assert!(restored.dark_mode);

        storage.set(TOKEN_STORAGE_KEY, "garbage").unwrap();
        storage.set(DARK_MODE_STORAGE_KEY, "false").unwrap();
        let state = AppState::new(
            AtlasConfig::default(),
            Arc::new(atlas_client::StaticCountrySource::new(Vec::new())),
            storage,
        );
        let restored = state.restore().await;
        assert_eq!(restored.username, None);
        assert!(!restored.dark_mode);
    }

    #[test]
    fn test_preferences_use_given_storage() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(DARK_MODE_STORAGE_KEY, "true").unwrap();

        let state = AppState::new(
            AtlasConfig::default(),
            Arc::new(atlas_client::StaticCountrySource::new(Vec::new())),
            storage,
        );
        assert!(state.preferences.dark_mode().unwrap());
    }
}
