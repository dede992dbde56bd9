//! # Catalog Store
//!
//! Async orchestration around the pure catalog reducer.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CatalogStore::fetch_*                            │
//! │                                                                         │
//! │  1. allocate request id (monotonic)                                    │
//! │  2. dispatch FetchStarted          ──► status = loading, error cleared │
//! │  3. await CountrySource            (only suspension point)             │
//! │  4. dispatch FetchSucceeded        ──► payload stored                  │
//! │     or FetchFailed { message }     ──► status = failed                 │
//! │                                                                         │
//! │  Every dispatch takes the write lock once, so transitions are applied  │
//! │  one at a time in arrival order. Failures end here: callers read the   │
//! │  outcome from a snapshot, never from an Err.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atlas_core::catalog::RequestId;
use atlas_core::{CatalogEvent, CatalogState, Country, Criteria, FetchKind, FetchStatus, StalePolicy};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::ClientResult;
use crate::source::CountrySource;

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Receives fetch lifecycle notifications (a UI spinner, a log line).
pub trait CatalogEventEmitter: Send + Sync {
    fn emit_status(&self, kind: FetchKind, status: FetchStatus);

    fn emit_error(&self, kind: FetchKind, message: &str);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl CatalogEventEmitter for NoOpEmitter {
    fn emit_status(&self, _kind: FetchKind, _status: FetchStatus) {}
    fn emit_error(&self, _kind: FetchKind, _message: &str) {}
}

// =============================================================================
// Catalog Store
// =============================================================================

pub struct CatalogStore {
    source: Arc<dyn CountrySource>,
    state: Arc<RwLock<CatalogState>>,
    next_request: AtomicU64,
    emitter: Arc<dyn CatalogEventEmitter>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CountrySource>, policy: StalePolicy) -> Self {
        Self::with_emitter(source, policy, Arc::new(NoOpEmitter))
    }

    pub fn with_emitter(
        source: Arc<dyn CountrySource>,
        policy: StalePolicy,
        emitter: Arc<dyn CatalogEventEmitter>,
    ) -> Self {
        CatalogStore {
            source,
            state: Arc::new(RwLock::new(CatalogState::new(policy))),
            next_request: AtomicU64::new(0),
            emitter,
        }
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> CatalogState {
        self.state.read().await.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub async fn read<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        f(&*self.state.read().await)
    }

    pub async fn status(&self) -> FetchStatus {
        self.state.read().await.status()
    }

    /// Applies one event under the write lock.
    pub async fn dispatch(&self, event: CatalogEvent) {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        *state = current.reduce(event);
    }

    // =========================================================================
    // Remote Fetches
    // =========================================================================

    pub async fn fetch_all(&self) {
        info!("Fetching all countries");
        self.run(FetchKind::All, self.source.fetch_all()).await;
    }

    pub async fn fetch_by_name(&self, name: &str) {
        info!(name = %name, "Fetching countries by name");
        self.run(FetchKind::ByName, self.source.fetch_by_name(name)).await;
    }

    pub async fn fetch_by_region(&self, region: &str) {
        info!(region = %region, "Fetching countries by region");
        self.run(FetchKind::ByRegion, self.source.fetch_by_region(region))
            .await;
    }

    pub async fn fetch_by_code(&self, code: &str) {
        info!(code = %code, "Fetching country by code");
        self.run(FetchKind::ByCode, self.source.fetch_by_code(code)).await;
    }

    async fn run<F>(&self, kind: FetchKind, request: F)
    where
        F: Future<Output = ClientResult<Vec<Country>>>,
    {
        let id: RequestId = self.next_request.fetch_add(1, Ordering::SeqCst) + 1;

        self.dispatch(CatalogEvent::FetchStarted { kind, request: id })
            .await;
        self.emitter.emit_status(kind, FetchStatus::Loading);

        match request.await {
            Ok(countries) => {
                debug!(%kind, request = id, count = countries.len(), "Fetch succeeded");
                let event = CatalogEvent::FetchSucceeded {
                    kind,
                    request: id,
                    countries,
                };
                if self.complete(id, event).await {
                    self.emitter.emit_status(kind, FetchStatus::Succeeded);
                }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(%kind, request = id, error = %message, "Fetch failed");
                let event = CatalogEvent::FetchFailed {
                    kind,
                    request: id,
                    message: message.clone(),
                };
                if self.complete(id, event).await {
                    self.emitter.emit_error(kind, &message);
                }
            }
        }
    }

    /// Applies a completion unless the reducer would discard it as stale.
    /// Returns whether the state changed.
    async fn complete(&self, request: RequestId, event: CatalogEvent) -> bool {
        let mut state = self.state.write().await;
        if state.is_stale(request) {
            debug!(request, "Discarded superseded completion");
            return false;
        }
        let current = std::mem::take(&mut *state);
        *state = current.reduce(event);
        true
    }

    // =========================================================================
    // Local Actions
    // =========================================================================

    /// Recomputes the filtered view from the full list.
    pub async fn apply_filter(&self, criteria: Criteria) {
        debug!(?criteria, "Applying filter");
        self.dispatch(CatalogEvent::FilterApplied(criteria)).await;
    }

    pub async fn set_filtered_countries(&self, countries: Vec<Country>) {
        self.dispatch(CatalogEvent::FilteredCountriesSet(countries))
            .await;
    }

    pub async fn select_country(&self, country: Option<Country>) {
        self.dispatch(CatalogEvent::CountrySelected(country)).await;
    }

    /// Adds a favorite. Returns false if it was already present.
    pub async fn add_favorite(&self, country: Country) -> bool {
        let mut state = self.state.write().await;
        if state.favorites().contains(&country.code) {
            return false;
        }
        let current = std::mem::take(&mut *state);
        *state = current.reduce(CatalogEvent::FavoriteAdded(country));
        true
    }

    /// Removes a favorite. Returns false if it was not present.
    pub async fn remove_favorite(&self, code: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.favorites().contains(code) {
            return false;
        }
        let current = std::mem::take(&mut *state);
        *state = current.reduce(CatalogEvent::FavoriteRemoved(code.to_string()));
        true
    }

    /// Adds the country if absent, removes it if present.
    ///
    /// ## Returns
    /// Whether the country is a favorite afterwards.
    pub async fn toggle_favorite(&self, country: Country) -> bool {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        let (next, now_favorite) = if current.favorites().contains(&country.code) {
            (current.reduce(CatalogEvent::FavoriteRemoved(country.code)), false)
        } else {
            (current.reduce(CatalogEvent::FavoriteAdded(country)), true)
        };
        *state = next;
        now_favorite
    }
}
