//! Search-as-you-type on top of the catalog store.
//!
//! Keystrokes go to [`LiveSearch::input`]. Once the text has been stable for
//! the debounce interval, the settled term replaces the search term of the
//! store's current criteria (region and numeric bounds are kept) and the
//! filtered view is recomputed. The term is applied as typed; only an empty
//! box clears it.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::debounce::Debouncer;
use crate::store::CatalogStore;

/// Called with the settled term and the number of matching countries.
pub type ResultsListener = Arc<dyn Fn(&str, usize) + Send + Sync>;

pub struct LiveSearch {
    debouncer: Debouncer<String>,
}

impl LiveSearch {
    pub fn with_listener(
        store: Arc<CatalogStore>,
        delay: Duration,
        listener: ResultsListener,
    ) -> Self {
        let debouncer = Debouncer::spawn(delay, move |term: String| {
            let store = store.clone();
            let listener = listener.clone();
            async move {
                let mut criteria = store.read(|s| s.criteria().clone()).await;
                criteria.search_term = (!term.is_empty()).then(|| term.clone());

                debug!(term = %term, "Search term settled");
                store.apply_filter(criteria).await;

                let matches = store.read(|s| s.filtered_countries().len()).await;
                listener(&term, matches);
            }
        });

        Self { debouncer }
    }

    /// Records the current contents of the search box.
    pub fn input(&self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }
}
