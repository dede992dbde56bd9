//! Fetch lifecycle notifications routed to the log.

use atlas_client::CatalogEventEmitter;
use atlas_core::{FetchKind, FetchStatus};
use tracing::{debug, warn};

pub struct TracingEmitter;

impl CatalogEventEmitter for TracingEmitter {
    fn emit_status(&self, kind: FetchKind, status: FetchStatus) {
        debug!(%kind, %status, "Catalog status changed");
    }

    fn emit_error(&self, kind: FetchKind, message: &str) {
        warn!(%kind, error = %message, "Catalog fetch failed");
    }
}
