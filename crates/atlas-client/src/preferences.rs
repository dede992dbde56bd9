//! Display preferences persisted in durable storage.
//!
//! The dark-mode flag is stored under `darkMode` as the string `"true"` or
//! `"false"`. Any other stored value reads as light mode.

use std::sync::Arc;

use atlas_core::DARK_MODE_STORAGE_KEY;
use tracing::debug;

use crate::error::ClientResult;
use crate::storage::KeyValueStore;

pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
    default_dark_mode: bool,
}

impl Preferences {
    /// `default_dark_mode` applies only while nothing has been stored.
    pub fn new(storage: Arc<dyn KeyValueStore>, default_dark_mode: bool) -> Self {
        Self {
            storage,
            default_dark_mode,
        }
    }

    pub fn dark_mode(&self) -> ClientResult<bool> {
        Ok(match self.storage.get(DARK_MODE_STORAGE_KEY)? {
            Some(value) => value == "true",
            None => self.default_dark_mode,
        })
    }

    pub fn set_dark_mode(&self, enabled: bool) -> ClientResult<()> {
        debug!(dark_mode = enabled, "Saving display preference");
        self.storage
            .set(DARK_MODE_STORAGE_KEY, if enabled { "true" } else { "false" })
    }

    /// Flips the flag and returns the new value.
    pub fn toggle_dark_mode(&self) -> ClientResult<bool> {
        let enabled = !self.dark_mode()?;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_default_until_stored() {
        let storage = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(storage.clone(), true);
        assert!(prefs.dark_mode().unwrap());

        prefs.set_dark_mode(false).unwrap();
        assert!(!prefs.dark_mode().unwrap());
        assert_eq!(
            storage.get(DARK_MODE_STORAGE_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_toggle() {
        let storage = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(storage.clone(), false);

        assert!(prefs.toggle_dark_mode().unwrap());
        assert_eq!(
            storage.get(DARK_MODE_STORAGE_KEY).unwrap().as_deref(),
            Some("true")
        );
        assert!(!prefs.toggle_dark_mode().unwrap());
    }

    #[test]
    fn test_unexpected_value_reads_as_light() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(DARK_MODE_STORAGE_KEY, "yes please").unwrap();
        let prefs = Preferences::new(storage, true);
        assert!(!prefs.dark_mode().unwrap());
    }
}
