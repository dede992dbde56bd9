//! # Client Configuration
//!
//! Configuration management for the Atlas client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ATLAS_API_URL=http://localhost:8080/v3.1                           │
//! │     ATLAS_DEBOUNCE_MS=250                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/atlas/atlas.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.atlas.atlas/atlas.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     restcountries.com v3.1, 500 ms debounce, 1000 ms login latency     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # atlas.toml
//! [api]
//! base_url = "https://restcountries.com/v3.1"
//! timeout_secs = 10
//!
//! [catalog]
//! discard_stale_responses = false
//! preview_limit = 20
//!
//! [search]
//! debounce_ms = 500
//!
//! [session]
//! simulated_latency_ms = 1000
//!
//! [storage]
//! path = "/tmp/atlas-storage.json"
//!
//! [display]
//! dark_mode = false
//! ```

use std::path::PathBuf;
use std::time::Duration;

use atlas_core::{StalePolicy, DEFAULT_API_BASE_URL, PREVIEW_LIMIT, SEARCH_DEBOUNCE_MS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

const CONFIG_FILE_NAME: &str = "atlas.toml";
const STORAGE_FILE_NAME: &str = "storage.json";

// =============================================================================
// API Settings
// =============================================================================

/// Remote data source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Ignore responses to requests that a newer request has superseded.
    /// Off by default: the last response to arrive wins.
    #[serde(default)]
    pub discard_stale_responses: bool,

    /// Number of countries shown by the overview.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

fn default_preview_limit() -> usize {
    PREVIEW_LIMIT
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            discard_stale_responses: false,
            preview_limit: default_preview_limit(),
        }
    }
}

// =============================================================================
// Search / Session / Storage / Display Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiet period before a typed term is applied (milliseconds).
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

fn default_debounce() -> u64 {
    SEARCH_DEBOUNCE_MS
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            debounce_ms: default_debounce(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Artificial delay before login / register resolve (milliseconds).
    #[serde(default = "default_latency")]
    pub simulated_latency_ms: u64,
}

fn default_latency() -> u64 {
    1000
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            simulated_latency_ms: default_latency(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Location of the key-value file. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Theme used when no preference has been stored yet.
    #[serde(default)]
    pub dark_mode: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AtlasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (atlas.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.catalog.preview_limit == 0 {
            return Err(ClientError::InvalidConfig(
                "preview_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `ATLAS_*` overrides read through `lookup`.
    ///
    /// Unparsable numeric or boolean values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ATLAS_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(value) = lookup("ATLAS_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid ATLAS_TIMEOUT_SECS"),
            }
        }

        if let Some(value) = lookup("ATLAS_DEBOUNCE_MS") {
            match value.parse() {
                Ok(ms) => {
                    debug!(debounce_ms = ms, "Overriding debounce from environment");
                    self.search.debounce_ms = ms;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid ATLAS_DEBOUNCE_MS"),
            }
        }

        if let Some(value) = lookup("ATLAS_DISCARD_STALE") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.catalog.discard_stale_responses = true,
                "0" | "false" | "no" | "off" => self.catalog.discard_stale_responses = false,
                _ => warn!(value = %value, "Ignoring invalid ATLAS_DISCARD_STALE"),
            }
        }

        if let Some(path) = lookup("ATLAS_STORAGE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("ATLAS_LATENCY_MS") {
            match value.parse() {
                Ok(ms) => self.session.simulated_latency_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid ATLAS_LATENCY_MS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "atlas", "atlas")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved location of the key-value storage file.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "atlas", "atlas")
                .map(|dirs| dirs.data_dir().join(STORAGE_FILE_NAME))
        })
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.catalog.discard_stale_responses {
            StalePolicy::DiscardStale
        } else {
            StalePolicy::LastResolvedWins
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.session.simulated_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AtlasConfig::default();
        assert_eq!(config.api.base_url, "https://restcountries.com/v3.1");
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.session.simulated_latency_ms, 1000);
        assert_eq!(config.catalog.preview_limit, 20);
        assert_eq!(config.stale_policy(), StalePolicy::LastResolvedWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AtlasConfig::default();

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "http://localhost:8080/v3.1".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AtlasConfig = toml::from_str("[search]\ndebounce_ms = 250\n").unwrap();
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.api, ApiSettings::default());
        assert_eq!(config.session.simulated_latency_ms, 1000);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ATLAS_API_URL", "http://localhost:9000"),
            ("ATLAS_DEBOUNCE_MS", "100"),
            ("ATLAS_DISCARD_STALE", "true"),
            ("ATLAS_STORAGE_PATH", "/tmp/atlas.json"),
            ("ATLAS_LATENCY_MS", "oops"),
        ]
        .into_iter()
        .collect();

        let mut config = AtlasConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.search.debounce_ms, 100);
        assert_eq!(config.stale_policy(), StalePolicy::DiscardStale);
        assert_eq!(config.storage_path(), Some(PathBuf::from("/tmp/atlas.json")));
        assert_eq!(config.session.simulated_latency_ms, 1000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("atlas.toml");

        let mut config = AtlasConfig::default();
        config.search.debounce_ms = 750;
        config.display.dark_mode = true;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[search]"));

        let loaded: AtlasConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = AtlasConfig::load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, ClientError::ConfigLoadFailed(_)));

        let fallback = AtlasConfig::load_or_default(Some(path));
        assert_eq!(fallback.catalog, CatalogSettings::default());
    }
}
