//! # Country Source
//!
//! Where country records come from.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 REST Countries v3.1 (read-only, no auth)                │
//! │                                                                         │
//! │  GET {base}/all?fields=...        → [Country, ...]                      │
//! │  GET {base}/name/{name}           → [Country, ...]   (partial match)    │
//! │  GET {base}/region/{region}       → [Country, ...]                      │
//! │  GET {base}/alpha/{code}          → [Country]        (one element)      │
//! │                                                                         │
//! │  Failure mapping:                                                      │
//! │  • no response         → "Network Error"                               │
//! │  • non-2xx status      → "Request failed with status code N"           │
//! │  • body not JSON list  → "Invalid response from server: ..."           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`CountrySource`] is the seam between the catalog store and the network;
//! tests plug in an in-memory source instead of [`HttpCountrySource`].

use std::time::Duration;

use async_trait::async_trait;
use atlas_core::Country;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::AtlasConfig;
use crate::error::{ClientError, ClientResult};

/// Fields requested from `/all`. The live API refuses `/all` without a
/// field list and caps it at ten entries.
pub const ALL_FIELDS: &str =
    "name,cca3,capital,region,subregion,population,area,flags,languages,currencies";

// =============================================================================
// Source Trait
// =============================================================================

/// A provider of country collections.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_all(&self) -> ClientResult<Vec<Country>>;

    async fn fetch_by_name(&self, name: &str) -> ClientResult<Vec<Country>>;

    async fn fetch_by_region(&self, region: &str) -> ClientResult<Vec<Country>>;

    /// Returns a collection with at most one element.
    async fn fetch_by_code(&self, code: &str) -> ClientResult<Vec<Country>>;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// [`CountrySource`] backed by the REST Countries HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCountrySource {
    http: Client,
    base_url: Url,
}

impl HttpCountrySource {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &AtlasConfig) -> ClientResult<Self> {
        Self::new(&config.api.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> ClientResult<Vec<Country>> {
        debug!(url = %url, "GET");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed before a response");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Non-success status");
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json::<Vec<Country>>().await?)
    }
}

#[async_trait]
impl CountrySource for HttpCountrySource {
    async fn fetch_all(&self) -> ClientResult<Vec<Country>> {
        let mut url = self.endpoint(&["all"])?;
        url.query_pairs_mut().append_pair("fields", ALL_FIELDS);
        self.get(url).await
    }

    async fn fetch_by_name(&self, name: &str) -> ClientResult<Vec<Country>> {
        let url = self.endpoint(&["name", name])?;
        self.get(url).await
    }

    async fn fetch_by_region(&self, region: &str) -> ClientResult<Vec<Country>> {
        let url = self.endpoint(&["region", region])?;
        self.get(url).await
    }

    async fn fetch_by_code(&self, code: &str) -> ClientResult<Vec<Country>> {
        let url = self.endpoint(&["alpha", code])?;
        self.get(url).await
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// In-memory [`CountrySource`] serving a fixed list.
///
/// Mirrors the live API's matching rules closely enough for offline runs and
/// tests: name lookups are case-insensitive substring matches, region and code
/// lookups are case-insensitive equality, and an empty match is a 404.
#[derive(Debug, Clone)]
pub struct StaticCountrySource {
    countries: Vec<Country>,
    reachable: bool,
}

impl StaticCountrySource {
    pub fn new(countries: Vec<Country>) -> Self {
        Self {
            countries,
            reachable: true,
        }
    }

    /// A source whose every request fails with a network error.
    pub fn unreachable() -> Self {
        Self {
            countries: Vec::new(),
            reachable: false,
        }
    }

    fn serve(&self, pick: impl Fn(&Country) -> bool) -> ClientResult<Vec<Country>> {
        if !self.reachable {
            return Err(ClientError::Network("source unreachable".into()));
        }
        let matched: Vec<Country> = self.countries.iter().filter(|c| pick(c)).cloned().collect();
        if matched.is_empty() {
            return Err(ClientError::Status(404));
        }
        Ok(matched)
    }
}

#[async_trait]
impl CountrySource for StaticCountrySource {
    async fn fetch_all(&self) -> ClientResult<Vec<Country>> {
        if !self.reachable {
            return Err(ClientError::Network("source unreachable".into()));
        }
        Ok(self.countries.clone())
    }

    async fn fetch_by_name(&self, name: &str) -> ClientResult<Vec<Country>> {
        let needle = name.to_lowercase();
        self.serve(|c| {
            c.common_name().to_lowercase().contains(&needle)
                || c.official_name().to_lowercase().contains(&needle)
        })
    }

    async fn fetch_by_region(&self, region: &str) -> ClientResult<Vec<Country>> {
        self.serve(|c| {
            c.region
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(region))
        })
    }

    async fn fetch_by_code(&self, code: &str) -> ClientResult<Vec<Country>> {
        self.serve(|c| c.has_code(code))
    }
}
