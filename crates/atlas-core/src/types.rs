//! # Domain Types
//!
//! The country record as served by the REST Countries v3.1 API.
//!
//! ## Record Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Country (external)                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CountryName    │   │    Country      │   │     Flags       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  common         │◄──│  name           │──►│  png?           │       │
//! │  │  official?      │   │  cca3 (key)     │   │  svg?           │       │
//! │  └─────────────────┘   │  region?        │   │  alt?           │       │
//! │                        │  subregion?     │   └─────────────────┘       │
//! │  ┌─────────────────┐   │  population?    │                             │
//! │  │   Currency      │◄──│  area?          │                             │
//! │  │  ─────────────  │   │  capital?[]     │                             │
//! │  │  name?          │   │  languages?     │                             │
//! │  │  symbol?        │   │  borders[]      │                             │
//! │  └─────────────────┘   │  timezones[]    │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Optional Fields
//! Only `name.common` and `cca3` are required. Everything else is an explicit
//! `Option` (or a defaulted list) because the API omits fields freely, e.g.
//! Antarctica has no capital and no subregion, and a `fields=` query can drop
//! whole sections. Each accessor below documents its absent-value fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Shown wherever an optional display field is absent.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Country Name
// =============================================================================

/// Common / official name pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CountryName {
    /// Everyday name, e.g. "Canada".
    pub common: String,

    /// Formal name, e.g. "Kingdom of Spain".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official: Option<String>,
}

// =============================================================================
// Flags
// =============================================================================

/// Flag image references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Flags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,

    /// Textual description of the flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

// =============================================================================
// Currency
// =============================================================================

/// A currency entry, keyed by ISO 4217 code in [`Country::currencies`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Currency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

// =============================================================================
// Maps
// =============================================================================

/// External map links. Only present on full records, since `/all` cannot
/// request them within its field cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Maps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_street_maps: Option<String>,
}

// =============================================================================
// Country
// =============================================================================

/// A country record. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Country {
    pub name: CountryName,

    /// ISO 3166-1 alpha-3 code; the identity of the record.
    #[serde(rename = "cca3")]
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,

    /// Area in square kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,

    /// Language code → language name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<BTreeMap<String, String>>,

    /// Currency code → currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currencies: Option<BTreeMap<String, Currency>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Flags>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<Maps>,

    /// Alpha-3 codes of neighbouring countries.
    #[serde(default)]
    pub borders: Vec<String>,

    #[serde(default)]
    pub timezones: Vec<String>,
}

impl Country {
    /// Creates a record carrying only the required fields.
    pub fn new(code: impl Into<String>, common_name: impl Into<String>) -> Self {
        Country {
            name: CountryName {
                common: common_name.into(),
                official: None,
            },
            code: code.into(),
            region: None,
            subregion: None,
            population: None,
            area: None,
            capital: None,
            languages: None,
            currencies: None,
            flags: None,
            maps: None,
            borders: Vec::new(),
            timezones: Vec::new(),
        }
    }

    pub fn with_official_name(mut self, official: impl Into<String>) -> Self {
        self.name.official = Some(official.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_subregion(mut self, subregion: impl Into<String>) -> Self {
        self.subregion = Some(subregion.into());
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.capital.get_or_insert_with(Vec::new).push(capital.into());
        self
    }

    pub fn with_google_maps(mut self, url: impl Into<String>) -> Self {
        self.maps.get_or_insert_with(Maps::default).google_maps = Some(url.into());
        self
    }

    // =========================================================================
    // Accessors with fallbacks
    // =========================================================================

    /// Common name.
    #[inline]
    pub fn common_name(&self) -> &str {
        &self.name.common
    }

    /// Official name, falling back to the common name.
    pub fn official_name(&self) -> &str {
        self.name.official.as_deref().unwrap_or(&self.name.common)
    }

    /// Capital entries; empty when the record has none.
    pub fn capitals(&self) -> &[String] {
        self.capital.as_deref().unwrap_or(&[])
    }

    /// First capital, or `N/A`.
    pub fn capital_display(&self) -> &str {
        self.capitals()
            .first()
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Population with thousands separators, or `N/A`.
    pub fn population_display(&self) -> String {
        self.population
            .map(format_thousands)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Area in km² with thousands separators, or `N/A`.
    pub fn area_display(&self) -> String {
        match self.area {
            Some(area) if area.is_finite() && area >= 0.0 => {
                format!("{} km²", format_thousands(area.round() as u64))
            }
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Language names joined with ", ", or `N/A`.
    pub fn languages_display(&self) -> String {
        match &self.languages {
            Some(languages) if !languages.is_empty() => languages
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Currencies as "Name (symbol)" joined with ", ", or `N/A`.
    pub fn currencies_display(&self) -> String {
        match &self.currencies {
            Some(currencies) if !currencies.is_empty() => currencies
                .iter()
                .map(|(code, currency)| {
                    let name = currency.name.as_deref().unwrap_or(code);
                    match currency.symbol.as_deref() {
                        Some(symbol) => format!("{} ({})", name, symbol),
                        None => name.to_string(),
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Preferred flag image: SVG first, then PNG.
    pub fn flag_url(&self) -> Option<&str> {
        let flags = self.flags.as_ref()?;
        flags.svg.as_deref().or(flags.png.as_deref())
    }

    pub fn google_maps_url(&self) -> Option<&str> {
        self.maps.as_ref()?.google_maps.as_deref()
    }

    /// Returns true if the code matches, ignoring ASCII case.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

/// Formats an integer with "," every three digits (en-US grouping).
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"[{"name":{"common":"Canada"},"cca3":"CAN"}]"#;
        let countries: Vec<Country> = serde_json::from_str(json).unwrap();
        assert_eq!(countries, vec![Country::new("CAN", "Canada")]);
        assert!(countries[0].borders.is_empty());
        assert!(countries[0].capitals().is_empty());
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "name": {"common": "Spain", "official": "Kingdom of Spain", "nativeName": {}},
            "cca3": "ESP",
            "cca2": "ES",
            "region": "Europe",
            "subregion": "Southern Europe",
            "population": 47351567,
            "area": 505992.0,
            "capital": ["Madrid"],
            "languages": {"spa": "Spanish"},
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "flags": {"png": "https://flagcdn.com/w320/es.png", "svg": "https://flagcdn.com/es.svg"},
            "maps": {"googleMaps": "https://goo.gl/maps/138FRrusNmxDRa5N7", "openStreetMaps": "https://www.openstreetmap.org/relation/1311341"},
            "borders": ["AND", "FRA", "GIB", "PRT", "MAR"],
            "timezones": ["UTC", "UTC+01:00"]
        }"#;
        let spain: Country = serde_json::from_str(json).unwrap();
        assert_eq!(spain.code, "ESP");
        assert_eq!(spain.official_name(), "Kingdom of Spain");
        assert_eq!(spain.capital_display(), "Madrid");
        assert_eq!(spain.population_display(), "47,351,567");
        assert_eq!(spain.area_display(), "505,992 km²");
        assert_eq!(spain.languages_display(), "Spanish");
        assert_eq!(spain.currencies_display(), "Euro (€)");
        assert_eq!(spain.flag_url(), Some("https://flagcdn.com/es.svg"));
        assert_eq!(
            spain.google_maps_url(),
            Some("https://goo.gl/maps/138FRrusNmxDRa5N7")
        );
        assert_eq!(spain.borders.len(), 5);
    }

    #[test]
    fn test_fallbacks_for_absent_fields() {
        let antarctica = Country::new("ATA", "Antarctica");
        assert_eq!(antarctica.official_name(), "Antarctica");
        assert_eq!(antarctica.capital_display(), NOT_AVAILABLE);
        assert_eq!(antarctica.population_display(), NOT_AVAILABLE);
        assert_eq!(antarctica.area_display(), NOT_AVAILABLE);
        assert_eq!(antarctica.languages_display(), NOT_AVAILABLE);
        assert_eq!(antarctica.currencies_display(), NOT_AVAILABLE);
        assert_eq!(antarctica.flag_url(), None);
        assert_eq!(antarctica.google_maps_url(), None);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(38_005_238), "38,005,238");
        assert_eq!(format_thousands(1_402_112_000), "1,402,112,000");
    }

    #[test]
    fn test_serialize_uses_api_field_names() {
        let value = serde_json::to_value(Country::new("CAN", "Canada")).unwrap();
        assert_eq!(value["cca3"], "CAN");
        assert_eq!(value["name"]["common"], "Canada");
        assert!(value.get("capital").is_none());
    }

    #[test]
    fn test_has_code_ignores_case() {
        let canada = Country::new("CAN", "Canada");
        assert!(canada.has_code("can"));
        assert!(!canada.has_code("MEX"));
    }
}
