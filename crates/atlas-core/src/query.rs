//! # Query Engine
//!
//! Pure filtering of the country catalog.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      apply_filter(criteria, all)                        │
//! │                                                                         │
//! │  all_countries ──► text ──► region ──► subregion ──► population ──►    │
//! │                    match    ==         ==            [min, max]         │
//! │                                                                         │
//! │                ──► area ──► filtered_countries (same relative order)    │
//! │                    [min, max]                                           │
//! │                                                                         │
//! │  • Every stage is skipped when its criterion is unset                   │
//! │  • Stages are AND-combined                                              │
//! │  • No I/O, no allocation beyond the output vector                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Form Input
//! The search screen hands over raw text: select boxes carry sentinel labels
//! ("All Regions") and numeric boxes may contain anything. [`CriteriaForm`]
//! captures that input and [`Criteria::from_form`] turns it into criteria,
//! dropping whatever does not parse.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Country;

/// Label of the "no region constraint" option.
pub const ALL_REGIONS: &str = "All Regions";

/// Label of the "no subregion constraint" option.
pub const ALL_SUBREGIONS: &str = "All Subregions";

// =============================================================================
// Criteria
// =============================================================================

/// Filter criteria. Every field is optional; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    /// Case-insensitive substring matched against common name, official name
    /// and capital cities.
    pub search_term: Option<String>,

    /// Exact, case-sensitive region.
    pub region: Option<String>,

    /// Exact, case-sensitive subregion.
    pub subregion: Option<String>,

    /// Inclusive lower population bound. Negative bounds are kept as typed.
    pub min_population: Option<i64>,

    /// Inclusive upper population bound.
    pub max_population: Option<i64>,

    /// Inclusive lower area bound (km²).
    pub min_area: Option<f64>,

    /// Inclusive upper area bound (km²).
    pub max_area: Option<f64>,
}

impl Criteria {
    /// Returns true if no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.search_term.as_deref().map_or(true, str::is_empty)
            && self.region.is_none()
            && self.subregion.is_none()
            && self.min_population.is_none()
            && self.max_population.is_none()
            && self.active_min_area().is_none()
            && self.active_max_area().is_none()
    }

    /// Builds criteria from raw form input.
    ///
    /// ## Rules
    /// - Empty search text is unconstrained
    /// - `All Regions` / `All Subregions` and blank selections are unconstrained
    /// - Population bounds take the leading integer, area bounds the leading decimal
    /// - Input with no leading number, or a non-finite area, is unconstrained
    pub fn from_form(form: &CriteriaForm) -> Self {
        Criteria {
            search_term: non_empty(&form.search_term).map(str::to_string),
            region: selection(&form.region, ALL_REGIONS),
            subregion: selection(&form.subregion, ALL_SUBREGIONS),
            min_population: parse_population(&form.min_population),
            max_population: parse_population(&form.max_population),
            min_area: parse_area(&form.min_area),
            max_area: parse_area(&form.max_area),
        }
    }

    /// Tests a single record against every active criterion.
    pub fn matches(&self, country: &Country) -> bool {
        self.matches_text(country)
            && self.matches_region(country)
            && self.matches_subregion(country)
            && self.matches_population(country)
            && self.matches_area(country)
    }

    fn matches_text(&self, country: &Country) -> bool {
        let term = match self.search_term.as_deref() {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };

        let contains = |field: &str| field.to_lowercase().contains(&term);

        contains(&country.name.common)
            || country.name.official.as_deref().map_or(false, contains)
            || country.capitals().iter().any(|capital| contains(capital))
    }

    fn matches_region(&self, country: &Country) -> bool {
        match &self.region {
            Some(region) => country.region.as_ref() == Some(region),
            None => true,
        }
    }

    fn matches_subregion(&self, country: &Country) -> bool {
        match &self.subregion {
            Some(subregion) => country.subregion.as_ref() == Some(subregion),
            None => true,
        }
    }

    fn matches_population(&self, country: &Country) -> bool {
        if self.min_population.is_none() && self.max_population.is_none() {
            return true;
        }
        // An absent population fails any active bound.
        let Some(population) = country.population else {
            return false;
        };
        let population = i128::from(population);
        self.min_population
            .map_or(true, |min| population >= i128::from(min))
            && self
                .max_population
                .map_or(true, |max| population <= i128::from(max))
    }

    fn matches_area(&self, country: &Country) -> bool {
        let (min, max) = (self.active_min_area(), self.active_max_area());
        if min.is_none() && max.is_none() {
            return true;
        }
        let Some(area) = country.area else {
            return false;
        };
        min.map_or(true, |min| area >= min) && max.map_or(true, |max| area <= max)
    }

    fn active_min_area(&self) -> Option<f64> {
        self.min_area.filter(|v| v.is_finite())
    }

    fn active_max_area(&self) -> Option<f64> {
        self.max_area.filter(|v| v.is_finite())
    }
}

// =============================================================================
// Raw Form Input
// =============================================================================

/// Raw search-screen input, exactly as typed or selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaForm {
    pub search_term: String,
    pub region: String,
    pub subregion: String,
    pub min_population: String,
    pub max_population: String,
    pub min_area: String,
    pub max_area: String,
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn selection(value: &str, sentinel: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == sentinel {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reads the leading integer the way a browser's `parseInt` reads form
/// input: `"1000.5"` is 1000, `"-1"` is -1, `"1e3"` is 1 and `"lots"` is no
/// bound. Out-of-range values saturate.
fn parse_population(value: &str) -> Option<i64> {
    let value = value.trim();
    let sign = usize::from(value.starts_with(|c: char| c == '+' || c == '-'));
    let digits = leading_digits(&value.as_bytes()[sign..]);
    if digits == 0 {
        return None;
    }

    let prefix = &value[..sign + digits];
    match prefix.parse::<i64>() {
        Ok(population) => Some(population),
        Err(_) if prefix.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

/// Reads the leading decimal the way `parseFloat` does: `"2500.5 km2"` is
/// 2500.5 and `"1e3"` is 1000. Non-finite results are dropped.
fn parse_area(value: &str) -> Option<f64> {
    let value = value.trim();
    let bytes = value.as_bytes();

    let mut end = usize::from(value.starts_with(|c: char| c == '+' || c == '-'));
    let whole = leading_digits(&bytes[end..]);
    end += whole;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = leading_digits(&bytes[end + 1..]);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let digits = leading_digits(&bytes[exponent.min(bytes.len())..]);
        if digits > 0 {
            end = exponent + digits;
        }
    }

    value[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// =============================================================================
// Filter Operations
// =============================================================================

/// Applies `criteria` to `countries`, preserving relative order.
///
/// ## Example
/// ```rust
/// use atlas_core::query::{apply_filter, Criteria};
/// use atlas_core::Country;
///
/// let countries = vec![
///     Country::new("CAN", "Canada").with_population(38_000_000),
///     Country::new("ISL", "Iceland").with_population(366_000),
/// ];
/// let criteria = Criteria {
///     min_population: Some(1_000_000),
///     ..Default::default()
/// };
/// let result = apply_filter(&criteria, &countries);
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].code, "CAN");
/// ```
pub fn apply_filter(criteria: &Criteria, countries: &[Country]) -> Vec<Country> {
    countries
        .iter()
        .filter(|country| criteria.matches(country))
        .cloned()
        .collect()
}

/// Distinct, non-empty regions in first-seen order.
pub fn available_regions(countries: &[Country]) -> Vec<String> {
    distinct(countries.iter().filter_map(|c| c.region.as_deref()))
}

/// Distinct, non-empty subregions of `region` in first-seen order.
pub fn available_subregions(countries: &[Country], region: &str) -> Vec<String> {
    distinct(
        countries
            .iter()
            .filter(|c| c.region.as_deref() == Some(region))
            .filter_map(|c| c.subregion.as_deref()),
    )
}

/// The first `limit` records.
pub fn preview(countries: &[Country], limit: usize) -> &[Country] {
    &countries[..countries.len().min(limit)]
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.filter(|v| !v.is_empty()) {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_country() -> impl Strategy<Value = Country> {
        (
            "[A-Z]{3}",
            "[A-Za-z ]{1,12}",
            prop::option::of(prop_oneof![
                Just("Africa".to_string()),
                Just("Americas".to_string()),
                Just("Europe".to_string()),
            ]),
            prop::option::of(0u64..2_000_000_000),
            prop::option::of(0.0f64..20_000_000.0),
            prop::option::of(prop::collection::vec("[A-Za-z]{1,10}", 0..3)),
        )
            .prop_map(|(code, name, region, population, area, capital)| {
                let mut country = Country::new(code, name);
                country.region = region;
                country.population = population;
                country.area = area;
                country.capital = capital;
                country
            })
    }

    fn arb_criteria() -> impl Strategy<Value = Criteria> {
        (
            prop::option::of("[a-z]{0,3}"),
            prop::option::of(prop_oneof![
                Just("Africa".to_string()),
                Just("Europe".to_string()),
            ]),
            prop::option::of(-1_000i64..2_000_000_000),
            prop::option::of(-1_000i64..2_000_000_000),
            prop::option::of(0.0f64..20_000_000.0),
            prop::option::of(0.0f64..20_000_000.0),
        )
            .prop_map(
                |(search_term, region, min_population, max_population, min_area, max_area)| {
                    Criteria {
                        search_term,
                        region,
                        subregion: None,
                        min_population,
                        max_population,
                        min_area,
                        max_area,
                    }
                },
            )
    }

    /// True if `sub` appears in `full` in the same relative order.
    fn is_subsequence(sub: &[Country], full: &[Country]) -> bool {
        let mut rest = full.iter();
        sub.iter().all(|item| rest.any(|candidate| candidate == item))
    }

    proptest! {
        #[test]
        fn filter_output_is_ordered_subsequence(
            countries in prop::collection::vec(arb_country(), 0..20),
            criteria in arb_criteria(),
        ) {
            let result = apply_filter(&criteria, &countries);
            prop_assert!(is_subsequence(&result, &countries));
        }

        #[test]
        fn filter_is_idempotent(
            countries in prop::collection::vec(arb_country(), 0..20),
            criteria in arb_criteria(),
        ) {
            let once = apply_filter(&criteria, &countries);
            let twice = apply_filter(&criteria, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
