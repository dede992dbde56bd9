//! # Favorites
//!
//! The user's bookmarked countries.
//!
//! ## Invariants
//! - No two entries share a country code
//! - Entries keep the order in which they were added
//! - `add` of a present code and `remove` of an absent code are no-ops
//!
//! Whether the user is *allowed* to change favorites (they must be logged
//! in) is decided by the caller, not by this type.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Country;

/// Insertion-ordered set of countries keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Favorites(Vec<Country>);

impl Favorites {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a country unless its code is already present.
    ///
    /// ## Returns
    /// `true` if the country was added.
    pub fn add(&mut self, country: Country) -> bool {
        if self.contains(&country.code) {
            return false;
        }
        self.0.push(country);
        true
    }

    /// Removes the entry with `code`, if any.
    ///
    /// ## Returns
    /// `true` if an entry was removed.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c.code != code);
        self.0.len() != before
    }

    /// Returns true if a country with `code` is present.
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c.code == code)
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.0.iter().find(|c| c.code == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.0.iter()
    }

    /// Codes in insertion order.
    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.code.as_str()).collect()
    }

    pub fn as_slice(&self) -> &[Country] {
        &self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_favorites() -> impl Strategy<Value = Favorites> {
        prop::collection::vec("[A-Z]{3}", 0..10).prop_map(|codes| {
            let mut favorites = Favorites::new();
            for code in codes {
                favorites.add(Country::new(code.clone(), code));
            }
            favorites
        })
    }

    proptest! {
        #[test]
        fn add_then_remove_restores_membership(
            mut favorites in arb_favorites(),
            code in "[a-z]{3}",
        ) {
            // Lower-case codes never collide with the upper-case generated set.
            let before = favorites.clone();
            favorites.add(Country::new(code.clone(), "Somewhere"));
            favorites.remove(&code);
            prop_assert_eq!(favorites, before);
        }

        #[test]
        fn adding_present_country_changes_nothing(mut favorites in arb_favorites()) {
            let before = favorites.clone();
            let present: Vec<Country> = favorites.iter().cloned().collect();
            for country in present {
                favorites.add(country);
            }
            prop_assert_eq!(favorites, before);
        }
    }
}
