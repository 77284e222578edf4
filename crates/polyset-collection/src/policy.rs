//! # Collection Policy
//!
//! Policy flags set once on a collection validator and applied to every
//! run. Deserializable so they can live in a configuration document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use polyset_core::{ItemKey, ValidationGroup};

/// Per-item validation groups, keyed like the collection.
pub type ValidationGroups = BTreeMap<ItemKey, ValidationGroup>;

/// How a collection validator treats its edge cases.
///
/// All flags default to off: a missing discriminator or an unmapped one is
/// skipped silently, and an empty collection is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionPolicy {
    /// An item without the discriminator field invalidates the run.
    pub name_key_missing_invalid: bool,
    /// An item whose discriminator has no registered validator invalidates
    /// the run.
    pub filter_missing_invalid: bool,
    /// The collection must not be empty.
    pub required: bool,
    /// Minimum number of items. `None` and `Some(0)` mean "the actual size".
    pub expected_count: Option<usize>,
}

impl CollectionPolicy {
    /// The count a collection of `actual` items is checked against.
    pub fn effective_count(&self, actual: usize) -> usize {
        match self.expected_count {
            Some(n) if n > 0 => n,
            _ => actual,
        }
    }

    /// Returns a copy with `required` set.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Returns a copy with `expected_count` set.
    pub fn expected_count(mut self, count: usize) -> Self {
        self.expected_count = Some(count);
        self
    }

    /// Returns a copy with `name_key_missing_invalid` set.
    pub fn name_key_missing_invalid(mut self, invalid: bool) -> Self {
        self.name_key_missing_invalid = invalid;
        self
    }

    /// Returns a copy with `filter_missing_invalid` set.
    pub fn filter_missing_invalid(mut self, invalid: bool) -> Self {
        self.filter_missing_invalid = invalid;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_count_defaults_to_actual() {
        let policy = CollectionPolicy::default();
        assert_eq!(policy.effective_count(0), 0);
        assert_eq!(policy.effective_count(4), 4);
    }

    #[test]
    fn test_zero_expected_count_means_actual() {
        let policy = CollectionPolicy::default().expected_count(0);
        assert_eq!(policy.effective_count(3), 3);
    }

    #[test]
    fn test_explicit_expected_count() {
        let policy = CollectionPolicy::default().expected_count(5);
        assert_eq!(policy.effective_count(2), 5);
    }

    #[test]
    fn test_deserialize_partial() {
        let policy: CollectionPolicy =
            serde_json::from_str(r#"{"required": true, "expected_count": 2}"#).unwrap();
        assert!(policy.required);
        assert_eq!(policy.expected_count, Some(2));
        assert!(!policy.name_key_missing_invalid);
        assert!(!policy.filter_missing_invalid);
    }
}
