//! # Item Outcomes
//!
//! The result of running one item validator over one item.

use serde::Serialize;
use serde_json::Value;

use crate::collection::Item;

/// Outcome of validating a single collection item.
///
/// `values` and `raw_values` are populated whether or not the item is
/// valid, so callers can inspect partial successes. `messages` and
/// `invalid_input` are empty for a valid item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemOutcome {
    /// Whether the item passed validation.
    pub valid: bool,
    /// Sanitized values produced by the validator.
    pub values: Item,
    /// Values as submitted.
    pub raw_values: Item,
    /// Messages keyed by field, each a map of failure code to message.
    pub messages: Item,
    /// Submitted values of the fields that failed.
    pub invalid_input: Item,
}

impl ItemOutcome {
    /// A valid outcome with the given sanitized and raw values.
    pub fn valid(values: Item, raw_values: Item) -> Self {
        Self {
            valid: true,
            values,
            raw_values,
            ..Self::default()
        }
    }

    /// An invalid outcome.
    pub fn invalid(values: Item, raw_values: Item, messages: Item, invalid_input: Item) -> Self {
        Self {
            valid: false,
            values,
            raw_values,
            messages,
            invalid_input,
        }
    }

    /// Record a failure for `field` under `code`, marking the outcome invalid.
    pub fn add_message(&mut self, field: &str, code: &str, message: impl Into<String>) {
        self.valid = false;
        let entry = self
            .messages
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(Item::new()));
        if let Value::Object(codes) = entry {
            codes.insert(code.to_string(), Value::String(message.into()));
        }
    }
}
