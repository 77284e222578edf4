//! # Collection Reports
//!
//! The per-run result of validating a collection. Each run builds a fresh
//! report; nothing is carried over between runs. Every per-item mapping
//! iterates in collection order.
//!
//! A report may be invalid with no message at all: a collection smaller
//! than the expected count downgrades validity silently. Callers must not
//! assume `messages` is non-empty whenever `is_valid()` is false.

use std::collections::BTreeSet;

use serde::Serialize;

use polyset_core::{Item, ItemKey, KeyedMap};

/// Aggregated outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub(crate) valid: bool,
    pub(crate) collection_messages: Item,
    pub(crate) values: KeyedMap<Item>,
    pub(crate) raw_values: KeyedMap<Item>,
    pub(crate) messages: KeyedMap<Item>,
    pub(crate) invalid_input: KeyedMap<Item>,
}

impl Default for CollectionReport {
    fn default() -> Self {
        Self {
            valid: true,
            collection_messages: Item::new(),
            values: KeyedMap::new(),
            raw_values: KeyedMap::new(),
            messages: KeyedMap::new(),
            invalid_input: KeyedMap::new(),
        }
    }
}

impl CollectionReport {
    /// Whether the run passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Messages about the collection as a whole, keyed by failure code.
    pub fn collection_messages(&self) -> &Item {
        &self.collection_messages
    }

    /// Sanitized values per item.
    pub fn values(&self) -> &KeyedMap<Item> {
        &self.values
    }

    /// Submitted values per item.
    pub fn raw_values(&self) -> &KeyedMap<Item> {
        &self.raw_values
    }

    /// Failure messages per item.
    pub fn messages(&self) -> &KeyedMap<Item> {
        &self.messages
    }

    /// Submitted values of failing fields, per item.
    pub fn invalid_input(&self) -> &KeyedMap<Item> {
        &self.invalid_input
    }

    /// Sanitized values of one item.
    pub fn value_at(&self, key: &ItemKey) -> Option<&Item> {
        self.values.get(key)
    }

    /// Failure messages of one item.
    pub fn messages_at(&self, key: &ItemKey) -> Option<&Item> {
        self.messages.get(key)
    }

    /// Reset the sanitized values and return the emptied mapping.
    pub fn clear_values(&mut self) -> &KeyedMap<Item> {
        self.values.clear();
        &self.values
    }

    /// Reset the raw values and return the emptied mapping.
    pub fn clear_raw_values(&mut self) -> &KeyedMap<Item> {
        self.raw_values.clear();
        &self.raw_values
    }
}

/// Why an item appears in an unrecognized-field report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unrecognized {
    /// The item has no discriminator field.
    MissingNameKey,
    /// No validator is registered for the item's discriminator.
    MissingFilter,
    /// Fields the item's validator does not know. Never empty.
    Fields(BTreeSet<String>),
}

/// Unrecognized-field report, keyed like the collection.
pub type UnrecognizedReport = KeyedMap<Unrecognized>;
