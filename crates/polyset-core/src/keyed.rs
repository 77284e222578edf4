//! # Keyed Maps
//!
//! `KeyedMap` holds values under [`ItemKey`]s in insertion order, with
//! constant-time lookup by key. Collections and every per-item aggregation
//! use it so that iteration always follows the original collection order.

use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::key::ItemKey;

/// Insertion-ordered map from [`ItemKey`] to `V`.
///
/// Re-inserting an existing key replaces its value in place; the key keeps
/// the position of its first insertion.
#[derive(Clone)]
pub struct KeyedMap<V> {
    entries: Vec<(ItemKey, V)>,
    positions: HashMap<ItemKey, usize>,
}

impl<V> KeyedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Insert `value` at `key`, returning the value it replaced.
    pub fn insert(&mut self, key: ItemKey, value: V) -> Option<V> {
        match self.positions.get(&key) {
            Some(&at) => Some(std::mem::replace(&mut self.entries[at].1, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &ItemKey) -> Option<&V> {
        self.positions.get(key).map(|&at| &self.entries[at].1)
    }

    pub fn contains_key(&self, key: &ItemKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal when both hold the same entries in the same order.
impl<V: PartialEq> PartialEq for KeyedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for KeyedMap<V> {}

impl<V: fmt::Debug> fmt::Debug for KeyedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> FromIterator<(ItemKey, V)> for KeyedMap<V> {
    fn from_iter<I: IntoIterator<Item = (ItemKey, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> IntoIterator for KeyedMap<V> {
    type Item = (ItemKey, V);
    type IntoIter = std::vec::IntoIter<(ItemKey, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Serialize> Serialize for KeyedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_in_insertion_order() {
        let map: KeyedMap<u8> = vec![
            (ItemKey::Name("zeta".into()), 1),
            (ItemKey::Index(5), 2),
            (ItemKey::Name("alpha".into()), 3),
            (ItemKey::Index(1), 4),
        ]
        .into_iter()
        .collect();
        let keys: Vec<String> = map.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["zeta", "5", "alpha", "1"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut map = KeyedMap::new();
        assert_eq!(map.insert(ItemKey::Index(4), "a"), None);
        map.insert(ItemKey::Index(1), "b");
        assert_eq!(map.insert(ItemKey::Index(4), "c"), Some("a"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&ItemKey::Index(4)), Some(&"c"));
        assert_eq!(map.keys().next(), Some(&ItemKey::Index(4)));
    }

    #[test]
    fn test_clear_resets_lookup() {
        let mut map = KeyedMap::new();
        map.insert(ItemKey::Index(0), 1);
        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains_key(&ItemKey::Index(0)));
        map.insert(ItemKey::Index(7), 2);
        assert_eq!(map.get(&ItemKey::Index(7)), Some(&2));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab: KeyedMap<u8> = vec![(ItemKey::Index(0), 1), (ItemKey::Index(1), 2)]
            .into_iter()
            .collect();
        let ba: KeyedMap<u8> = vec![(ItemKey::Index(1), 2), (ItemKey::Index(0), 1)]
            .into_iter()
            .collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let map: KeyedMap<u8> = vec![(ItemKey::Name("b".into()), 1), (ItemKey::Index(0), 2)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":1,"0":2}"#);
    }
}
