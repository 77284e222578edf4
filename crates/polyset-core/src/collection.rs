//! # Keyed Collections
//!
//! A `Collection` is the accepted form of a heterogeneous collection: an
//! ordered list of `(ItemKey, Item)` entries where every item is an
//! associative structure.
//!
//! ## Acceptance
//!
//! Conversion from an untyped JSON value is atomic. The entire input is
//! scanned before a `Collection` exists, so a single malformed item rejects
//! the whole input and nothing is stored.
//!
//! - JSON arrays yield keys `0..n` in array order.
//! - JSON objects yield their keys parsed by [`ItemKey::parse`], in the
//!   object's own order. `serde_json` is built with `preserve_order`, so
//!   that is the order of the source document.

use serde_json::{Map, Value};

use crate::error::{json_type_name, CollectionError};
use crate::key::ItemKey;
use crate::keyed::KeyedMap;

/// A single collection item: field name to value.
pub type Item = Map<String, Value>;

/// An ordered, keyed collection of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    entries: KeyedMap<Item>,
}

impl Collection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an untyped value as a collection.
    ///
    /// # Errors
    ///
    /// - [`CollectionError::InvalidCollectionType`] unless `value` is an
    ///   array or an object.
    /// - [`CollectionError::InvalidItemType`] if any item is not an object.
    pub fn from_value(value: Value) -> Result<Self, CollectionError> {
        let raw: Vec<(ItemKey, Value)> = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (ItemKey::Index(i), item))
                .collect(),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, item)| (ItemKey::parse(&k), item))
                .collect(),
            other => {
                return Err(CollectionError::InvalidCollectionType {
                    found: json_type_name(&other),
                })
            }
        };

        if let Some((key, item)) = raw.iter().find(|(_, item)| !item.is_object()) {
            return Err(CollectionError::InvalidItemType {
                key: key.clone(),
                found: json_type_name(item),
            });
        }

        let entries = raw
            .into_iter()
            .filter_map(|(key, item)| match item {
                Value::Object(map) => Some((key, map)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    /// Build a collection from typed entries, in the given order.
    ///
    /// A repeated key replaces the earlier item in place, keeping the
    /// position of its first occurrence.
    pub fn from_items<K, I>(items: I) -> Self
    where
        K: Into<ItemKey>,
        I: IntoIterator<Item = (K, Item)>,
    {
        let mut collection = Self::new();
        for (key, item) in items {
            collection.insert(key.into(), item);
        }
        collection
    }

    /// Insert or replace the item at `key`.
    pub fn insert(&mut self, key: ItemKey, item: Item) {
        self.entries.insert(key, item);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an item by key.
    pub fn get(&self, key: &ItemKey) -> Option<&Item> {
        self.entries.get(key)
    }

    /// Iterate over `(key, item)` pairs in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &Item)> {
        self.entries.iter()
    }

    /// Keys in collection order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.keys()
    }
}

impl TryFrom<Value> for Collection {
    type Error = CollectionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(v: Value) -> Item {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_array_keys_are_positions() {
        let c = Collection::from_value(json!([{"type": "a"}, {"type": "b"}])).unwrap();
        let keys: Vec<_> = c.keys().cloned().collect();
        assert_eq!(keys, vec![ItemKey::Index(0), ItemKey::Index(1)]);
    }

    #[test]
    fn test_object_sparse_keys_preserved() {
        let c = Collection::from_value(json!({"10": {"v": 1}, "2": {"v": 2}, "x": {"v": 3}}))
            .unwrap();
        let keys: Vec<_> = c.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![ItemKey::Index(10), ItemKey::Index(2), ItemKey::Name("x".into())]
        );
        assert_eq!(c.get(&ItemKey::Index(10)).unwrap()["v"], 1);
    }

    #[test]
    fn test_object_keeps_document_order() {
        let c = Collection::from_value(
            serde_json::from_str(
                r#"{"zeta": {"v": 1}, "5": {"v": 2}, "alpha": {"v": 3}, "1": {"v": 4}}"#,
            )
            .unwrap(),
        )
        .unwrap();
        let keys: Vec<String> = c.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["zeta", "5", "alpha", "1"]);
    }

    #[test]
    fn test_scalar_rejected() {
        let err = Collection::from_value(json!("nope")).unwrap_err();
        assert_eq!(err, CollectionError::InvalidCollectionType { found: "string" });
        assert!(Collection::from_value(Value::Null).is_err());
    }

    #[test]
    fn test_non_object_item_rejects_whole_input() {
        let err = Collection::from_value(json!([{"type": "a"}, 5, "x"])).unwrap_err();
        assert_eq!(
            err,
            CollectionError::InvalidItemType {
                key: ItemKey::Index(1),
                found: "number",
            }
        );
    }

    #[test]
    fn test_list_item_is_not_associative() {
        let err = Collection::from_value(json!([[1, 2]])).unwrap_err();
        assert!(matches!(err, CollectionError::InvalidItemType { found: "array", .. }));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(Collection::from_value(json!([])).unwrap().is_empty());
        assert!(Collection::from_value(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_from_items_replaces_duplicates_in_place() {
        let c = Collection::from_items(vec![
            (4usize, item(json!({"v": 1}))),
            (1usize, item(json!({"v": 2}))),
            (4usize, item(json!({"v": 3}))),
        ]);
        assert_eq!(c.len(), 2);
        let keys: Vec<_> = c.keys().cloned().collect();
        assert_eq!(keys, vec![ItemKey::Index(4), ItemKey::Index(1)]);
        assert_eq!(c.get(&ItemKey::Index(4)).unwrap()["v"], 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_item() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..4).prop_map(|m| {
            Value::Object(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
        })
    }

    proptest! {
        /// Arrays of objects are accepted with keys 0..n, in order.
        #[test]
        fn array_of_objects_keeps_positions(items in prop::collection::vec(json_item(), 0..12)) {
            let expected = items.clone();
            let c = Collection::from_value(Value::Array(items)).unwrap();
            prop_assert_eq!(c.len(), expected.len());
            for (i, (key, item)) in c.iter().enumerate() {
                prop_assert_eq!(key, &ItemKey::Index(i));
                prop_assert_eq!(&Value::Object(item.clone()), &expected[i]);
            }
        }

        /// A single scalar anywhere in the input rejects the whole input.
        #[test]
        fn one_scalar_rejects_everything(
            items in prop::collection::vec(json_item(), 0..8),
            pos in any::<prop::sample::Index>(),
            scalar in any::<i64>(),
        ) {
            let mut items = items;
            let at = pos.index(items.len() + 1);
            items.insert(at, Value::from(scalar));
            let err = Collection::from_value(Value::Array(items)).unwrap_err();
            prop_assert_eq!(
                err,
                CollectionError::InvalidItemType { key: ItemKey::Index(at), found: "number" }
            );
        }
    }
}
