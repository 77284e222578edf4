//! # Item Keys
//!
//! An `ItemKey` identifies an item by its original position in the
//! submitted collection. Keys are carried verbatim into every aggregated
//! output: sparse or non-contiguous keys are never renumbered.
//!
//! Numeric object keys in canonical decimal form (`"0"`, `"17"`) are the
//! same key as the list index they spell; anything else (`"007"`, `"main"`)
//! is a name.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Original key of an item within a collection.
///
/// Ordering places all indices (numerically) before all names
/// (lexicographically).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    /// Position in a list, or a canonical numeric object key.
    Index(usize),
    /// Non-numeric object key.
    Name(String),
}

impl ItemKey {
    /// Parse an object key, mapping canonical decimal strings to `Index`.
    pub fn parse(raw: &str) -> Self {
        let canonical = raw == "0"
            || (!raw.is_empty()
                && !raw.starts_with('0')
                && raw.bytes().all(|b| b.is_ascii_digit()));
        if canonical {
            if let Ok(index) = raw.parse::<usize>() {
                return Self::Index(index);
            }
        }
        Self::Name(raw.to_string())
    }

    /// Returns the index if this key is positional.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for ItemKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<usize> for ItemKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ItemKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ItemKey {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl Serialize for ItemKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(i) => serializer.serialize_u64(*i as u64),
            Self::Name(name) => serializer.serialize_str(name),
        }
    }
}

struct ItemKeyVisitor;

impl<'de> Visitor<'de> for ItemKeyVisitor {
    type Value = ItemKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string item key")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemKey, E> {
        usize::try_from(v)
            .map(ItemKey::Index)
            .map_err(|_| E::custom(format!("item index {v} out of range")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemKey, E> {
        usize::try_from(v)
            .map(ItemKey::Index)
            .map_err(|_| E::custom(format!("item index {v} out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemKey, E> {
        Ok(ItemKey::parse(v))
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ItemKeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_canonical_numbers() {
        assert_eq!(ItemKey::parse("0"), ItemKey::Index(0));
        assert_eq!(ItemKey::parse("42"), ItemKey::Index(42));
    }

    #[test]
    fn test_parse_non_canonical_is_name() {
        assert_eq!(ItemKey::parse("007"), ItemKey::Name("007".into()));
        assert_eq!(ItemKey::parse("-1"), ItemKey::Name("-1".into()));
        assert_eq!(ItemKey::parse(""), ItemKey::Name(String::new()));
        assert_eq!(ItemKey::parse("main"), ItemKey::Name("main".into()));
    }

    #[test]
    fn test_ordering_indices_before_names() {
        let mut keys = vec![
            ItemKey::Name("a".into()),
            ItemKey::Index(10),
            ItemKey::Index(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![ItemKey::Index(2), ItemKey::Index(10), ItemKey::Name("a".into())]
        );
    }

    #[test]
    fn test_serialize_as_json_map_key() {
        let mut map = BTreeMap::new();
        map.insert(ItemKey::Index(5), 1);
        map.insert(ItemKey::Name("extra".into()), 2);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"5":1,"extra":2}"#);
    }

    #[test]
    fn test_deserialize_from_json_map_keys() {
        let map: BTreeMap<ItemKey, u8> = serde_json::from_str(r#"{"3":1,"x":2}"#).unwrap();
        assert_eq!(map.get(&ItemKey::Index(3)), Some(&1));
        assert_eq!(map.get(&ItemKey::Name("x".into())), Some(&2));
    }

    #[test]
    fn test_deserialize_from_integer() {
        let key: ItemKey = serde_json::from_str("7").unwrap();
        assert_eq!(key, ItemKey::Index(7));
        assert!(serde_json::from_str::<ItemKey>("-7").is_err());
    }
}
