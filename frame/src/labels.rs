//! FILENAME: frame/src/labels.rs
//! Label sets - key/value annotations that distinguish same-named fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An unordered mapping from label key to label value.
///
/// Backed by a BTreeMap so iteration and serialization are always key-sorted:
/// two label sets holding the same pairs produce the same stable `key()`
/// regardless of the order the pairs were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Labels(BTreeMap::new())
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Labels(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Merges another label set into this one; on key conflict the other
    /// set's value wins.
    pub fn merge(&mut self, other: &Labels) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Stable serialized identity of this label set, used to group fields by
    /// `(name, labels)`. Key-sorted, never insertion-order sensitive.
    pub fn key(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=\"{}\"", key, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let mut a = Labels::new();
        a.insert("region".to_string(), "EU".to_string());
        a.insert("host".to_string(), "web-1".to_string());

        let mut b = Labels::new();
        b.insert("host".to_string(), "web-1".to_string());
        b.insert("region".to_string(), "EU".to_string());

        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), r#"{"host":"web-1","region":"EU"}"#);
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(Labels::new().key(), "{}");
    }

    #[test]
    fn test_merge_overwrites() {
        let mut a = Labels::from_pairs(&[("region", "EU"), ("host", "web-1")]);
        let b = Labels::from_pairs(&[("region", "US")]);
        a.merge(&b);

        assert_eq!(a.get("region"), Some("US"));
        assert_eq!(a.get("host"), Some("web-1"));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_display() {
        let labels = Labels::from_pairs(&[("region", "EU"), ("host", "web-1")]);
        assert_eq!(labels.to_string(), r#"{host="web-1", region="EU"}"#);
    }
}
