// SPDX-License-Identifier: MIT OR Apache-2.0

//! An ordered key/value mapping.
//!
//! [`Fields`] is used both for the entries of a context frame and for the
//! extra fields of a [`LogRecord`](crate::LogRecord).  Keys are kept sorted,
//! so rendering is deterministic:
//!
//! ```
//! use logaware::Fields;
//!
//! let fields = Fields::new().with("user", "bob").with("id", 20);
//! assert_eq!(fields.to_string(), r#"{"id":20, "user":"bob"}"#);
//! ```

use crate::value::{ContextValue, IntoFieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::Display;
use std::io;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, ContextValue>);

impl Fields {
    pub const fn new() -> Self {
        Fields(BTreeMap::new())
    }

    /// Builder form of [`insert`](Self::insert).  `None` values are skipped.
    pub fn with(mut self, key: impl Into<String>, value: impl IntoFieldValue) -> Self {
        if let Some(value) = value.into_field_value() {
            self.0.insert(key.into(), value);
        }
        self
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Inserts only when `key` is not already present.  Returns whether the value was stored.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: ContextValue) -> bool {
        match self.0.entry(key.into()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(v) => {
                v.insert(value);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ContextValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copies every entry of `other` into `self`.  On collision `other` wins.
    pub fn overlay(&mut self, other: &Fields) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Drops entries whose value is an empty string.
    pub fn retain_non_empty(&mut self) {
        self.0.retain(|_, v| !v.is_empty());
    }

    /// Renders the fields as a compact JSON object with sorted keys.
    pub fn to_json(&self) -> String {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        // Writing plain strings and primitives into a Vec cannot fail, except
        // for non-finite floats which serde_json renders as null anyway.
        if self.serialize(&mut ser).is_err() {
            return "{}".to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| "{}".to_string())
    }
}

/// serde_json formatter that separates members with `", "`.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
}

impl Display for Fields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<ContextValue>, const N: usize> From<[(K, V); N]> for Fields {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<BTreeMap<String, ContextValue>> for Fields {
    fn from(map: BTreeMap<String, ContextValue>) -> Self {
        Fields(map)
    }
}

impl IntoIterator for Fields {
    type Item = (String, ContextValue);
    type IntoIter = btree_map::IntoIter<String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a ContextValue);
    type IntoIter = btree_map::Iter<'a, String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_with_spaced_separators() {
        let fields = Fields::from([("user", "bob")]).with("version", 1.1);
        assert_eq!(fields.to_json(), r#"{"user":"bob", "version":1.1}"#);
    }

    #[test]
    fn renders_unicode_unescaped() {
        let fields = Fields::new().with("name", "bŌŌk").with("count", 100);
        assert_eq!(fields.to_string(), r#"{"count":100, "name":"bŌŌk"}"#);
    }

    #[test]
    fn overlay_prefers_other() {
        let mut base = Fields::new().with("a", 1).with("b", 2);
        base.overlay(&Fields::new().with("a", 3));
        assert_eq!(base.get("a"), Some(&ContextValue::Int(3)));
        assert_eq!(base.get("b"), Some(&ContextValue::Int(2)));
    }

    #[test]
    fn insert_if_absent_keeps_existing() {
        let mut fields = Fields::new().with("user_id", "explicit");
        assert!(!fields.insert_if_absent("user_id", "ctx".into()));
        assert!(fields.insert_if_absent("request_id", "r1".into()));
        assert_eq!(fields.get("user_id").and_then(|v| v.as_str()), Some("explicit"));
    }

    #[test]
    fn with_skips_none() {
        let fields = Fields::new().with("nothing", None::<&str>).with("user", "foo");
        assert_eq!(fields.len(), 1);
        assert!(!fields.contains_key("nothing"));
    }

    #[test]
    fn empty_renders_as_empty_object() {
        assert_eq!(Fields::new().to_json(), "{}");
    }
}
