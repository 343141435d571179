//! Dot-path addressing over configuration trees.
//!
//! # Design Decisions
//! - Every segment is an object key; numeric-looking segments never index arrays
//! - Reads never fail, a missing or non-object intermediate yields `None`
//! - Writes create containers on the way down and overwrite scalars and arrays
//!   that sit where a container is needed

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::pricing::ConfigTree;

/// A dot-separated address into a configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Prepend `prefix` (itself a dot path, may be empty).
    pub fn prefixed(&self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('.');
        if prefix.is_empty() {
            self.clone()
        } else {
            Self(format!("{}.{}", prefix, self.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Read the value at `path`, or `None` if any segment is missing.
pub fn get<'a>(root: &'a ConfigTree, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Callers pass a working copy; the loaded baseline is never handed to `set`.
pub fn set(root: &mut ConfigTree, path: &str, value: Value) {
    if let Value::Object(map) = make_object(root) {
        set_in(map, path, value);
    }
}

fn set_in(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            if let Value::Object(child) = make_object(child) {
                set_in(child, rest, value);
            }
        }
    }
}

/// Replace `value` with an empty object unless it already is one.
fn make_object(value: &mut Value) -> &mut Value {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value
}
