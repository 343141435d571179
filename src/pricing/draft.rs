//! Pending edits for one editing session.
//!
//! # Data Flow
//! ```text
//! input change → record(path, raw, hint)      (no tree rebuild per keystroke)
//! submit       → commit(&live) → merged tree  (coerce + PathAccessor::set)
//! close        → clear()
//! ```
//!
//! The buffer is owned by exactly one `ConfigSession` and never outlives it.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::pricing::path::{self, FieldPath};
use crate::pricing::ConfigTree;

/// How a raw input value is coerced on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Number,
    Boolean,
    Text,
}

/// The value as the input produced it, before coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// One pending field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    pub path: FieldPath,
    pub raw: RawValue,
    pub hint: TypeHint,
}

impl EditEntry {
    /// Coerce the raw input into the value written on commit.
    pub fn coerced(&self) -> Value {
        match (self.hint, &self.raw) {
            (TypeHint::Number, RawValue::Text(text)) => parse_number(text),
            (TypeHint::Number, RawValue::Bool(b)) => Value::from(u8::from(*b)),
            (_, RawValue::Bool(b)) => Value::Bool(*b),
            (_, RawValue::Text(text)) => Value::String(text.clone()),
        }
    }
}

/// Empty input clears the field; unparsable input is written as `null`.
fn parse_number(text: &str) -> Value {
    let text = text.trim();
    if text.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => {
            tracing::warn!(raw = %text, "Discarding non-numeric input for number field");
            Value::Null
        }
    }
}

/// A recorded edit and when it was last written.
#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    entry: EditEntry,
}

/// Edit buffer keyed by field path. Last write per path wins.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    entries: BTreeMap<FieldPath, Pending>,
    next_seq: u64,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the pending value for `path`.
    ///
    /// Overwriting moves the edit to the end of the recording order.
    pub fn record(&mut self, path: impl Into<FieldPath>, raw: impl Into<RawValue>, hint: TypeHint) {
        let path = path.into();
        let entry = EditEntry {
            path: path.clone(),
            raw: raw.into(),
            hint,
        };
        tracing::trace!(path = %path, ?hint, "Draft edit recorded");
        self.next_seq += 1;
        self.entries.insert(
            path,
            Pending {
                seq: self.next_seq,
                entry,
            },
        );
    }

    /// Merge every pending edit onto a deep copy of `base`.
    ///
    /// Entries are applied in recording order: when one path is a prefix of
    /// another, the later edit decides the result.
    pub fn commit(&self, base: &ConfigTree) -> ConfigTree {
        let mut merged = base.clone();
        for entry in self.entries() {
            path::set(&mut merged, entry.path.as_str(), entry.coerced());
        }
        merged
    }

    /// The value a form should show for `path`: what a commit would write
    /// there, which is the baseline value when nothing touches it.
    pub fn display_value(&self, base: &ConfigTree, path: &str) -> Option<Value> {
        if self.is_empty() {
            return path::get(base, path).cloned();
        }
        path::get(&self.commit(base), path).cloned()
    }

    pub fn get(&self, path: &str) -> Option<&EditEntry> {
        self.entries.get(&FieldPath::from(path)).map(|p| &p.entry)
    }

    /// Pending edits in recording order.
    pub fn entries(&self) -> impl Iterator<Item = &EditEntry> {
        let mut pending: Vec<&Pending> = self.entries.values().collect();
        pending.sort_by_key(|p| p.seq);
        pending.into_iter().map(|p| &p.entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> ConfigTree {
        json!({
            "baseFare": 10,
            "nightCharges": { "enabled": false, "startHour": 22, "endHour": 6 },
            "label": "Economy"
        })
    }

    #[test]
    fn test_empty_commit_is_deep_copy() {
        let draft = DraftStore::new();
        let base = base();
        let mut merged = draft.commit(&base);
        assert_eq!(merged, base);

        // No aliasing: mutating the result leaves the base untouched.
        path::set(&mut merged, "nightCharges.startHour", json!(0));
        assert_eq!(path::get(&base, "nightCharges.startHour"), Some(&json!(22)));
    }

    #[test]
    fn test_commit_coerces_by_hint() {
        let mut draft = DraftStore::new();
        draft.record("baseFare", "12.5", TypeHint::Number);
        draft.record("nightCharges.startHour", "23", TypeHint::Number);
        draft.record("nightCharges.enabled", true, TypeHint::Boolean);
        draft.record("label", "Economy Plus", TypeHint::Text);

        let merged = draft.commit(&base());
        assert_eq!(
            merged,
            json!({
                "baseFare": 12.5,
                "nightCharges": { "enabled": true, "startHour": 23, "endHour": 6 },
                "label": "Economy Plus"
            })
        );
    }

    #[test]
    fn test_empty_number_becomes_null() {
        let mut draft = DraftStore::new();
        draft.record("baseFare", "", TypeHint::Number);
        draft.record("perKmRate", "abc", TypeHint::Number);
        let merged = draft.commit(&base());
        assert_eq!(merged["baseFare"], Value::Null);
        assert_eq!(merged["perKmRate"], Value::Null);
    }

    #[test]
    fn test_last_write_wins() {
        let mut draft = DraftStore::new();
        draft.record("baseFare", "11", TypeHint::Number);
        draft.record("baseFare", "15", TypeHint::Number);
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.commit(&base())["baseFare"], json!(15));
    }

    #[test]
    fn test_commit_is_deterministic() {
        let mut draft = DraftStore::new();
        draft.record("surge", "2", TypeHint::Number);
        draft.record("surge.enabled", true, TypeHint::Boolean);
        draft.record("waitingCharges.freeMinutes", "5", TypeHint::Number);

        let first = draft.commit(&base());
        let second = draft.commit(&base());
        assert_eq!(first, second);
        assert_eq!(first["surge"], json!({ "enabled": true }));
    }

    #[test]
    fn test_later_parent_edit_replaces_child_edit() {
        let mut draft = DraftStore::new();
        draft.record("surge.enabled", true, TypeHint::Boolean);
        draft.record("surge", "2", TypeHint::Number);

        let merged = draft.commit(&base());
        assert_eq!(merged["surge"], json!(2));
        assert_eq!(draft.display_value(&base(), "surge"), Some(json!(2)));
        assert_eq!(draft.display_value(&base(), "surge.enabled"), None);
    }

    #[test]
    fn test_rewrite_moves_edit_to_the_end() {
        let mut draft = DraftStore::new();
        draft.record("nightCharges", "", TypeHint::Number);
        draft.record("nightCharges.startHour", "20", TypeHint::Number);
        draft.record("nightCharges", "1", TypeHint::Number);

        let order: Vec<&str> = draft.entries().map(|e| e.path.as_str()).collect();
        assert_eq!(order, vec!["nightCharges.startHour", "nightCharges"]);
        assert_eq!(draft.commit(&base())["nightCharges"], json!(1));
    }

    #[test]
    fn test_display_value_prefers_draft() {
        let mut draft = DraftStore::new();
        let base = base();
        assert_eq!(draft.display_value(&base, "baseFare"), Some(json!(10)));

        draft.record("baseFare", "20", TypeHint::Number);
        assert_eq!(draft.display_value(&base, "baseFare"), Some(json!(20)));
        assert_eq!(draft.display_value(&base, "missing.path"), None);
    }

    #[test]
    fn test_clear() {
        let mut draft = DraftStore::new();
        draft.record("baseFare", "20", TypeHint::Number);
        assert!(!draft.is_empty());
        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.commit(&base()), base());
    }
}
