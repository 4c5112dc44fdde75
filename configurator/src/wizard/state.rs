//! Selection State
//!
//! Map from [`SelectionKey`] to the chosen value, plus the free-text
//! bookkeeping fed by recognition:
//! - pending fallbacks: recognized text that matched no catalog option
//! - text markers: the `_text_fallback` shadow of a value accepted as free text

use serde::Serialize;
use shared::SelectionKey;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    values: BTreeMap<SelectionKey, String>,
    pending_fallbacks: BTreeMap<SelectionKey, String>,
    text_markers: BTreeSet<SelectionKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Plain choice of a group
    pub fn group_value(&self, group_key: &str) -> Option<&str> {
        self.values
            .get(&SelectionKey::GroupChoice(group_key.to_string()))
            .map(String::as_str)
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: SelectionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: &SelectionKey) -> Option<String> {
        self.values.remove(key)
    }

    /// Remove every sub-attribute key of a group (values and bookkeeping)
    pub fn remove_attributes(&mut self, group_key: &str) {
        let owned = |k: &SelectionKey| k.is_attribute() && k.group_key() == group_key;
        self.values.retain(|k, _| !owned(k));
        self.pending_fallbacks.retain(|k, _| !owned(k));
        self.text_markers.retain(|k| !owned(k));
    }

    /// Remove a group's choice and all of its sub-attribute keys
    pub fn remove_group(&mut self, group_key: &str) -> bool {
        let had_value = self.values.keys().any(|k| k.group_key() == group_key);
        self.values
            .remove(&SelectionKey::GroupChoice(group_key.to_string()));
        self.remove_attributes(group_key);
        had_value
    }

    /// Whether a group holds anything (choice or sub-attribute)
    pub fn touches_group(&self, group_key: &str) -> bool {
        self.values.keys().any(|k| k.group_key() == group_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SelectionKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ==================== Fallback bookkeeping ====================

    /// Recognized text awaiting a catalog choice (or acceptance as free text)
    pub fn pending_fallback(&self, key: &SelectionKey) -> Option<&str> {
        self.pending_fallbacks.get(key).map(String::as_str)
    }

    pub fn pending_fallbacks(&self) -> &BTreeMap<SelectionKey, String> {
        &self.pending_fallbacks
    }

    pub fn set_pending_fallback(&mut self, key: SelectionKey, text: impl Into<String>) {
        self.pending_fallbacks.insert(key, text.into());
    }

    pub fn clear_pending_fallbacks(&mut self) {
        self.pending_fallbacks.clear();
    }

    /// Whether the value under `key` is accepted free text
    pub fn is_text_fallback(&self, key: &SelectionKey) -> bool {
        self.text_markers.contains(key)
    }

    /// Flat `..:_text_fallback` marker keys currently set
    pub fn text_fallback_markers(&self) -> Vec<String> {
        self.text_markers
            .iter()
            .map(SelectionKey::text_fallback_marker)
            .collect()
    }

    /// Promote a pending fallback into the value, marking it as free text
    pub fn accept_pending_fallback(&mut self, key: &SelectionKey) -> Option<&str> {
        let text = self.pending_fallbacks.remove(key)?;
        self.text_markers.insert(key.clone());
        self.values.insert(key.clone(), text);
        self.get(key)
    }

    /// Drop the pending fallback and the text marker of one key
    pub fn clear_fallback(&mut self, key: &SelectionKey) {
        self.pending_fallbacks.remove(key);
        self.text_markers.remove(key);
    }
}
