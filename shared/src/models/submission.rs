//! Submission Model
//!
//! Ordered, human-labeled record handed to order processing.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Reserved key carrying the uploaded reference-image URL
pub const REFERENCE_IMAGE_KEY: &str = "_reference_image";

/// Insertion-ordered label -> value mapping
///
/// Serializes as a JSON object whose key order is the emission order, so
/// specification fields always precede add-on fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledOptions {
    entries: Vec<(String, String)>,
}

impl LabeledOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; a repeated label overwrites the value in place
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LabeledOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// What the submission sink receives
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Submission {
    pub total: f64,
    pub options: LabeledOptions,
}
