//! Selection keys
//!
//! The wizard keeps one map from [`SelectionKey`] to the chosen value. A key is
//! either a plain group choice or a sub-attribute of a group; step-1 groups and
//! add-on groups address their sub-attributes through different variants so the
//! two can never collide.
//!
//! The flat string form (`group`, `group:attr`, `group:ca:attr`) is only used at
//! the edges (submission payloads, UI bindings) and round-trips through
//! [`SelectionKey::parse`] and `Display`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Infix marking an add-on ("custom attribute") sub-attribute in the flat form
const CUSTOM_ATTR_INFIX: &str = "ca";

/// Suffix of the shadow key marking an accepted free-text value
pub const TEXT_FALLBACK_SUFFIX: &str = "_text_fallback";

/// Key into the selection state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionKey {
    /// `groupKey` -> item id
    GroupChoice(String),
    /// `groupKey:attrId` -> value (step-1 advanced option)
    StepOneAttribute(String, String),
    /// `groupKey:ca:attrId` -> value (later-step custom attribute)
    AddOnAttribute(String, String),
}

impl SelectionKey {
    /// Key for a plain group choice
    pub fn group(group_key: impl Into<String>) -> Self {
        Self::GroupChoice(group_key.into())
    }

    /// Key for a sub-attribute; the step decides which variant is used
    pub fn attribute(group_key: impl Into<String>, attr_id: impl Into<String>, step: u32) -> Self {
        if step == 1 {
            Self::StepOneAttribute(group_key.into(), attr_id.into())
        } else {
            Self::AddOnAttribute(group_key.into(), attr_id.into())
        }
    }

    /// Group key this selection belongs to
    pub fn group_key(&self) -> &str {
        match self {
            Self::GroupChoice(g) | Self::StepOneAttribute(g, _) | Self::AddOnAttribute(g, _) => g,
        }
    }

    /// Sub-attribute id, if this is an attribute key
    pub fn attr_id(&self) -> Option<&str> {
        match self {
            Self::GroupChoice(_) => None,
            Self::StepOneAttribute(_, a) | Self::AddOnAttribute(_, a) => Some(a),
        }
    }

    pub fn is_attribute(&self) -> bool {
        !matches!(self, Self::GroupChoice(_))
    }

    /// Flat form of the companion `_text_fallback` marker
    pub fn text_fallback_marker(&self) -> String {
        format!("{}:{}", self, TEXT_FALLBACK_SUFFIX)
    }

    /// Parse the flat string form
    ///
    /// Returns `None` for empty segments and for `_text_fallback` marker keys,
    /// which are internal bookkeeping rather than selections.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) || parts.last() == Some(&TEXT_FALLBACK_SUFFIX) {
            return None;
        }
        match parts.as_slice() {
            [group] => Some(Self::GroupChoice(group.to_string())),
            [group, attr] => Some(Self::StepOneAttribute(group.to_string(), attr.to_string())),
            [group, infix, attr] if *infix == CUSTOM_ATTR_INFIX => {
                Some(Self::AddOnAttribute(group.to_string(), attr.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupChoice(g) => write!(f, "{}", g),
            Self::StepOneAttribute(g, a) => write!(f, "{}:{}", g, a),
            Self::AddOnAttribute(g, a) => write!(f, "{}:{}:{}", g, CUSTOM_ATTR_INFIX, a),
        }
    }
}

impl Serialize for SelectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SelectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid selection key: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_variant_follows_step() {
        assert_eq!(
            SelectionKey::attribute("case", "material", 1),
            SelectionKey::StepOneAttribute("case".into(), "material".into())
        );
        assert_eq!(
            SelectionKey::attribute("strap", "length", 3),
            SelectionKey::AddOnAttribute("strap".into(), "length".into())
        );
    }

    #[test]
    fn test_flat_form() {
        assert_eq!(SelectionKey::group("case").to_string(), "case");
        assert_eq!(SelectionKey::attribute("case", "m", 1).to_string(), "case:m");
        assert_eq!(SelectionKey::attribute("strap", "l", 2).to_string(), "strap:ca:l");
        assert_eq!(
            SelectionKey::attribute("case", "m", 1).text_fallback_marker(),
            "case:m:_text_fallback"
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(SelectionKey::parse("case"), Some(SelectionKey::group("case")));
        assert_eq!(
            SelectionKey::parse("strap:ca:l"),
            Some(SelectionKey::AddOnAttribute("strap".into(), "l".into()))
        );
        assert_eq!(SelectionKey::parse("case:m:_text_fallback"), None);
        assert_eq!(SelectionKey::parse("a:b:c"), None);
        assert_eq!(SelectionKey::parse(""), None);
        assert_eq!(SelectionKey::parse("case:"), None);
    }

    #[test]
    fn test_group_key_and_attr() {
        let key = SelectionKey::AddOnAttribute("strap".into(), "len".into());
        assert_eq!(key.group_key(), "strap");
        assert_eq!(key.attr_id(), Some("len"));
        assert!(key.is_attribute());
        assert!(!SelectionKey::group("strap").is_attribute());
    }

    #[test]
    fn test_serde_as_string() {
        let key = SelectionKey::attribute("case", "m", 1);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"case:m\"");
        let back: SelectionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
