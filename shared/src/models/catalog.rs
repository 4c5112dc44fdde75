//! Option Catalog Model
//!
//! Strict internal schema produced by the catalog normalizer. Nothing past the
//! ingestion boundary ever sees the raw, multi-shape records.

use serde::{Deserialize, Serialize};

/// How an option group is presented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    Cards,
    Grid,
    List,
    Checkbox,
    AiRecognition,
}

impl DisplayType {
    /// Canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Cards => "cards",
            DisplayType::Grid => "grid",
            DisplayType::List => "list",
            DisplayType::Checkbox => "checkbox",
            DisplayType::AiRecognition => "ai-recognition",
        }
    }

    /// Per-context default when the catalog does not say: cards for step 1, grid otherwise
    pub fn default_for_step(step: u32) -> Self {
        if step == 1 {
            DisplayType::Cards
        } else {
            DisplayType::Grid
        }
    }
}

/// Sub-attribute input kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Bounded to the attribute's option list
    #[default]
    Select,
    /// Free input, never priced
    Text,
}

/// Option of a select-type sub-attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubAttributeOption {
    /// Stable id (falls back to the name when the catalog has none)
    pub id: String,
    pub name: String,
    /// Price modifier in currency unit (positive=add, negative=subtract)
    pub price_modifier: f64,
    pub image: Option<String>,
}

/// Fine-detail attribute of an option group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubAttribute {
    pub id: String,
    pub name: String,
    pub kind: AttributeKind,
    pub options: Vec<SubAttributeOption>,
    /// Rich-text description, possibly double-escaped HTML
    pub description: Option<String>,
}

impl SubAttribute {
    /// Find an option by id, falling back to an exact name match
    pub fn find_option(&self, value: &str) -> Option<&SubAttributeOption> {
        self.options
            .iter()
            .find(|o| o.id == value)
            .or_else(|| self.options.iter().find(|o| o.name == value))
    }

    pub fn is_text(&self) -> bool {
        self.kind == AttributeKind::Text
    }
}

/// UI configuration bag of an option group (already resolved)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UiConfig {
    /// Wizard step (positive, default 1)
    pub step: u32,
    /// `None` when the catalog value was missing or unrecognized
    pub display_type: Option<DisplayType>,
    /// Free-text grouping label within a step
    pub category: Option<String>,
    pub sort_order: i32,
    pub category_sort_order: i32,
    pub depends_on_group_id: Option<String>,
    pub depends_on_option_id: Option<String>,
}

/// Option group entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionGroup {
    pub id: String,
    /// Optional stable short name
    pub code: Option<String>,
    pub name: String,
    pub price_modifier: f64,
    pub thumbnail: Option<String>,
    /// Rich-text description, possibly double-escaped HTML
    pub description: Option<String>,
    pub sub_attributes: Vec<SubAttribute>,
    pub ui: UiConfig,
}

impl OptionGroup {
    /// Group key used in selection state: `code` if non-empty, else `id`
    pub fn key(&self) -> &str {
        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => &self.id,
        }
    }

    pub fn step(&self) -> u32 {
        self.ui.step.max(1)
    }

    /// Display type with the per-step default applied
    pub fn display_type(&self) -> DisplayType {
        self.ui
            .display_type
            .unwrap_or_else(|| DisplayType::default_for_step(self.step()))
    }

    pub fn is_ai_recognition(&self) -> bool {
        self.display_type() == DisplayType::AiRecognition
    }

    pub fn find_attribute(&self, attr_id: &str) -> Option<&SubAttribute> {
        self.sub_attributes.iter().find(|a| a.id == attr_id)
    }

    pub fn has_dependency(&self) -> bool {
        self.ui.depends_on_group_id.is_some()
    }
}

/// Option item entity (child of exactly one group)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionItem {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub price_modifier: f64,
    pub color_hex: Option<String>,
    pub image_url: Option<String>,
    /// Placeholder standing for "the group itself"
    pub is_self: bool,
}

/// Product availability relation (product, item, available)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductAvailability {
    pub product_id: String,
    pub option_item_id: String,
    pub is_available: bool,
}
