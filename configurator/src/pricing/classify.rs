//! Selection key classifier
//!
//! Resolves one selection entry against the catalog. Pricing and the
//! submission projector both read the selection through this function, so
//! the two can never disagree about which step or attribute a key belongs to.

use crate::catalog::Catalog;
use shared::SelectionKey;
use shared::models::{OptionGroup, OptionItem, SubAttribute, SubAttributeOption};

/// What a selection entry refers to
#[derive(Debug, Clone, Copy)]
pub enum KeyKind<'a> {
    /// Plain group choice; `item` is `None` when the value matches no catalog item
    Choice {
        item: Option<&'a OptionItem>,
        is_self: bool,
    },
    /// Sub-attribute value; `option` is `None` for free text and unmatched values
    Attribute {
        attribute: &'a SubAttribute,
        option: Option<&'a SubAttributeOption>,
    },
}

/// A selection entry resolved against the catalog
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedKey<'a> {
    pub group: &'a OptionGroup,
    pub step: u32,
    pub kind: KeyKind<'a>,
}

impl ClassifiedKey<'_> {
    pub fn is_specification(&self) -> bool {
        self.step == 1
    }
}

/// Classify a selection entry; `None` when its group or attribute is unknown
pub fn classify<'a>(catalog: &'a Catalog, key: &SelectionKey, value: &str) -> Option<ClassifiedKey<'a>> {
    let group = catalog.group(key.group_key())?;
    let kind = match key.attr_id() {
        None => {
            let item = catalog.item(group, value);
            let is_self = item.map_or(value == group.id, |i| i.is_self);
            KeyKind::Choice { item, is_self }
        }
        Some(attr_id) => {
            let attribute = group.find_attribute(attr_id)?;
            let option = if attribute.is_text() {
                None
            } else {
                attribute.find_option(value)
            };
            KeyKind::Attribute { attribute, option }
        }
    };
    Some(ClassifiedKey {
        group,
        step: group.step(),
        kind,
    })
}
