//! Name matching for recognized text
//!
//! Recognized labels rarely match catalog names byte for byte. Both sides are
//! compared after [`normalize`]: NFKC-folded (full-width Latin becomes ASCII),
//! lowercase, with whitespace, separators and punctuation removed. CJK
//! characters count as alphanumeric and survive.

use shared::models::{OptionGroup, SubAttribute, SubAttributeOption};
use unicode_normalization::UnicodeNormalization;

/// 匹配用规范化: NFKC 折叠、小写并去除空白/分隔符/标点
pub fn normalize(text: &str) -> String {
    text.nfkc()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized equality; two blank names never match
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    !a.is_empty() && a == normalize(b)
}

/// Sub-attribute of `group` whose name matches a recognized spec name
pub fn find_attribute<'a>(group: &'a OptionGroup, spec_name: &str) -> Option<&'a SubAttribute> {
    group
        .sub_attributes
        .iter()
        .find(|a| a.name == spec_name)
        .or_else(|| group.sub_attributes.iter().find(|a| names_match(&a.name, spec_name)))
}

/// Option of a select attribute whose name matches the recognized text
///
/// Exact match first, normalized match second. Text attributes have no options.
pub fn find_option<'a>(attribute: &'a SubAttribute, text: &str) -> Option<&'a SubAttributeOption> {
    if attribute.is_text() {
        return None;
    }
    attribute
        .options
        .iter()
        .find(|o| o.name == text)
        .or_else(|| attribute.options.iter().find(|o| names_match(&o.name, text)))
}
