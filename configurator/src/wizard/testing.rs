//! In-crate catalog builders for unit tests

use crate::catalog::Catalog;
use shared::models::{
    AttributeKind, OptionGroup, OptionItem, SubAttribute, SubAttributeOption, UiConfig,
};

/// Group whose id and key are both `key`
pub fn group(key: &str, step: u32) -> OptionGroup {
    OptionGroup {
        id: key.to_string(),
        code: None,
        name: key.to_string(),
        price_modifier: 0.0,
        thumbnail: None,
        description: None,
        sub_attributes: vec![],
        ui: UiConfig {
            step,
            ..Default::default()
        },
    }
}

/// Group depending on `parent_id` (optionally on one of its values)
pub fn group_dep(key: &str, step: u32, parent_id: &str, option: Option<&str>) -> OptionGroup {
    let mut g = group(key, step);
    g.ui.depends_on_group_id = Some(parent_id.to_string());
    g.ui.depends_on_option_id = option.map(String::from);
    g
}

pub fn item(id: &str, parent: &str, name: &str, price: f64) -> OptionItem {
    OptionItem {
        id: id.to_string(),
        parent_id: parent.to_string(),
        name: name.to_string(),
        price_modifier: price,
        color_hex: None,
        image_url: None,
        is_self: id == parent,
    }
}

/// Select-type attribute with `(id, name, price)` options
pub fn select_attr(id: &str, name: &str, options: &[(&str, &str, f64)]) -> SubAttribute {
    SubAttribute {
        id: id.to_string(),
        name: name.to_string(),
        kind: AttributeKind::Select,
        options: options
            .iter()
            .map(|(oid, oname, price)| SubAttributeOption {
                id: oid.to_string(),
                name: oname.to_string(),
                price_modifier: *price,
                image: None,
            })
            .collect(),
        description: None,
    }
}

pub fn text_attr(id: &str, name: &str) -> SubAttribute {
    SubAttribute {
        id: id.to_string(),
        name: name.to_string(),
        kind: AttributeKind::Text,
        options: vec![],
        description: None,
    }
}

pub fn catalog_with(groups: Vec<OptionGroup>, items: Vec<OptionItem>) -> Catalog {
    Catalog::new(groups, items, vec![])
}
