//! Catalog Normalizer
//!
//! The one ingestion boundary for option-group, item and availability records.
//! Records have arrived in several historical shapes over time: camelCase and
//! snake_case field names, ids as numbers or strings, modifiers as numbers or
//! numeric strings, and a UI-configuration bag that is sometimes an object and
//! sometimes a JSON-encoded string. Everything here is pure and never fails;
//! malformed input degrades to defaults with a warning.

use serde_json::{Map, Value};
use shared::models::{
    AttributeKind, DisplayType, OptionGroup, OptionItem, ProductAvailability, SubAttribute,
    SubAttributeOption, UiConfig,
};

// ==================== Field Helpers ====================

/// First non-null value among the historical field names
fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

/// String view of an id-like value (strings trimmed, numbers formatted)
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Field from the UI bag, falling back to the record's top level
fn layered_field<'a>(
    ui: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
    names: &[&str],
) -> Option<&'a Value> {
    field(ui, names).or_else(|| field(obj, names))
}

fn text_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    field(obj, names).and_then(as_text)
}

fn bool_field(obj: &Map<String, Value>, names: &[&str]) -> bool {
    match field(obj, names) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Lenient numeric read: numbers and numeric strings, anything else is 0
///
/// NaN and infinities also resolve to 0 so they can never reach pricing.
pub fn lenient_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        Some(_) => {
            tracing::warn!("Non-finite modifier in catalog, using 0");
            0.0
        }
        None => {
            if value.is_some_and(|v| !v.is_null()) {
                tracing::warn!(?value, "Non-numeric modifier in catalog, using 0");
            }
            0.0
        }
    }
}

fn modifier_field(obj: &Map<String, Value>, owner: &str) -> f64 {
    let modifier = lenient_number(field(obj, &["priceModifier", "price_modifier", "price"]));
    if modifier < 0.0 {
        tracing::warn!(owner, modifier, "Negative price modifier kept as-is");
    }
    modifier
}

/// Positive integer from a number or numeric string
fn positive_int(value: Option<&Value>) -> Option<u32> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 1.0 && n <= u32::MAX as f64).then(|| n.trunc() as u32)
}

// ==================== UI Config ====================

/// Parse the UI-configuration bag
///
/// Objects are taken as-is; strings are decoded as JSON. Anything unparseable
/// (or not an object once decoded) becomes an empty config.
pub fn parse_ui_config(raw: Option<&Value>) -> Map<String, Value> {
    match raw {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) if s.trim().is_empty() => Map::new(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(config = %s, "Unparseable UI config, using empty config");
                Map::new()
            }
        },
        _ => Map::new(),
    }
}

fn ui_bag(obj: &Map<String, Value>) -> Map<String, Value> {
    parse_ui_config(field(obj, &["uiConfig", "ui_config", "ui"]))
}

/// Resolve the wizard step of a raw group record
///
/// Prefers the nested UI-level step over the top-level one; defaults to 1
/// when neither is a positive number.
pub fn resolve_step(raw: &Value) -> u32 {
    let Some(obj) = raw.as_object() else {
        return 1;
    };
    let ui = ui_bag(obj);
    positive_int(ui.get("step"))
        .or_else(|| positive_int(obj.get("step")))
        .unwrap_or(1)
}

/// Resolve the stable group key of a raw group record: `code` if non-empty, else `id`
pub fn resolve_group_key(raw: &Value) -> Option<String> {
    let obj = raw.as_object()?;
    text_field(obj, &["code"]).or_else(|| text_field(obj, &["id"]))
}

/// Normalize a display-type token or localized label
///
/// Returns `None` for unrecognized input; callers apply the per-step default.
pub fn resolve_display_type(raw: &str) -> Option<DisplayType> {
    let token: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '_' { '-' } else { c })
        .collect();

    match token.as_str() {
        "cards" | "card" | "卡片" | "卡片式" => Some(DisplayType::Cards),
        "grid" | "網格" | "网格" | "宮格" | "宫格" => Some(DisplayType::Grid),
        "list" | "列表" | "清單" | "清单" => Some(DisplayType::List),
        "checkbox" | "勾選" | "勾选" | "複選" | "复选" | "多選" | "多选" => {
            Some(DisplayType::Checkbox)
        }
        "ai-recognition" | "airecognition" | "ai" | "ai辨識" | "ai辨识" | "ai識別"
        | "ai识别" => Some(DisplayType::AiRecognition),
        _ => None,
    }
}

// ==================== Records ====================

fn normalize_option(raw: &Value) -> Option<SubAttributeOption> {
    match raw {
        Value::String(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| SubAttributeOption {
                id: name.to_string(),
                name: name.to_string(),
                price_modifier: 0.0,
                image: None,
            })
        }
        Value::Object(obj) => {
            let name = text_field(obj, &["name", "label", "value"])?;
            Some(SubAttributeOption {
                id: text_field(obj, &["id"]).unwrap_or_else(|| name.clone()),
                price_modifier: modifier_field(obj, &name),
                image: text_field(obj, &["image", "imageUrl", "image_url"]),
                name,
            })
        }
        _ => None,
    }
}

fn normalize_attribute(raw: &Value) -> Option<SubAttribute> {
    let obj = raw.as_object()?;
    let name = text_field(obj, &["name", "label"])?;
    let kind = match text_field(obj, &["type", "kind"]).map(|t| t.to_lowercase()) {
        Some(t) if matches!(t.as_str(), "text" | "input" | "textarea") => AttributeKind::Text,
        _ => AttributeKind::Select,
    };
    let options = field(obj, &["options", "values"])
        .and_then(Value::as_array)
        .map(|opts| opts.iter().filter_map(normalize_option).collect())
        .unwrap_or_default();

    Some(SubAttribute {
        id: text_field(obj, &["id"]).unwrap_or_else(|| name.clone()),
        name,
        kind,
        options,
        description: text_field(obj, &["description", "desc"]),
    })
}

/// Normalize one raw option-group record
///
/// Returns `None` only when the record has no usable id.
pub fn normalize_group(raw: &Value) -> Option<OptionGroup> {
    let obj = raw.as_object()?;
    let id = text_field(obj, &["id"])?;
    let ui = ui_bag(obj);
    let name = text_field(obj, &["name", "title"]).unwrap_or_else(|| id.clone());

    // UI-level values win over historical top-level ones
    let pick = |names: &[&str]| layered_field(&ui, obj, names);
    let display_type = pick(&["displayType", "display_type"])
        .and_then(Value::as_str)
        .and_then(resolve_display_type);
    let category = pick(&["category"]).and_then(as_text);
    let sort_order = pick(&["sortOrder", "sort_order"])
        .map(|v| lenient_number(Some(v)).trunc() as i32)
        .unwrap_or(0);
    let category_sort_order = pick(&["categorySortOrder", "category_sort_order"])
        .map(|v| lenient_number(Some(v)).trunc() as i32)
        .unwrap_or(0);
    let depends_on_group_id = pick(&["dependsOnGroupId", "depends_on_group_id"]).and_then(as_text);
    let depends_on_option_id =
        pick(&["dependsOnOptionId", "depends_on_option_id"]).and_then(as_text);

    let sub_attributes = field(obj, &["subAttributes", "sub_attributes", "attributes"])
        .and_then(Value::as_array)
        .map(|attrs| attrs.iter().filter_map(normalize_attribute).collect())
        .unwrap_or_default();

    Some(OptionGroup {
        code: text_field(obj, &["code"]),
        price_modifier: modifier_field(obj, &name),
        thumbnail: text_field(obj, &["thumbnail", "thumbnailUrl", "thumbnail_url", "image"]),
        description: text_field(obj, &["description", "desc"]),
        sub_attributes,
        ui: UiConfig {
            step: resolve_step(raw),
            display_type,
            category,
            sort_order,
            category_sort_order,
            depends_on_group_id,
            depends_on_option_id,
        },
        name,
        id,
    })
}

/// Normalize one raw option-item record
///
/// `fallback_parent` is used for items hydrated inside a group record.
pub fn normalize_item(raw: &Value, fallback_parent: Option<&str>) -> Option<OptionItem> {
    let obj = raw.as_object()?;
    let id = text_field(obj, &["id"])?;
    let parent_id = text_field(obj, &["parentId", "parent_id", "groupId", "group_id"])
        .or_else(|| fallback_parent.map(String::from))?;
    let name = text_field(obj, &["name", "title"]).unwrap_or_else(|| id.clone());

    Some(OptionItem {
        is_self: id == parent_id || bool_field(obj, &["isSelf", "is_self"]),
        price_modifier: modifier_field(obj, &name),
        color_hex: text_field(obj, &["colorHex", "color_hex", "color"]),
        image_url: text_field(obj, &["imageUrl", "image_url", "image"]),
        name,
        parent_id,
        id,
    })
}

/// Normalize one raw availability row
pub fn normalize_availability(raw: &Value) -> Option<ProductAvailability> {
    let obj = raw.as_object()?;
    Some(ProductAvailability {
        product_id: text_field(obj, &["productId", "product_id", "modelId", "model_id"])?,
        option_item_id: text_field(obj, &["optionItemId", "option_item_id", "itemId", "item_id"])?,
        is_available: bool_field(obj, &["isAvailable", "is_available"]),
    })
}

/// Items hydrated inside group records
pub fn hydrated_items(raw_group: &Value) -> Vec<OptionItem> {
    let Some(obj) = raw_group.as_object() else {
        return vec![];
    };
    let Some(parent) = text_field(obj, &["id"]) else {
        return vec![];
    };
    field(obj, &["items", "optionItems", "option_items"])
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| normalize_item(item, Some(&parent)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_step_prefers_ui_level() {
        assert_eq!(resolve_step(&json!({"step": 3, "uiConfig": {"step": 2}})), 2);
        assert_eq!(resolve_step(&json!({"step": 3})), 3);
        assert_eq!(resolve_step(&json!({"step": 3, "uiConfig": {"step": 0}})), 3);
        assert_eq!(resolve_step(&json!({"step": -1})), 1);
        assert_eq!(resolve_step(&json!({"ui_config": "{\"step\": \"4\"}"})), 4);
        assert_eq!(resolve_step(&json!({})), 1);
        assert_eq!(resolve_step(&json!("not an object")), 1);
    }

    #[test]
    fn test_resolve_group_key() {
        assert_eq!(resolve_group_key(&json!({"id": 7, "code": "case"})).as_deref(), Some("case"));
        assert_eq!(resolve_group_key(&json!({"id": 7, "code": " "})).as_deref(), Some("7"));
        assert_eq!(resolve_group_key(&json!({"id": "g1", "code": null})).as_deref(), Some("g1"));
        assert_eq!(resolve_group_key(&json!({})), None);
    }

    #[test]
    fn test_resolve_display_type() {
        assert_eq!(resolve_display_type("cards"), Some(DisplayType::Cards));
        assert_eq!(resolve_display_type(" Grid "), Some(DisplayType::Grid));
        assert_eq!(resolve_display_type("列表"), Some(DisplayType::List));
        assert_eq!(resolve_display_type("勾選"), Some(DisplayType::Checkbox));
        assert_eq!(resolve_display_type("ai_recognition"), Some(DisplayType::AiRecognition));
        assert_eq!(resolve_display_type("AI 辨識"), Some(DisplayType::AiRecognition));
        assert_eq!(resolve_display_type("carousel"), None);
        assert_eq!(resolve_display_type(""), None);
    }

    #[test]
    fn test_parse_ui_config_degrades() {
        assert!(parse_ui_config(Some(&json!("{not json"))).is_empty());
        assert!(parse_ui_config(Some(&json!("[1,2]"))).is_empty());
        assert!(parse_ui_config(Some(&json!(42))).is_empty());
        assert!(parse_ui_config(None).is_empty());
        assert_eq!(parse_ui_config(Some(&json!("{\"step\":2}"))).get("step"), Some(&json!(2)));
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(Some(&json!(12.5))), 12.5);
        assert_eq!(lenient_number(Some(&json!("300"))), 300.0);
        assert_eq!(lenient_number(Some(&json!("abc"))), 0.0);
        assert_eq!(lenient_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(lenient_number(Some(&json!(null))), 0.0);
        assert_eq!(lenient_number(Some(&json!(-20))), -20.0);
        assert_eq!(lenient_number(None), 0.0);
    }

    #[test]
    fn test_normalize_group_historical_shapes() {
        let camel = json!({
            "id": "g1",
            "code": "case",
            "name": "Pro3 標準版",
            "priceModifier": "500",
            "uiConfig": "{\"step\":1,\"displayType\":\"卡片\",\"sortOrder\":2,\"dependsOnGroupId\":\"g0\"}",
            "subAttributes": [
                {"id": "m", "name": "材質", "type": "select", "options": [{"id": "o1", "name": "矽膠", "priceModifier": 50}]},
                {"id": "t", "name": "刻字", "type": "text"}
            ]
        });
        let group = normalize_group(&camel).unwrap();
        assert_eq!(group.key(), "case");
        assert_eq!(group.price_modifier, 500.0);
        assert_eq!(group.ui.display_type, Some(DisplayType::Cards));
        assert_eq!(group.ui.sort_order, 2);
        assert_eq!(group.ui.depends_on_group_id.as_deref(), Some("g0"));
        assert_eq!(group.sub_attributes.len(), 2);
        assert_eq!(group.sub_attributes[0].options[0].price_modifier, 50.0);
        assert!(group.sub_attributes[1].is_text());

        let snake = json!({
            "id": 9,
            "name": "Strap",
            "price_modifier": 80,
            "step": 2,
            "display_type": "list",
            "sort_order": "5",
            "ui_config": "garbage",
            "sub_attributes": [{"name": "Length", "options": ["Short", "Long"]}]
        });
        let group = normalize_group(&snake).unwrap();
        assert_eq!(group.key(), "9");
        assert_eq!(group.step(), 2);
        assert_eq!(group.ui.display_type, Some(DisplayType::List));
        assert_eq!(group.ui.sort_order, 5);
        let attr = &group.sub_attributes[0];
        assert_eq!(attr.id, "Length");
        assert_eq!(attr.options[1].id, "Long");
    }

    #[test]
    fn test_normalize_group_requires_id() {
        assert!(normalize_group(&json!({"name": "orphan"})).is_none());
    }

    #[test]
    fn test_normalize_item() {
        let item = normalize_item(
            &json!({"id": "x", "parentId": "g1", "name": "黑色", "priceModifier": null, "colorHex": "#000"}),
            None,
        )
        .unwrap();
        assert_eq!(item.parent_id, "g1");
        assert_eq!(item.price_modifier, 0.0);
        assert_eq!(item.color_hex.as_deref(), Some("#000"));
        assert!(!item.is_self);

        let self_item = normalize_item(&json!({"id": "g1", "parent_id": "g1"}), None).unwrap();
        assert!(self_item.is_self);

        let flagged = normalize_item(&json!({"id": "s", "group_id": "g1", "is_self": 1}), None).unwrap();
        assert!(flagged.is_self);

        let hydrated = normalize_item(&json!({"id": "y", "name": "白色"}), Some("g2")).unwrap();
        assert_eq!(hydrated.parent_id, "g2");
        assert!(normalize_item(&json!({"id": "z"}), None).is_none());
    }

    #[test]
    fn test_normalize_availability() {
        let row = normalize_availability(&json!({"productId": 5, "optionItemId": "x", "isAvailable": true})).unwrap();
        assert_eq!(row.product_id, "5");
        assert!(row.is_available);
        let row = normalize_availability(&json!({"product_id": "p", "item_id": "y", "is_available": "false"})).unwrap();
        assert!(!row.is_available);
        assert!(normalize_availability(&json!({"productId": "p"})).is_none());
    }

    #[test]
    fn test_hydrated_items() {
        let items = hydrated_items(&json!({"id": "g1", "items": [{"id": "a"}, {"id": "b", "parentId": "other"}]}));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].parent_id, "g1");
        assert_eq!(items[1].parent_id, "other");
    }
}
