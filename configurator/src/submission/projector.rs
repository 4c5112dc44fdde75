//! Submission Projector
//!
//! Turns the selection into the ordered, human-labeled mapping order
//! processing consumes. Emission follows step order, then group display order,
//! then attribute order, so specification fields precede add-on fields.
//!
//! Labels:
//! - step 1: `group name` / `attribute name`
//! - later steps: `【group name】` / `【group name】attribute name`

use crate::catalog::Catalog;
use crate::pricing::{KeyKind, classify};
use crate::wizard::{SelectionMachine, StepPlan, valid_groups};
use shared::SelectionKey;
use shared::models::{LabeledOptions, OptionGroup};

fn choice_label(group: &OptionGroup) -> String {
    if group.step() == 1 {
        group.name.clone()
    } else {
        format!("【{}】", group.name)
    }
}

fn attribute_label(group: &OptionGroup, attribute_name: &str) -> String {
    if group.step() == 1 {
        attribute_name.to_string()
    } else {
        format!("【{}】{}", group.name, attribute_name)
    }
}

/// Display value of a plain choice
fn choice_value(catalog: &Catalog, group: &OptionGroup, value: &str) -> String {
    match classify(catalog, &SelectionKey::group(group.key()), value).map(|c| c.kind) {
        Some(KeyKind::Choice { item: Some(item), .. }) => item.name.clone(),
        Some(KeyKind::Choice { item: None, is_self: true }) => group.name.clone(),
        _ => value.to_string(),
    }
}

/// Display value of a sub-attribute, `None` when it resolves to nothing
fn attribute_value(
    catalog: &Catalog,
    machine: &SelectionMachine,
    key: &SelectionKey,
    value: &str,
) -> Option<String> {
    match classify(catalog, key, value)?.kind {
        KeyKind::Attribute { option: Some(option), .. } => Some(option.name.clone()),
        KeyKind::Attribute { attribute, option: None }
            if attribute.is_text() || machine.state().is_text_fallback(key) =>
        {
            Some(value.to_string())
        }
        _ => None,
    }
}

/// Project the selection into labeled options
pub fn project_options(catalog: &Catalog, machine: &SelectionMachine) -> LabeledOptions {
    let state = machine.state();
    let plan = StepPlan::partition(valid_groups(catalog, state));
    let mut options = LabeledOptions::new();

    for (_, groups) in plan.iter() {
        for &group in groups {
            match state.group_value(group.key()) {
                Some(value) => options.push(choice_label(group), choice_value(catalog, group, value)),
                None if group.step() == 1
                    && group.is_ai_recognition()
                    && machine.sticky_case_group() == Some(group.key()) =>
                {
                    options.push(group.name.as_str(), group.name.as_str());
                }
                None => {}
            }

            for attribute in &group.sub_attributes {
                let key = SelectionKey::attribute(group.key(), attribute.id.as_str(), group.step());
                let Some(value) = state.get(&key).filter(|v| !v.trim().is_empty()) else {
                    continue;
                };
                if let Some(display) = attribute_value(catalog, machine, &key, value) {
                    options.push(attribute_label(group, &attribute.name), display);
                }
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineRules;
    use crate::wizard::testing::{catalog_with, group, item, select_attr, text_attr};
    use shared::models::DisplayType;

    fn catalog() -> Catalog {
        let mut case = group("case", 1);
        case.name = "手機殼".into();
        case.sub_attributes = vec![
            select_attr("m", "材質", &[("o1", "矽膠", 50.0)]),
            text_attr("t", "刻字"),
        ];
        let mut protection = group("protection", 2);
        protection.name = "保護層".into();
        protection.sub_attributes = vec![select_attr("f", "觸感", &[("soft", "柔霧", 0.0)])];
        let mut strap = group("strap", 3);
        strap.name = "掛繩".into();
        strap.ui.sort_order = -1;
        catalog_with(
            vec![strap, protection, case],
            vec![
                item("x", "case", "Pro3", 500.0),
                item("gloss", "protection", "亮面", 80.0),
                item("s", "strap", "短繩", 30.0),
            ],
        )
    }

    #[test]
    fn test_emission_order_and_labels() {
        let catalog = catalog();
        let rules = EngineRules::default();
        let mut m = SelectionMachine::new();
        m.select(&catalog, &rules, "strap", "s").unwrap();
        m.select(&catalog, &rules, "protection", "gloss").unwrap();
        m.set_sub_attribute(&catalog, "protection", "f", "soft").unwrap();
        m.select(&catalog, &rules, "case", "x").unwrap();
        m.set_sub_attribute(&catalog, "case", "t", "Amy").unwrap();
        m.set_sub_attribute(&catalog, "case", "m", "o1").unwrap();

        let options = project_options(&catalog, &m);
        let entries: Vec<(&str, &str)> = options.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("手機殼", "Pro3"),
                ("材質", "矽膠"),
                ("刻字", "Amy"),
                ("【保護層】", "亮面"),
                ("【保護層】觸感", "柔霧"),
                ("【掛繩】", "短繩"),
            ]
        );
    }

    #[test]
    fn test_fallback_text_only_when_accepted() {
        let catalog = catalog();
        let rules = EngineRules::default();
        let mut m = SelectionMachine::new();
        m.select(&catalog, &rules, "case", "x").unwrap();
        let key = SelectionKey::attribute("case", "m", 1);
        m.state_mut().set_pending_fallback(key.clone(), "鈦合金");
        assert!(project_options(&catalog, &m).get("材質").is_none());

        m.accept_fallback_text(&key).unwrap();
        assert_eq!(project_options(&catalog, &m).get("材質"), Some("鈦合金"));
        assert!(!project_options(&catalog, &m).labels().any(|l| l.contains("_text_fallback")));
    }

    #[test]
    fn test_sticky_ai_group_emits_itself() {
        let mut ai = group("ai", 1);
        ai.name = "AI 辨識殼".into();
        ai.ui.display_type = Some(DisplayType::AiRecognition);
        let catalog = catalog_with(vec![ai], vec![]);
        let mut m = SelectionMachine::new();
        m.commit_sticky(&catalog, "ai").unwrap();
        assert_eq!(project_options(&catalog, &m).get("AI 辨識殼"), Some("AI 辨識殼"));
    }
}
