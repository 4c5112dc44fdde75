//! Selection Price Calculator
//!
//! One pass over the selection state:
//! - step-1 entries accumulate into the specification base
//! - later-step entries accumulate into add-ons
//! - a sticky AI-recognition group prices itself (it has no plain choice)
//! - without any specification the total is 0
//!
//! Accumulation is exact (`Decimal`), so entry order never changes the result.

use super::classify::{KeyKind, classify};
use super::{SpecPricePolicy, to_decimal, to_f64};
use crate::catalog::Catalog;
use crate::wizard::SelectionState;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::SelectionKey;

/// Price breakdown of the current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Specification (step 1) part
    pub spec_base: f64,
    /// Add-on (later steps) part
    pub addons: f64,
    /// `spec_base + addons`, or 0 without a specification
    pub total: f64,
    pub has_specification: bool,
}

/// Step-1 plain choice contribution under the given policy
fn specification_price(
    policy: SpecPricePolicy,
    item_modifier: Decimal,
    group_modifier: Decimal,
    is_self: bool,
) -> Decimal {
    match policy {
        SpecPricePolicy::ItemOrGroup => {
            if item_modifier > Decimal::ZERO {
                item_modifier
            } else {
                group_modifier
            }
        }
        SpecPricePolicy::ItemPlusGroup => {
            if is_self {
                item_modifier.max(group_modifier)
            } else {
                item_modifier + group_modifier
            }
        }
    }
}

/// Price the selection
///
/// `sticky_group` is the committed specification group, if any.
pub fn calculate_price(
    catalog: &Catalog,
    state: &SelectionState,
    sticky_group: Option<&str>,
    policy: SpecPricePolicy,
) -> PriceBreakdown {
    let mut spec_base = Decimal::ZERO;
    let mut addons = Decimal::ZERO;
    let mut has_specification = false;

    for (key, value) in state.iter() {
        let Some(classified) = classify(catalog, key, value) else {
            tracing::debug!(key = %key, "Selection entry not in catalog, not priced");
            continue;
        };
        let group = classified.group;

        let amount = match classified.kind {
            KeyKind::Attribute { attribute, option } => {
                if attribute.is_text() {
                    Decimal::ZERO
                } else {
                    option.map_or(Decimal::ZERO, |o| to_decimal(o.price_modifier))
                }
            }
            KeyKind::Choice { item, is_self } => {
                let item_modifier = item.map_or(Decimal::ZERO, |i| to_decimal(i.price_modifier));
                let group_modifier = to_decimal(group.price_modifier);
                if classified.is_specification() {
                    specification_price(policy, item_modifier, group_modifier, is_self)
                } else if is_self {
                    item_modifier
                } else {
                    item_modifier + group_modifier
                }
            }
        };

        if classified.is_specification() {
            spec_base += amount;
            has_specification = true;
        } else {
            addons += amount;
        }
    }

    if let Some(group) = sticky_group.and_then(|key| catalog.group(key))
        && group.step() == 1
        && group.is_ai_recognition()
        && !state.contains(&SelectionKey::group(group.key()))
    {
        spec_base += to_decimal(group.price_modifier);
        has_specification = true;
    }

    let total = if has_specification {
        spec_base + addons
    } else {
        Decimal::ZERO
    };

    PriceBreakdown {
        spec_base: to_f64(spec_base),
        addons: to_f64(addons),
        total: to_f64(total),
        has_specification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::{catalog_with, group, group_dep, item, select_attr, text_attr};
    use shared::models::DisplayType;

    fn catalog() -> Catalog {
        let mut case = group("case", 1);
        case.price_modifier = 300.0;
        case.sub_attributes = vec![
            select_attr("m", "材質", &[("o1", "矽膠", 50.0)]),
            text_attr("t", "刻字"),
        ];
        let mut strap = group("strap", 2);
        strap.price_modifier = 20.0;
        strap.sub_attributes = vec![select_attr("len", "Length", &[("l1", "Long", 15.0)])];
        catalog_with(
            vec![case, group_dep("color", 1, "case", Some("x")), strap],
            vec![
                item("x", "case", "X", 500.0),
                item("y", "case", "Y", 0.0),
                item("z", "color", "Z", 0.0),
                item("s1", "strap", "Short", 30.0),
                item("strap", "strap", "Strap itself", 25.0),
            ],
        )
    }

    fn price(state: &SelectionState) -> PriceBreakdown {
        calculate_price(&catalog(), state, None, SpecPricePolicy::default())
    }

    #[test]
    fn test_no_specification_forces_zero() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("strap"), "s1");
        state.insert(SelectionKey::attribute("strap", "len", 2), "l1");
        let p = price(&state);
        assert!(!p.has_specification);
        assert_eq!(p.addons, 65.0);
        assert_eq!(p.total, 0.0);
    }

    #[test]
    fn test_item_modifier_wins_over_group_fallback() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("case"), "x");
        state.insert(SelectionKey::group("color"), "z");
        assert_eq!(price(&state).total, 500.0);

        state.insert(SelectionKey::group("case"), "y");
        assert_eq!(price(&state).total, 300.0);
    }

    #[test]
    fn test_item_plus_group_policy() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("case"), "x");
        let p = calculate_price(&catalog(), &state, None, SpecPricePolicy::ItemPlusGroup);
        assert_eq!(p.total, 800.0);

        state.insert(SelectionKey::group("case"), "y");
        let p = calculate_price(&catalog(), &state, None, SpecPricePolicy::ItemPlusGroup);
        assert_eq!(p.total, 300.0);
    }

    #[test]
    fn test_addons_and_attributes() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("case"), "x");
        state.insert(SelectionKey::attribute("case", "m", 1), "o1");
        state.insert(SelectionKey::attribute("case", "t", 1), "Amy");
        state.insert(SelectionKey::group("strap"), "s1");
        state.insert(SelectionKey::attribute("strap", "len", 2), "l1");
        let p = price(&state);
        assert_eq!(p.spec_base, 550.0);
        // 30 item + 20 group fee + 15 option
        assert_eq!(p.addons, 65.0);
        assert_eq!(p.total, 615.0);
    }

    #[test]
    fn test_self_item_skips_group_fee() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("case"), "x");
        state.insert(SelectionKey::group("strap"), "strap");
        assert_eq!(price(&state).addons, 25.0);
    }

    #[test]
    fn test_unmatched_values_price_zero() {
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("case"), "missing");
        state.insert(SelectionKey::attribute("case", "m", 1), "鈦合金");
        state.insert(SelectionKey::group("ghost"), "g");
        let p = price(&state);
        assert!(p.has_specification);
        // Missing item: modifier 0, falls back to the group price
        assert_eq!(p.total, 300.0);
    }

    #[test]
    fn test_sticky_ai_group_prices_itself() {
        let mut ai = group("ai", 1);
        ai.price_modifier = 990.0;
        ai.ui.display_type = Some(DisplayType::AiRecognition);
        let catalog = catalog_with(vec![ai, group("strap", 2)], vec![item("s1", "strap", "S", 10.0)]);
        let mut state = SelectionState::new();
        state.insert(SelectionKey::group("strap"), "s1");

        let p = calculate_price(&catalog, &state, None, SpecPricePolicy::default());
        assert_eq!(p.total, 0.0);
        let p = calculate_price(&catalog, &state, Some("ai"), SpecPricePolicy::default());
        assert_eq!(p.total, 1000.0);
    }

    #[test]
    fn test_order_independent() {
        let entries = vec![
            (SelectionKey::group("case"), "x"),
            (SelectionKey::attribute("case", "m", 1), "o1"),
            (SelectionKey::group("strap"), "s1"),
            (SelectionKey::attribute("strap", "len", 2), "l1"),
        ];
        let mut forward = SelectionState::new();
        for (k, v) in entries.iter().cloned() {
            forward.insert(k, v);
        }
        let mut backward = SelectionState::new();
        for (k, v) in entries.into_iter().rev() {
            backward.insert(k, v);
        }
        assert_eq!(price(&forward), price(&backward));
    }
}
