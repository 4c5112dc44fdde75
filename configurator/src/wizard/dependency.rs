//! Dependency Resolver
//!
//! A group may depend on another group holding a value, optionally one
//! specific value. Evaluation is pure over the catalog and the selection state.

use super::state::SelectionState;
use crate::catalog::Catalog;
use shared::SelectionKey;
use shared::models::OptionGroup;
use std::collections::HashSet;

/// Whether a group is currently eligible to be shown
///
/// - no dependency: always eligible
/// - parent missing from the catalog: never eligible (fails closed)
/// - parent without a selected value: not eligible
/// - `depends_on_option_id` set: eligible only while the parent holds exactly that value
pub fn is_eligible(catalog: &Catalog, group: &OptionGroup, state: &SelectionState) -> bool {
    let Some(parent_id) = group.ui.depends_on_group_id.as_deref() else {
        return true;
    };
    let Some(parent) = catalog.group_by_id(parent_id) else {
        return false;
    };
    let Some(parent_value) = state.get(&SelectionKey::group(parent.key())) else {
        return false;
    };
    match group.ui.depends_on_option_id.as_deref() {
        Some(option_id) => parent_value == option_id,
        None => true,
    }
}

/// Groups currently eligible, in catalog order
pub fn valid_groups<'a>(catalog: &'a Catalog, state: &SelectionState) -> Vec<&'a OptionGroup> {
    catalog
        .groups()
        .iter()
        .filter(|g| is_eligible(catalog, g, state))
        .collect()
}

/// Keys of the groups a group transitively depends on
pub fn ancestors(catalog: &Catalog, group: &OptionGroup) -> HashSet<String> {
    let mut found = HashSet::new();
    let mut current = group;
    while let Some(parent) = current
        .ui
        .depends_on_group_id
        .as_deref()
        .and_then(|id| catalog.group_by_id(id))
    {
        // Cycles in catalog data end the walk
        if parent.key() == group.key() || !found.insert(parent.key().to_string()) {
            break;
        }
        current = parent;
    }
    found
}

/// The group, its ancestors and every group that transitively depends on it
pub fn lineage(catalog: &Catalog, group: &OptionGroup) -> HashSet<String> {
    let mut keys = ancestors(catalog, group);
    keys.insert(group.key().to_string());
    for other in catalog.groups() {
        if ancestors(catalog, other).contains(group.key()) {
            keys.insert(other.key().to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::{catalog_with, group, group_dep};

    #[test]
    fn test_no_dependency_always_eligible() {
        let catalog = catalog_with(vec![group("a", 1)], vec![]);
        let state = SelectionState::default();
        assert_eq!(valid_groups(&catalog, &state).len(), 1);
    }

    #[test]
    fn test_missing_parent_fails_closed() {
        let catalog = catalog_with(vec![group_dep("b", 1, "ghost", None)], vec![]);
        let mut state = SelectionState::default();
        state.insert(SelectionKey::group("ghost"), "x");
        assert!(valid_groups(&catalog, &state).is_empty());
    }

    #[test]
    fn test_parent_without_value_not_eligible() {
        let catalog = catalog_with(vec![group("a", 1), group_dep("b", 1, "a", None)], vec![]);
        let mut state = SelectionState::default();
        assert_eq!(valid_groups(&catalog, &state).len(), 1);

        state.insert(SelectionKey::group("a"), "anything");
        assert_eq!(valid_groups(&catalog, &state).len(), 2);
    }

    #[test]
    fn test_specific_option_dependency() {
        let catalog = catalog_with(vec![group("a", 1), group_dep("b", 1, "a", Some("x"))], vec![]);
        let mut state = SelectionState::default();
        state.insert(SelectionKey::group("a"), "x");
        assert!(is_eligible(&catalog, &catalog.groups()[1], &state));

        state.insert(SelectionKey::group("a"), "y");
        assert!(!is_eligible(&catalog, &catalog.groups()[1], &state));
    }

    #[test]
    fn test_lineage_and_cycles() {
        let catalog = catalog_with(
            vec![
                group("a", 1),
                group_dep("b", 1, "a", None),
                group_dep("c", 1, "b", None),
                group("d", 1),
                group_dep("e", 2, "f", None),
                group_dep("f", 2, "e", None),
            ],
            vec![],
        );
        let lineage_b = lineage(&catalog, catalog.group("b").unwrap());
        assert!(lineage_b.contains("a"));
        assert!(lineage_b.contains("b"));
        assert!(lineage_b.contains("c"));
        assert!(!lineage_b.contains("d"));

        let anc = ancestors(&catalog, catalog.group("e").unwrap());
        assert!(anc.contains("f"));
        assert!(!anc.contains("e"));
    }
}
