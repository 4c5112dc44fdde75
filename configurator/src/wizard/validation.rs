//! Step validation gate
//!
//! Before leaving a step, every group holding a value in that step must have all
//! of its sub-attributes filled in. The first gap blocks navigation with a
//! message naming the group and the attribute.

use super::dependency::valid_groups;
use super::selection::SelectionMachine;
use super::steps::StepPlan;
use crate::catalog::Catalog;
use shared::SelectionKey;
use shared::error::{AppError, AppResult};
use shared::models::OptionGroup;

/// Whether a group counts as "selected" for validation
fn holds_value(machine: &SelectionMachine, group: &OptionGroup) -> bool {
    machine.state().group_value(group.key()).is_some()
        || machine.sticky_case_group() == Some(group.key())
}

/// A sub-attribute is filled under either composite key shape
fn attribute_filled(machine: &SelectionMachine, group: &OptionGroup, attr_id: &str) -> bool {
    let key = group.key();
    [
        SelectionKey::StepOneAttribute(key.to_string(), attr_id.to_string()),
        SelectionKey::AddOnAttribute(key.to_string(), attr_id.to_string()),
    ]
    .iter()
    .any(|k| {
        machine
            .state()
            .get(k)
            .is_some_and(|v| !v.trim().is_empty())
    })
}

/// Validate the step being left
pub fn validate_step(catalog: &Catalog, machine: &SelectionMachine, step: u32) -> AppResult<()> {
    let groups = valid_groups(catalog, machine.state());
    let plan = StepPlan::partition(groups);
    for group in plan.groups(step) {
        if !holds_value(machine, group) {
            continue;
        }
        if let Some(missing) = group
            .sub_attributes
            .iter()
            .find(|a| !attribute_filled(machine, group, &a.id))
        {
            tracing::debug!(group = group.key(), attribute = %missing.id, step, "Step validation blocked");
            return Err(AppError::required_field(group.name.as_str(), missing.name.as_str()));
        }
    }
    Ok(())
}
