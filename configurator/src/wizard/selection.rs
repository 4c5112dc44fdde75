//! Selection State Machine
//!
//! Owns the [`SelectionState`] of one wizard session together with the two
//! navigation pointers:
//! - drilled group: the step-1 group whose detail view is open
//! - sticky case group: the step-1 group committed as "the specification"
//!
//! Every mutation follows the same order: primary write, cross-group side
//! effects, pruning of groups that became ineligible, pointer promotion.

use super::dependency::{is_eligible, lineage};
use super::state::SelectionState;
use crate::catalog::Catalog;
use crate::core::EngineRules;
use shared::SelectionKey;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OptionGroup;

/// Result of a `select` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The group now holds the item
    Selected,
    /// The group held the item and was toggled off
    Deselected,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    drilled_group: Option<String>,
    sticky_case_group: Option<String>,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SelectionState {
        &mut self.state
    }

    pub fn drilled_group(&self) -> Option<&str> {
        self.drilled_group.as_deref()
    }

    pub fn sticky_case_group(&self) -> Option<&str> {
        self.sticky_case_group.as_deref()
    }

    /// Back to an empty session (product change, wizard reopen)
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
        self.drilled_group = None;
        self.sticky_case_group = None;
        tracing::debug!("Selection state reset");
    }

    // ==================== Group choices ====================

    /// Choose an item of a group
    ///
    /// Step 1 is exclusive and cannot be unset by reselecting; later steps
    /// toggle. `item_id` equal to the group id addresses the group itself.
    pub fn select(
        &mut self,
        catalog: &Catalog,
        rules: &EngineRules,
        group_key: &str,
        item_id: &str,
    ) -> AppResult<SelectOutcome> {
        let group = catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        if !is_eligible(catalog, group, &self.state) {
            return Err(AppError::with_message(
                ErrorCode::GroupNotEligible,
                format!("Option group {} is not available for the current selection", group.name),
            )
            .with_detail("group", group.key()));
        }
        if item_id != group.id && catalog.item(group, item_id).is_none() {
            return Err(AppError::with_message(
                ErrorCode::ItemNotFound,
                format!("Option {} not found in {}", item_id, group.name),
            )
            .with_detail("group", group.key())
            .with_detail("item", item_id));
        }

        let key = group.key().to_string();
        let outcome = if group.step() == 1 {
            self.clear_other_specifications(catalog, group);
            self.state.insert(SelectionKey::group(key.as_str()), item_id);
            SelectOutcome::Selected
        } else if self.state.group_value(&key) == Some(item_id) {
            self.state.remove_group(&key);
            SelectOutcome::Deselected
        } else {
            self.state.insert(SelectionKey::group(key.as_str()), item_id);
            SelectOutcome::Selected
        };
        tracing::debug!(group = %key, item = item_id, ?outcome, "Selection changed");

        if outcome == SelectOutcome::Selected {
            self.apply_protection_rule(catalog, rules, group, item_id);
        }
        self.prune_ineligible(catalog);
        self.promote_drilled();
        Ok(outcome)
    }

    /// Step-1 exclusivity: clear every other step-1 group outside the lineage
    /// of `group` (its ancestors and dependents stay)
    fn clear_other_specifications(&mut self, catalog: &Catalog, group: &OptionGroup) {
        let keep = lineage(catalog, group);
        for other in catalog.groups_in_step(1) {
            let other_key = other.key();
            if keep.contains(other_key) {
                continue;
            }
            if self.state.remove_group(other_key) {
                tracing::debug!(group = other_key, "Cleared competing specification");
            }
            if self.sticky_case_group.as_deref() == Some(other_key) {
                self.sticky_case_group = None;
            }
            if self.drilled_group.as_deref() == Some(other_key) {
                self.drilled_group = None;
            }
        }
    }

    /// A glossy protection layer forces the embossing group to its "none" item
    fn apply_protection_rule(
        &mut self,
        catalog: &Catalog,
        rules: &EngineRules,
        group: &OptionGroup,
        item_id: &str,
    ) {
        if group.key() != rules.protection_group_key {
            return;
        }
        let Some(item) = catalog.item(group, item_id) else {
            return;
        };
        if !rules.is_glossy(&item.name) {
            return;
        }
        let Some(embossing) = catalog.group(&rules.embossing_group_key) else {
            return;
        };
        let Some(none_item) = catalog
            .items_of(&embossing.id)
            .find(|i| rules.is_none_item(&i.name))
        else {
            tracing::debug!(group = embossing.key(), "Embossing group has no \"none\" item");
            return;
        };

        let emb_key = embossing.key();
        if self.state.group_value(emb_key) != Some(none_item.id.as_str()) {
            self.state.remove_attributes(emb_key);
            self.state
                .insert(SelectionKey::group(emb_key), none_item.id.as_str());
            tracing::debug!(
                protection = %item.name,
                embossing = emb_key,
                item = %none_item.id,
                "Glossy protection forced embossing to none"
            );
        }
    }

    /// Drop selections of groups whose dependency no longer holds
    ///
    /// Runs to a fixed point so chains of dependent groups collapse together.
    pub(crate) fn prune_ineligible(&mut self, catalog: &Catalog) {
        loop {
            let stale: Vec<String> = catalog
                .groups()
                .iter()
                .filter(|g| self.state.touches_group(g.key()))
                .filter(|g| !is_eligible(catalog, g, &self.state))
                .map(|g| g.key().to_string())
                .collect();
            if stale.is_empty() {
                break;
            }
            for key in stale {
                self.state.remove_group(&key);
                tracing::debug!(group = %key, "Pruned ineligible group");
            }
        }

        for pointer in [&mut self.drilled_group, &mut self.sticky_case_group] {
            let still_valid = pointer
                .as_deref()
                .and_then(|key| catalog.group(key))
                .is_some_and(|g| is_eligible(catalog, g, &self.state));
            if !still_valid {
                *pointer = None;
            }
        }
    }

    fn promote_drilled(&mut self) {
        if self.sticky_case_group.is_none()
            && let Some(drilled) = &self.drilled_group
        {
            tracing::debug!(group = %drilled, "Promoted drilled group to sticky");
            self.sticky_case_group = Some(drilled.clone());
        }
    }

    // ==================== Sub-attributes ====================

    /// Write a sub-attribute value; an empty value removes it
    ///
    /// Select attributes take an option id (or exact option name) and store the
    /// option id. Any pending fallback and text marker of the key are cleared.
    pub fn set_sub_attribute(
        &mut self,
        catalog: &Catalog,
        group_key: &str,
        attr_id: &str,
        value: &str,
    ) -> AppResult<SelectionKey> {
        let group = catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        let attribute = group.find_attribute(attr_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::AttributeNotFound,
                format!("Attribute {} not found in {}", attr_id, group.name),
            )
            .with_detail("group", group.key())
            .with_detail("attribute", attr_id)
        })?;

        let key = SelectionKey::attribute(group.key(), attribute.id.as_str(), group.step());
        let value = value.trim();
        let stored = if value.is_empty() || attribute.is_text() {
            value.to_string()
        } else {
            attribute
                .find_option(value)
                .map(|o| o.id.clone())
                .ok_or_else(|| {
                    AppError::validation(format!(
                        "\"{}\" is not an option of \"{}\"",
                        value, attribute.name
                    ))
                    .with_detail("group", group.name.as_str())
                    .with_detail("attribute", attribute.name.as_str())
                })?
        };

        self.state.clear_fallback(&key);
        if stored.is_empty() {
            self.state.remove(&key);
        } else {
            self.state.insert(key.clone(), stored);
        }
        tracing::debug!(key = %key, "Sub-attribute updated");
        Ok(key)
    }

    /// Accept the pending recognized text of `key` as a free-text value
    pub fn accept_fallback_text(&mut self, key: &SelectionKey) -> AppResult<()> {
        if !key.is_attribute() {
            return Err(AppError::invalid_request(format!(
                "{} is not a sub-attribute key",
                key
            )));
        }
        match self.state.accept_pending_fallback(key) {
            Some(_) => {
                tracing::debug!(key = %key, "Accepted recognized text as free input");
                Ok(())
            }
            None => Err(AppError::not_found(format!("Pending text for {}", key))),
        }
    }

    // ==================== Navigation pointers ====================

    /// Open the detail view of a step-1 group
    pub fn drill_into(&mut self, catalog: &Catalog, group_key: &str) -> AppResult<()> {
        let group = catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        if group.step() != 1 {
            return Err(AppError::invalid_request(format!(
                "Only specification groups have a detail view, {} is in step {}",
                group.name,
                group.step()
            )));
        }
        self.drilled_group = Some(group.key().to_string());
        Ok(())
    }

    pub fn leave_drill(&mut self) {
        self.drilled_group = None;
    }

    /// Commit a step-1 group as the chosen specification
    pub fn commit_sticky(&mut self, catalog: &Catalog, group_key: &str) -> AppResult<()> {
        let group = catalog
            .group(group_key)
            .ok_or_else(|| AppError::group_not_found(group_key))?;
        self.clear_other_specifications(catalog, group);
        self.sticky_case_group = Some(group.key().to_string());
        self.prune_ineligible(catalog);
        tracing::debug!(group = group.key(), "Specification committed");
        Ok(())
    }

    /// Clear a group's selections and any pointer at it
    pub fn clear_group(&mut self, catalog: &Catalog, group_key: &str) {
        self.state.remove_group(group_key);
        if self.sticky_case_group.as_deref() == Some(group_key) {
            self.sticky_case_group = None;
        }
        if self.drilled_group.as_deref() == Some(group_key) {
            self.drilled_group = None;
        }
        self.prune_ineligible(catalog);
    }
}
