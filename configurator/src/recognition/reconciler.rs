//! Recognition Reconciler
//!
//! Maps one recognition result onto the drilled-into group only. Matched
//! values land in the selection; unmatched text lands in the pending fallback
//! map so the user still has to pick a catalog option (or accept the text).

use super::matcher::{find_attribute, find_option};
use super::mismatch::{CaseMismatch, detect_mismatch};
use crate::catalog::Catalog;
use crate::core::EngineRules;
use crate::wizard::SelectionMachine;
use serde::Serialize;
use shared::SelectionKey;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::RecognitionResult;

/// What a reconciliation did to the selection
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Group the result was applied to
    pub group_key: String,
    /// Keys filled with a catalog option (to highlight)
    pub matched: Vec<SelectionKey>,
    /// Keys holding recognized text awaiting a catalog choice
    pub fallbacks: Vec<SelectionKey>,
    /// Spec names matching no attribute of the group
    pub unmatched_specs: Vec<String>,
    pub mismatch: Option<CaseMismatch>,
    /// The group was committed as the specification
    pub committed: bool,
}

/// Apply a recognition result to the drilled-into group
pub fn reconcile(
    machine: &mut SelectionMachine,
    catalog: &Catalog,
    rules: &EngineRules,
    product_name: Option<&str>,
    result: &RecognitionResult,
) -> AppResult<ReconcileReport> {
    let active = machine
        .drilled_group()
        .ok_or_else(|| AppError::new(ErrorCode::NoActiveGroup))?
        .to_string();
    let group = catalog
        .group(&active)
        .ok_or_else(|| AppError::group_not_found(active.as_str()))?;

    let mut report = ReconcileReport {
        group_key: group.key().to_string(),
        ..Default::default()
    };

    for (spec_name, text) in &result.specs {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let Some(attribute) = find_attribute(group, spec_name) else {
            report.unmatched_specs.push(spec_name.clone());
            continue;
        };
        let key = SelectionKey::attribute(group.key(), attribute.id.as_str(), group.step());
        let state = machine.state_mut();
        match find_option(attribute, text) {
            Some(option) => {
                state.clear_fallback(&key);
                state.insert(key.clone(), option.id.as_str());
                report.matched.push(key);
            }
            None => {
                // 未匹配: 旧值作废, 必须重新选择目录选项
                state.remove(&key);
                state.clear_fallback(&key);
                state.set_pending_fallback(key.clone(), text);
                report.fallbacks.push(key);
            }
        }
    }

    report.mismatch = result
        .case_name
        .as_deref()
        .and_then(|name| detect_mismatch(name, product_name, &group.name, &rules.discriminating_tokens));

    if report.mismatch.is_none() {
        machine.commit_sticky(catalog, &active)?;
        report.committed = true;
    }

    tracing::info!(
        group = %report.group_key,
        matched = report.matched.len(),
        fallbacks = report.fallbacks.len(),
        unmatched = report.unmatched_specs.len(),
        mismatch = report.mismatch.is_some(),
        "Recognition reconciled"
    );
    Ok(report)
}
