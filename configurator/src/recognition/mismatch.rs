//! Case mismatch detection
//!
//! Guards against silently applying a recognized case that is a different
//! variant of the product being configured (e.g. a ProMax case photo while
//! configuring a Pro3).

use super::matcher::normalize;
use serde::Serialize;

/// Recognized case differs from the current context on a variant token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseMismatch {
    /// Case name as recognized
    pub recognized: String,
    /// Name the recognized case was compared against (group, else product)
    pub expected: String,
    /// First discriminating token found on one side only
    pub token: String,
}

/// Compare a recognized case name with the product and active group names
///
/// A recognized name containing, or contained in, either reference is a direct
/// match. Otherwise the discriminating tokens are scanned longest first and the
/// first token present on exactly one side flags a mismatch. No differing token
/// means no mismatch.
pub fn detect_mismatch(
    recognized: &str,
    product_name: Option<&str>,
    group_name: &str,
    tokens: &[String],
) -> Option<CaseMismatch> {
    let seen = normalize(recognized);
    if seen.is_empty() {
        return None;
    }
    let references: Vec<String> = [Some(group_name), product_name]
        .into_iter()
        .flatten()
        .map(normalize)
        .filter(|r| !r.is_empty())
        .collect();
    if references.is_empty() {
        return None;
    }
    if references
        .iter()
        .any(|r| seen.contains(r.as_str()) || r.contains(seen.as_str()))
    {
        return None;
    }

    let mut ordered: Vec<String> = tokens.iter().map(|t| normalize(t)).filter(|t| !t.is_empty()).collect();
    ordered.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    let token = ordered.into_iter().find(|token| {
        let in_recognized = seen.contains(token.as_str());
        let in_context = references.iter().any(|r| r.contains(token.as_str()));
        in_recognized != in_context
    })?;

    let expected = if group_name.trim().is_empty() {
        product_name.unwrap_or_default()
    } else {
        group_name
    };
    tracing::info!(recognized, expected, token = %token, "Recognized case does not match the current specification");
    Some(CaseMismatch {
        recognized: recognized.to_string(),
        expected: expected.to_string(),
        token,
    })
}
