//! Catalog-driven engine rules
//!
//! Side effects and recognition heuristics match display names against these
//! word lists instead of hardcoding catalog identifiers.

use super::Config;
use crate::pricing::SpecPricePolicy;

/// Engine rules for one wizard session
#[derive(Debug, Clone)]
pub struct EngineRules {
    /// Group whose glossy choice forces the embossing group
    pub protection_group_key: String,
    /// Group forced to its "none" item
    pub embossing_group_key: String,
    /// Substrings denoting a glossy finish
    pub glossy_markers: Vec<String>,
    /// Substrings denoting a matte finish (override glossy)
    pub matte_markers: Vec<String>,
    /// Substrings denoting the "none" item
    pub none_markers: Vec<String>,
    /// Variant/edition tokens that discriminate case names, longest first
    pub discriminating_tokens: Vec<String>,
    pub spec_price_policy: SpecPricePolicy,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            protection_group_key: "protection".into(),
            embossing_group_key: "embossing".into(),
            glossy_markers: words(&["亮面", "光面", "glossy", "gloss"]),
            matte_markers: words(&["霧面", "雾面", "磨砂", "matte", "非亮面"]),
            none_markers: words(&["無", "无", "不需要", "none"]),
            discriminating_tokens: words(&[
                "promax", "ultra", "plus", "mini", "lite", "max", "pro", "fold", "flip", "magsafe",
                "磁吸", "標準", "标准", "防摔", "軍規", "透明", "皮革",
            ]),
            spec_price_policy: SpecPricePolicy::default(),
        }
    }
}

impl EngineRules {
    /// Rules with the configured group keys and pricing policy
    pub fn from_config(config: &Config) -> Self {
        Self {
            protection_group_key: config.protection_group_key.clone(),
            embossing_group_key: config.embossing_group_key.clone(),
            spec_price_policy: config.spec_price_policy,
            ..Self::default()
        }
    }

    /// Glossy and not matte
    pub fn is_glossy(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        let has = |markers: &[String]| markers.iter().any(|m| lower.contains(&m.to_lowercase()));
        has(&self.glossy_markers) && !has(&self.matte_markers)
    }

    pub fn is_none_item(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        self.none_markers
            .iter()
            .any(|m| lower.contains(&m.to_lowercase()))
    }
}
