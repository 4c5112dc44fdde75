//! Option Catalog
//!
//! Immutable, normalized view of the option groups, items and availability
//! rows for one wizard session.
//!
//! - [`normalizer`] - raw record ingestion (the only place raw shapes exist)
//! - [`availability`] - product-scoped item filtering
//! - [`loader`] - bounded-latency loading from the external sources

pub mod availability;
pub mod loader;
pub mod normalizer;

pub use availability::{AvailabilityMode, availability_mode, filtered_items, is_item_available};
pub use loader::{AVAILABILITY_CACHE_KEY, CatalogCache, CatalogSource, ITEMS_CACHE_KEY, load_catalog};

use serde_json::Value;
use shared::models::{OptionGroup, OptionItem, ProductAvailability};
use std::collections::{HashMap, HashSet};

/// Normalized option catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Groups in catalog order
    groups: Vec<OptionGroup>,
    items: Vec<OptionItem>,
    availability: Vec<ProductAvailability>,
    /// group key -> index
    by_key: HashMap<String, usize>,
    /// group id -> index
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-normalized records
    ///
    /// A duplicate group key keeps the first group; items are de-duplicated by id
    /// (first occurrence wins).
    pub fn new(
        groups: Vec<OptionGroup>,
        items: Vec<OptionItem>,
        availability: Vec<ProductAvailability>,
    ) -> Self {
        let mut kept = Vec::with_capacity(groups.len());
        let mut by_key = HashMap::new();
        let mut by_id = HashMap::new();
        for group in groups {
            if by_key.contains_key(group.key()) {
                tracing::warn!(key = group.key(), "Duplicate option group key, ignoring later group");
                continue;
            }
            by_key.insert(group.key().to_string(), kept.len());
            by_id.insert(group.id.clone(), kept.len());
            kept.push(group);
        }

        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();

        Self {
            groups: kept,
            items,
            availability,
            by_key,
            by_id,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups in catalog order
    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    /// Look up a group by its selection key
    pub fn group(&self, key: &str) -> Option<&OptionGroup> {
        self.by_key.get(key).map(|&i| &self.groups[i])
    }

    /// Look up a group by id (dependency pointers use ids), falling back to key
    pub fn group_by_id(&self, id: &str) -> Option<&OptionGroup> {
        self.by_id
            .get(id)
            .or_else(|| self.by_key.get(id))
            .map(|&i| &self.groups[i])
    }

    /// Catalog position of a group (stable tie-breaker for ordering)
    pub fn position(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn items(&self) -> &[OptionItem] {
        &self.items
    }

    /// All items whose parent is the given group id
    pub fn items_of<'a>(&'a self, group_id: &str) -> impl Iterator<Item = &'a OptionItem> {
        self.items.iter().filter(move |item| item.parent_id == group_id)
    }

    /// Find a group's item by id
    pub fn item(&self, group: &OptionGroup, item_id: &str) -> Option<&OptionItem> {
        self.items
            .iter()
            .find(|item| item.parent_id == group.id && item.id == item_id)
    }

    pub fn availability(&self) -> &[ProductAvailability] {
        &self.availability
    }

    /// Groups of the given step, catalog order
    pub fn groups_in_step(&self, step: u32) -> impl Iterator<Item = &OptionGroup> {
        self.groups.iter().filter(move |g| g.step() == step)
    }
}

/// Normalize raw collections into a [`Catalog`]
///
/// `linked_group_ids` is the product-scoped filter: when present and non-empty,
/// only those groups survive, before any other processing. Items hydrated inside
/// group records are merged after the flat item collection.
pub fn normalize_catalog(
    raw_groups: &[Value],
    raw_items: &[Value],
    raw_availability: &[Value],
    linked_group_ids: Option<&[String]>,
) -> Catalog {
    let linked: Option<HashSet<&str>> = linked_group_ids
        .filter(|ids| !ids.is_empty())
        .map(|ids| ids.iter().map(String::as_str).collect());

    let mut groups = Vec::new();
    let mut hydrated = Vec::new();
    for raw in raw_groups {
        let Some(group) = normalizer::normalize_group(raw) else {
            tracing::warn!("Skipping option group record without id");
            continue;
        };
        if let Some(linked) = &linked
            && !linked.contains(group.id.as_str())
        {
            continue;
        }
        hydrated.extend(normalizer::hydrated_items(raw));
        groups.push(group);
    }

    let mut items: Vec<OptionItem> = raw_items
        .iter()
        .filter_map(|raw| normalizer::normalize_item(raw, None))
        .collect();
    items.extend(hydrated);

    let availability = raw_availability
        .iter()
        .filter_map(normalizer::normalize_availability)
        .collect();

    let catalog = Catalog::new(groups, items, availability);
    tracing::debug!(
        groups = catalog.groups.len(),
        items = catalog.items.len(),
        availability = catalog.availability.len(),
        "Catalog normalized"
    );
    catalog
}
