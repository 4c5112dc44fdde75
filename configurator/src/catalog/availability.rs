//! Availability Filter
//!
//! Narrows a group's items to the ones permitted for a product.
//!
//! A product without any availability row is in open mode and sees every item.
//! As soon as one row exists for the product it switches to strict whitelist
//! mode: only items with a row marked available survive, and an item with no
//! row at all is excluded.

use super::Catalog;
use shared::models::OptionItem;

/// Filtering policy in effect for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityMode {
    /// No rows for the product: nothing is filtered
    Open,
    /// At least one row: whitelist of available items
    Whitelist,
}

/// Determine the mode for a product
pub fn availability_mode(catalog: &Catalog, product_id: &str) -> AvailabilityMode {
    if catalog
        .availability()
        .iter()
        .any(|row| row.product_id == product_id)
    {
        AvailabilityMode::Whitelist
    } else {
        AvailabilityMode::Open
    }
}

/// Items of `group_id` permitted for `product_id`
///
/// Without a product every parent-matching item is returned.
pub fn filtered_items<'a>(
    catalog: &'a Catalog,
    group_id: &str,
    product_id: Option<&str>,
) -> Vec<&'a OptionItem> {
    let items = catalog.items().iter().filter(|item| item.parent_id == group_id);

    let Some(product_id) = product_id else {
        return items.collect();
    };

    match availability_mode(catalog, product_id) {
        AvailabilityMode::Open => items.collect(),
        AvailabilityMode::Whitelist => items
            .filter(|item| is_whitelisted(catalog, product_id, &item.id))
            .collect(),
    }
}

/// Whether an item may be chosen for a product under the current mode
pub fn is_item_available(catalog: &Catalog, product_id: Option<&str>, item_id: &str) -> bool {
    match product_id {
        None => true,
        Some(pid) => match availability_mode(catalog, pid) {
            AvailabilityMode::Open => true,
            AvailabilityMode::Whitelist => is_whitelisted(catalog, pid, item_id),
        },
    }
}

fn is_whitelisted(catalog: &Catalog, product_id: &str, item_id: &str) -> bool {
    catalog
        .availability()
        .iter()
        .any(|row| row.product_id == product_id && row.option_item_id == item_id && row.is_available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OptionGroup, ProductAvailability, UiConfig};

    fn item(id: &str, parent: &str) -> OptionItem {
        OptionItem {
            id: id.into(),
            parent_id: parent.into(),
            name: id.into(),
            price_modifier: 0.0,
            color_hex: None,
            image_url: None,
            is_self: false,
        }
    }

    fn row(product: &str, item: &str, available: bool) -> ProductAvailability {
        ProductAvailability {
            product_id: product.into(),
            option_item_id: item.into(),
            is_available: available,
        }
    }

    fn catalog(rows: Vec<ProductAvailability>) -> Catalog {
        let group = OptionGroup {
            id: "g".into(),
            code: None,
            name: "g".into(),
            price_modifier: 0.0,
            thumbnail: None,
            description: None,
            sub_attributes: vec![],
            ui: UiConfig { step: 1, ..Default::default() },
        };
        Catalog::new(
            vec![group],
            vec![item("a", "g"), item("b", "g"), item("c", "g"), item("z", "other")],
            rows,
        )
    }

    fn ids(items: Vec<&OptionItem>) -> Vec<&str> {
        items.into_iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_open_mode_without_rows() {
        let catalog = catalog(vec![row("other-product", "a", false)]);
        assert_eq!(availability_mode(&catalog, "p1"), AvailabilityMode::Open);
        assert_eq!(ids(filtered_items(&catalog, "g", Some("p1"))), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_whitelist_excludes_missing_and_unavailable_rows() {
        let catalog = catalog(vec![row("p1", "a", true), row("p1", "b", false)]);
        assert_eq!(availability_mode(&catalog, "p1"), AvailabilityMode::Whitelist);
        assert_eq!(ids(filtered_items(&catalog, "g", Some("p1"))), vec!["a"]);
        assert!(is_item_available(&catalog, Some("p1"), "a"));
        assert!(!is_item_available(&catalog, Some("p1"), "b"));
        assert!(!is_item_available(&catalog, Some("p1"), "c"));
    }

    #[test]
    fn test_no_product_means_no_filtering() {
        let catalog = catalog(vec![row("p1", "a", true)]);
        assert_eq!(ids(filtered_items(&catalog, "g", None)), vec!["a", "b", "c"]);
        assert!(is_item_available(&catalog, None, "c"));
    }
}
