//! Catalog Loader
//!
//! Groups come from the catalog source; items and availability come from a
//! local cache under two fixed keys. Every cache read races a timeout, and a
//! timeout, error or absent entry all resolve to an empty collection: partial
//! data must never keep the wizard from rendering.

use super::{Catalog, normalize_catalog};
use crate::services::ServiceResult;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Cache key of the flat option-item collection
pub const ITEMS_CACHE_KEY: &str = "option_items";
/// Cache key of the product-availability collection
pub const AVAILABILITY_CACHE_KEY: &str = "product_availability";

/// Remote catalog source
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw option-group records (may carry hydrated items)
    async fn load_option_groups(&self) -> ServiceResult<Vec<Value>>;

    /// Group ids linked to a product; `None` when the product has no filter
    async fn linked_group_ids(&self, product_id: &str) -> ServiceResult<Option<Vec<String>>>;
}

/// Local bounded-latency cache
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn read(&self, key: &str) -> ServiceResult<Option<Vec<Value>>>;
}

/// Read one cache entry, treating slow/absent/failed reads as empty
async fn read_cached(cache: &dyn CatalogCache, key: &str, timeout: Duration) -> Vec<Value> {
    match tokio::time::timeout(timeout, cache.read(key)).await {
        Ok(Ok(Some(values))) => values,
        Ok(Ok(None)) => {
            tracing::debug!(key, "Cache entry absent, using empty collection");
            vec![]
        }
        Ok(Err(e)) => {
            tracing::warn!(key, error = %e, "Cache read failed, using empty collection");
            vec![]
        }
        Err(_) => {
            tracing::warn!(key, timeout_ms = timeout.as_millis() as u64, "Cache read timed out, using empty collection");
            vec![]
        }
    }
}

/// Load and normalize the catalog for one wizard session
pub async fn load_catalog(
    source: &dyn CatalogSource,
    cache: &dyn CatalogCache,
    product_id: Option<&str>,
    cache_timeout: Duration,
) -> Catalog {
    let groups_fut = async {
        match source.load_option_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load option groups");
                vec![]
            }
        }
    };
    let linked_fut = async {
        let pid = product_id?;
        match source.linked_group_ids(pid).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(product_id = pid, error = %e, "Failed to load product group filter, applying all groups");
                None
            }
        }
    };

    let (groups, linked, items, availability) = tokio::join!(
        groups_fut,
        linked_fut,
        read_cached(cache, ITEMS_CACHE_KEY, cache_timeout),
        read_cached(cache, AVAILABILITY_CACHE_KEY, cache_timeout),
    );

    let catalog = normalize_catalog(&groups, &items, &availability, linked.as_deref());
    if catalog.is_empty() {
        tracing::warn!("Option catalog is empty");
    } else {
        tracing::info!(
            groups = catalog.groups().len(),
            items = catalog.items().len(),
            "Option catalog loaded"
        );
    }
    catalog
}
