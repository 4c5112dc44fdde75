//! Storage URL helpers

use serde::Serialize;

/// Buckets whose public URLs are recognized
pub const KNOWN_BUCKETS: &[&str] = &["models", "products", "design-assets", "design-previews"];

/// Bucket and object path of a public storage URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoragePath {
    pub bucket: String,
    pub path: String,
}

/// Split a public object URL (`.../storage/v1/object/public/<bucket>/<path>`)
///
/// Returns `None` for foreign URLs, unknown buckets and empty paths.
pub fn extract_storage_path(url: &str) -> Option<StoragePath> {
    KNOWN_BUCKETS.iter().find_map(|bucket| {
        let delimiter = format!("/storage/v1/object/public/{}/", bucket);
        let (_, rest) = url.split_once(&delimiter)?;
        // Query strings (cache busters, transforms) are not part of the object path
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        (!path.is_empty()).then(|| StoragePath {
            bucket: bucket.to_string(),
            path: path.to_string(),
        })
    })
}
