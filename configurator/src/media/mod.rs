//! Media helpers
//!
//! - [`image_prep`] - reference photo validation and re-encoding
//! - [`storage`] - public storage URL parsing

pub mod image_prep;
pub mod storage;

pub use image_prep::{ImageLimits, prepare_reference_image};
pub use storage::{KNOWN_BUCKETS, StoragePath, extract_storage_path};
