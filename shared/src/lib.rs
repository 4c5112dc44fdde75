//! Shared types for the case configurator
//!
//! Catalog models in their strict internal schema, the tagged selection key,
//! recognition/submission payloads and the unified error system.

pub mod error;
pub mod models;
pub mod selection;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use selection::{SelectionKey, TEXT_FALLBACK_SUFFIX};
