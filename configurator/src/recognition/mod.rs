//! AI Recognition
//!
//! - [`matcher`] - normalized name matching
//! - [`mismatch`] - recognized case vs. current specification
//! - [`reconciler`] - applying a result to the drilled-into group
//! - [`tracker`] - only the latest upload's result may apply
//! - [`highlight`] - transient "freshly matched" markers

pub mod highlight;
pub mod matcher;
pub mod mismatch;
pub mod reconciler;
pub mod tracker;

pub use highlight::{FreshMatches, HighlightTimer};
pub use matcher::normalize;
pub use mismatch::{CaseMismatch, detect_mismatch};
pub use reconciler::{ReconcileReport, reconcile};
pub use tracker::{RecognitionTicket, RecognitionTracker};

use serde::{Deserialize, Serialize};

/// User choice on a mismatch warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchResolution {
    /// Discard this recognition and upload another photo
    Retry,
    /// Leave the drilled group and pick the specification again
    RepickSpecification,
}
