//! Data models shared between the engine and its callers

pub mod catalog;
pub mod recognition;
pub mod submission;

pub use catalog::{
    AttributeKind, DisplayType, OptionGroup, OptionItem, ProductAvailability, SubAttribute,
    SubAttributeOption, UiConfig,
};
pub use recognition::RecognitionResult;
pub use submission::{LabeledOptions, REFERENCE_IMAGE_KEY, Submission};
