//! Recognition Result Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured result of one reference-photo recognition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    #[serde(default)]
    pub phone_model_name: Option<String>,
    #[serde(default)]
    pub case_name: Option<String>,
    /// Attribute name -> recognized text
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}
