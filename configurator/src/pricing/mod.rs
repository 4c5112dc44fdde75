//! Pricing Engine
//!
//! Prices the current selection from the catalog modifiers. Money arithmetic
//! runs on `rust_decimal` and is rounded back to 2 decimal places.

mod calculator;
pub mod classify;

pub use calculator::*;
pub use classify::*;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

// ==================== Conversion Helpers ====================

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

// ==================== Specification policy ====================

/// How a step-1 plain choice combines item and group modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecPricePolicy {
    /// Group modifier is a "starting at" price replaced by a positive item modifier
    #[default]
    ItemOrGroup,
    /// Item and group modifiers add up (self placeholders excepted)
    ItemPlusGroup,
}

impl SpecPricePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecPricePolicy::ItemOrGroup => "item_or_group",
            SpecPricePolicy::ItemPlusGroup => "item_plus_group",
        }
    }
}

impl fmt::Display for SpecPricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecPricePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item_or_group" => Ok(SpecPricePolicy::ItemOrGroup),
            "item_plus_group" => Ok(SpecPricePolicy::ItemPlusGroup),
            other => Err(format!("unknown spec price policy: {}", other)),
        }
    }
}
