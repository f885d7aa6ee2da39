//! Shipping cost calculators.
//!
//! A calculator is a strategy object attached to a shipping method. The estimator asks
//! it two questions about a package: can you carry this (`available`), and what does it
//! cost (`compute`). Returning `Ok(None)` from `compute` means the calculator declines
//! to quote; the method is then left out of the rate list rather than treated as free.
//!
//! Errors are reserved for genuinely broken calculators (bad preferences, internal
//! failures). They propagate to the caller unchanged.

mod builtin;
mod registry;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use larder_core::Currency;

use crate::shippable::Shippable;

pub use builtin::{
    FlatPercentItemTotal, FlatPercentItemTotalPreferences, FlatRate, FlatRatePreferences,
    FlexiRate, FlexiRatePreferences, PerItem, PerItemPreferences, PriceSack,
    PriceSackPreferences, Weight, WeightPreferences,
};
pub use registry::{CalculatorFactory, CalculatorRegistry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("unknown calculator kind: {0}")]
    UnknownKind(String),

    #[error("calculator kind already registered: {0}")]
    DuplicateKind(String),

    #[error("invalid preferences for {kind}: {reason}")]
    InvalidPreferences { kind: String, reason: String },

    #[error("{kind} failed to compute: {reason}")]
    ComputeFailed { kind: String, reason: String },
}

impl CalculatorError {
    pub fn invalid_preferences(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPreferences {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    pub fn compute_failed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ComputeFailed {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Pluggable shipping cost strategy.
pub trait ShippingCalculator: core::fmt::Debug + Send + Sync {
    /// Registry key of this calculator (e.g. `"flat_rate"`).
    fn kind(&self) -> &'static str;

    /// Configured preferences, as they would be stored.
    fn preferences(&self) -> JsonValue;

    /// Currency the calculator quotes in, if it is restricted to one.
    fn currency(&self) -> Option<&Currency>;

    /// Whether the calculator can handle this package at all.
    fn available(&self, _package: &dyn Shippable) -> Result<bool, CalculatorError> {
        Ok(true)
    }

    /// Cost of shipping `package`, or `None` when the calculator declines to quote.
    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError>;
}

/// Stored form of a calculator: its kind plus a JSON preferences object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculatorSpec {
    pub kind: String,
    #[serde(default)]
    pub preferences: JsonValue,
}

impl CalculatorSpec {
    pub fn new(kind: impl Into<String>, preferences: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            preferences,
        }
    }
}
