//! Calculators shipped with the marketplace.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use larder_core::Currency;

use super::{CalculatorError, ShippingCalculator};
use crate::shippable::Shippable;

fn parse_preferences<P: DeserializeOwned>(kind: &str, prefs: JsonValue) -> Result<P, CalculatorError> {
    // A calculator saved without preferences is stored as `null`.
    let prefs = if prefs.is_null() {
        JsonValue::Object(Default::default())
    } else {
        prefs
    };
    serde_json::from_value(prefs).map_err(|e| CalculatorError::invalid_preferences(kind, e.to_string()))
}

fn ensure_non_negative(kind: &str, field: &str, value: Decimal) -> Result<(), CalculatorError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalculatorError::invalid_preferences(
            kind,
            format!("{field} cannot be negative (got {value})"),
        ));
    }
    Ok(())
}

fn overflow(kind: &str, what: &str) -> CalculatorError {
    CalculatorError::compute_failed(kind, format!("{what} overflows a decimal"))
}

fn to_json<P: Serialize>(prefs: &P) -> JsonValue {
    serde_json::to_value(prefs).unwrap_or(JsonValue::Null)
}

/// Same cost for every package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatRatePreferences {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct FlatRate {
    prefs: FlatRatePreferences,
}

impl FlatRate {
    pub const KIND: &'static str = "flat_rate";

    pub fn new(prefs: FlatRatePreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "amount", prefs.amount)?;
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for FlatRate {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn compute(&self, _package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        Ok(Some(self.prefs.amount))
    }
}

/// Fixed amount per unit shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerItemPreferences {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct PerItem {
    prefs: PerItemPreferences,
}

impl PerItem {
    pub const KIND: &'static str = "per_item";

    pub fn new(prefs: PerItemPreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "amount", prefs.amount)?;
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for PerItem {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        let cost = self
            .prefs
            .amount
            .checked_mul(Decimal::from(package.quantity()))
            .ok_or_else(|| overflow(Self::KIND, "cost"))?;
        Ok(Some(cost))
    }
}

/// Percentage of the package's item total, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatPercentItemTotalPreferences {
    pub flat_percent: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct FlatPercentItemTotal {
    prefs: FlatPercentItemTotalPreferences,
}

impl FlatPercentItemTotal {
    pub const KIND: &'static str = "flat_percent_item_total";

    pub fn new(prefs: FlatPercentItemTotalPreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "flat_percent", prefs.flat_percent)?;
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for FlatPercentItemTotal {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        let item_total = package
            .item_total()
            .ok_or_else(|| overflow(Self::KIND, "item total"))?;
        let cost = item_total
            .checked_mul(self.prefs.flat_percent)
            .ok_or_else(|| overflow(Self::KIND, "cost"))?
            / Decimal::ONE_HUNDRED;
        Ok(Some(cost.round_dp(2)))
    }
}

/// First unit at one price, further units at another, optionally capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlexiRatePreferences {
    #[serde(default)]
    pub first_item: Decimal,
    #[serde(default)]
    pub additional_item: Decimal,
    /// Units beyond this count ship free; `0` charges every unit.
    #[serde(default)]
    pub max_items: u32,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct FlexiRate {
    prefs: FlexiRatePreferences,
}

impl FlexiRate {
    pub const KIND: &'static str = "flexi_rate";

    pub fn new(prefs: FlexiRatePreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "first_item", prefs.first_item)?;
        ensure_non_negative(Self::KIND, "additional_item", prefs.additional_item)?;
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for FlexiRate {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        let units = package.quantity();
        let charged = match self.prefs.max_items {
            0 => units,
            max => units.min(u64::from(max)),
        };
        if charged == 0 {
            return Ok(Some(Decimal::ZERO));
        }
        let cost = self
            .prefs
            .additional_item
            .checked_mul(Decimal::from(charged - 1))
            .and_then(|additional| additional.checked_add(self.prefs.first_item))
            .ok_or_else(|| overflow(Self::KIND, "cost"))?;
        Ok(Some(cost))
    }
}

/// Normal price below a spend threshold, discounted price at or above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceSackPreferences {
    pub minimal_amount: Decimal,
    pub normal_amount: Decimal,
    pub discount_amount: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct PriceSack {
    prefs: PriceSackPreferences,
}

impl PriceSack {
    pub const KIND: &'static str = "price_sack";

    pub fn new(prefs: PriceSackPreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "normal_amount", prefs.normal_amount)?;
        ensure_non_negative(Self::KIND, "discount_amount", prefs.discount_amount)?;
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for PriceSack {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        let item_total = package
            .item_total()
            .ok_or_else(|| overflow(Self::KIND, "item total"))?;
        if item_total < self.prefs.minimal_amount {
            Ok(Some(self.prefs.normal_amount))
        } else {
            Ok(Some(self.prefs.discount_amount))
        }
    }
}

/// Price per unit of package weight, optionally limited to a maximum weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightPreferences {
    pub per_unit: Decimal,
    /// Heavier packages cannot be carried by this method.
    #[serde(default)]
    pub max_weight: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone)]
pub struct Weight {
    prefs: WeightPreferences,
}

impl Weight {
    pub const KIND: &'static str = "weight";

    pub fn new(prefs: WeightPreferences) -> Result<Self, CalculatorError> {
        ensure_non_negative(Self::KIND, "per_unit", prefs.per_unit)?;
        if let Some(max) = prefs.max_weight {
            ensure_non_negative(Self::KIND, "max_weight", max)?;
        }
        Ok(Self { prefs })
    }

    pub fn from_json(prefs: JsonValue) -> Result<Self, CalculatorError> {
        Self::new(parse_preferences(Self::KIND, prefs)?)
    }
}

impl ShippingCalculator for Weight {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn preferences(&self) -> JsonValue {
        to_json(&self.prefs)
    }

    fn currency(&self) -> Option<&Currency> {
        self.prefs.currency.as_ref()
    }

    fn available(&self, package: &dyn Shippable) -> Result<bool, CalculatorError> {
        // A weight too large to represent is over any limit.
        Ok(self
            .prefs
            .max_weight
            .is_none_or(|max| package.weight().is_some_and(|weight| weight <= max)))
    }

    fn compute(&self, package: &dyn Shippable) -> Result<Option<Decimal>, CalculatorError> {
        let weight = package.weight().ok_or_else(|| overflow(Self::KIND, "weight"))?;
        // Without recorded weights there is nothing to price by.
        if weight.is_zero() {
            return Ok(None);
        }
        let cost = weight
            .checked_mul(self.prefs.per_unit)
            .ok_or_else(|| overflow(Self::KIND, "cost"))?;
        Ok(Some(cost.round_dp(2)))
    }
}
