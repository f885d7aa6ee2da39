//! Shipping module: which shipping methods can carry a package, and at what cost.
//!
//! Calculators are pluggable strategies behind [`ShippingCalculator`]; they only ever
//! see a package through the [`Shippable`] view, so this crate has no dependency on how
//! packages are built.

pub mod calculator;
pub mod method;
pub mod rate;
pub mod shippable;
pub mod tag_rule;
pub mod zone;

pub use calculator::{
    CalculatorError, CalculatorRegistry, CalculatorSpec, ShippingCalculator,
};
pub use method::{DisplayOn, ShippingMethod};
pub use rate::ShippingRate;
pub use shippable::Shippable;
pub use tag_rule::{TagRule, TagRuleApplicator, Visibility};
pub use zone::{Zone, ZoneMember};
