//! Allocation settings.
//!
//! Everything the pipeline would otherwise read from ambient global state (default
//! currency, feature toggles) is carried here and passed to each stage explicitly.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use larder_core::{Currency, DomainError};

/// Order in which the coordinator visits stock locations.
///
/// Earlier locations are preferred when quantities are reconciled, so this must be
/// stable for allocations to be reproducible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationOrder {
    /// Ascending stock location id.
    #[default]
    ById,
    /// The order the caller supplied the locations in.
    AsGiven,
}

impl FromStr for LocationOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "by_id" => Ok(Self::ById),
            "as_given" => Ok(Self::AsGiven),
            other => Err(DomainError::validation(
                "location_order",
                format!("expected by_id or as_given, got {other:?}"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Currency assumed for orders that do not carry one.
    pub default_currency: Currency,
    /// Rate selection policy used when the coordinator estimates packages.
    pub checkout: bool,
    /// Whether distributor tag rules filter candidate shipping methods.
    pub apply_tags: bool,
    pub location_order: LocationOrder,
    /// Whether distributor-specific variant overrides feed stock fill status.
    pub use_variant_overrides: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::usd(),
            checkout: true,
            apply_tags: true,
            location_order: LocationOrder::ById,
            use_variant_overrides: true,
        }
    }
}

impl AllocationConfig {
    pub const DEFAULT_CURRENCY_VAR: &'static str = "LARDER_DEFAULT_CURRENCY";
    pub const CHECKOUT_VAR: &'static str = "LARDER_CHECKOUT";
    pub const APPLY_TAGS_VAR: &'static str = "LARDER_APPLY_TAGS";
    pub const LOCATION_ORDER_VAR: &'static str = "LARDER_LOCATION_ORDER";
    pub const USE_VARIANT_OVERRIDES_VAR: &'static str = "LARDER_USE_VARIANT_OVERRIDES";

    /// Defaults overridden by `LARDER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LARDER_*` name.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::DEFAULT_CURRENCY_VAR) {
            match Currency::new(&raw) {
                Ok(currency) => config.default_currency = currency,
                Err(err) => tracing::warn!(var = Self::DEFAULT_CURRENCY_VAR, %err, "ignoring invalid setting"),
            }
        }
        if let Some(raw) = lookup(Self::LOCATION_ORDER_VAR) {
            match raw.parse() {
                Ok(order) => config.location_order = order,
                Err(err) => tracing::warn!(var = Self::LOCATION_ORDER_VAR, %err, "ignoring invalid setting"),
            }
        }
        read_flag(&lookup, Self::CHECKOUT_VAR, &mut config.checkout);
        read_flag(&lookup, Self::APPLY_TAGS_VAR, &mut config.apply_tags);
        read_flag(&lookup, Self::USE_VARIANT_OVERRIDES_VAR, &mut config.use_variant_overrides);

        config
    }
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, var: &str, target: &mut bool) {
    let Some(raw) = lookup(var) else {
        return;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => *target = true,
        "0" | "false" | "no" | "off" => *target = false,
        _ => tracing::warn!(var, value = %raw, "ignoring invalid boolean setting"),
    }
}
