//! Prices a package against its candidate shipping methods.
//!
//! ```text
//! package.shipping_methods(apply_tags)
//!   ↓ drop methods whose calculator is unavailable for the package
//!   ↓ drop methods that do not service the ship address
//!   ↓ drop methods whose calculator is pinned to another currency
//!   ↓ compute cost per method (a declined quote drops the method)
//!   ↓ stable sort by cost
//!   ↓ select one rate
//! ```
//!
//! Selection depends on who is asking. At checkout the cheapest rate a customer may
//! actually choose (front-end eligible) is selected, and possibly none. In the back
//! office the cheapest rate is selected unconditionally.

use rust_decimal::Decimal;

use larder_shipping::{CalculatorError, ShippingMethod, ShippingRate};

use crate::config::AllocationConfig;
use crate::error::AllocationError;
use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimator {
    checkout: bool,
    apply_tags: bool,
}

impl Estimator {
    pub fn new(config: &AllocationConfig) -> Self {
        Self {
            checkout: config.checkout,
            apply_tags: config.apply_tags,
        }
    }

    /// Rates for `package` using the configured selection policy and tag handling.
    pub fn estimate<'a>(&self, package: &Package<'a>) -> Result<Vec<ShippingRate<'a>>, AllocationError> {
        self.shipping_rates(package, self.checkout, self.apply_tags)
    }

    /// Eligible, costed rates for `package`, cheapest first, with at most one selected.
    ///
    /// Calculator failures propagate; a package nobody can ship gets an empty list.
    pub fn shipping_rates<'a>(
        &self,
        package: &Package<'a>,
        checkout: bool,
        apply_tags: bool,
    ) -> Result<Vec<ShippingRate<'a>>, AllocationError> {
        let methods = self.eligible_methods(package, apply_tags)?;

        let mut rates = Vec::with_capacity(methods.len());
        for method in methods {
            let Some(cost) = method.calculator().compute(package)? else {
                tracing::debug!(shipping_method = method.name(), "calculator declined to quote");
                continue;
            };
            if cost < Decimal::ZERO {
                return Err(CalculatorError::compute_failed(
                    method.calculator().kind(),
                    format!("negative cost {cost} for {}", method.name()),
                )
                .into());
            }
            rates.push(ShippingRate::new(method, cost));
        }

        // `sort_by` is stable: equal costs keep the distributor's method order.
        rates.sort_by(|a, b| a.cost.cmp(&b.cost));
        select_rate(&mut rates, checkout);

        tracing::debug!(
            order_id = %package.order().id_typed(),
            stock_location_id = %package.stock_location().id_typed(),
            rates = rates.len(),
            checkout,
            "estimated shipping rates"
        );
        Ok(rates)
    }

    fn eligible_methods<'a>(
        &self,
        package: &Package<'a>,
        apply_tags: bool,
    ) -> Result<Vec<&'a ShippingMethod>, AllocationError> {
        let order = package.order();
        let currency = larder_shipping::Shippable::currency(package);

        let mut eligible = Vec::new();
        for method in package.shipping_methods(apply_tags) {
            let calculator = method.calculator();
            if !calculator.available(package)? {
                continue;
            }
            if !method.include(order.ship_address()) {
                continue;
            }
            if calculator.currency().is_some_and(|c| c != currency) {
                continue;
            }
            eligible.push(method);
        }
        Ok(eligible)
    }
}

fn select_rate(rates: &mut [ShippingRate<'_>], checkout: bool) {
    let pick = if checkout {
        rates
            .iter()
            .position(|rate| rate.shipping_method.frontend_eligible())
    } else {
        (!rates.is_empty()).then_some(0)
    };
    if let Some(index) = pick {
        rates[index].selected = true;
    }
}
