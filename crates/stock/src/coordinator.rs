//! Allocation pipeline for one order.
//!
//! ## Allocation Flow
//!
//! ```text
//! Order + stock locations
//!   ↓
//! 1. Pick candidate locations (active, holding a record for some ordered variant)
//!   ↓
//! 2. Pack: one package per candidate, each asked in isolation
//!   ↓
//! 3. Prioritize: reconcile quantities across packages, drop empty ones
//!   ↓
//! 4. Estimate: attach costed, pre-selected shipping rates to each package
//! ```
//!
//! Candidate order matters: earlier packages keep their stock when locations compete,
//! so the order is stable (by location id unless configured otherwise).
//!
//! This module contains no IO itself; everything is borrowed from the caller.

use larder_inventory::{StockLocation, VariantOverrides};
use larder_orders::Order;

use crate::config::{AllocationConfig, LocationOrder};
use crate::error::AllocationError;
use crate::estimator::Estimator;
use crate::package::Package;
use crate::packer::Packer;
use crate::prioritizer::{Prioritizer, Unfulfilled};

/// Result of allocating an order.
#[derive(Debug, Clone)]
pub struct Allocation<'a> {
    /// Non-empty, priced packages in candidate-location order.
    pub packages: Vec<Package<'a>>,
    /// Units no location could supply, even on backorder.
    pub unfulfilled: Vec<Unfulfilled>,
}

impl Allocation<'_> {
    pub fn is_fully_allocated(&self) -> bool {
        self.unfulfilled.is_empty()
    }
}

/// Splits an order into packages across stock locations and prices them.
#[derive(Debug, Clone)]
pub struct Coordinator<'a> {
    order: &'a Order,
    stock_locations: &'a [StockLocation],
    overrides: Option<&'a VariantOverrides>,
    config: AllocationConfig,
}

impl<'a> Coordinator<'a> {
    pub fn new(order: &'a Order, stock_locations: &'a [StockLocation], config: AllocationConfig) -> Self {
        Self {
            order,
            stock_locations,
            overrides: None,
            config,
        }
    }

    /// Distributor-specific stock overrides, consulted when
    /// `use_variant_overrides` is enabled.
    pub fn with_overrides(mut self, overrides: &'a VariantOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Packages for the order: non-empty, reconciled, each with its shipping rates.
    ///
    /// Empty when no active location holds anything the order needs.
    pub fn packages(&self) -> Result<Vec<Package<'a>>, AllocationError> {
        Ok(self.allocate()?.packages)
    }

    /// Like [`packages`](Self::packages) but also reports any shortfall.
    pub fn allocate(&self) -> Result<Allocation<'a>, AllocationError> {
        let span = tracing::info_span!("allocate", order_id = %self.order.id_typed());
        let _enter = span.enter();

        let built = self.build_packages();
        let candidates = built.len();

        let prioritized = Prioritizer::new(self.order, built).prioritize();
        let mut packages = prioritized.packages;

        let estimator = Estimator::new(&self.config);
        for package in &mut packages {
            let rates = estimator.estimate(package)?;
            package.set_shipping_rates(rates);
        }

        tracing::info!(
            candidates,
            packages = packages.len(),
            unfulfilled = prioritized.unfulfilled.len(),
            "order allocated"
        );

        Ok(Allocation {
            packages,
            unfulfilled: prioritized.unfulfilled,
        })
    }

    fn build_packages(&self) -> Vec<Package<'a>> {
        let variant_ids = self.order.variant_ids();
        let overrides = self.overrides.filter(|_| self.config.use_variant_overrides);

        self.candidate_locations()
            .into_iter()
            .filter(|location| location.has_stock_for(&variant_ids))
            .map(|location| {
                let packer = Packer::new(location, self.order, &self.config);
                match overrides {
                    Some(overrides) => packer.with_overrides(overrides).package(),
                    None => packer.package(),
                }
            })
            .collect()
    }

    fn candidate_locations(&self) -> Vec<&'a StockLocation> {
        let mut locations: Vec<&'a StockLocation> = self
            .stock_locations
            .iter()
            .filter(|location| location.is_active())
            .collect();
        if self.config.location_order == LocationOrder::ById {
            locations.sort_by_key(|location| location.id_typed());
        }
        locations
    }
}
