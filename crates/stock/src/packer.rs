use larder_core::Currency;
use larder_inventory::{StockLocation, VariantOverrides};
use larder_orders::Order;

use crate::config::AllocationConfig;
use crate::package::{FulfillmentState, Package};

/// Builds the package one stock location could ship for an order, looking at that
/// location alone.
///
/// Quantities here are what the location *could* supply; reconciling them against other
/// locations is the prioritizer's job.
#[derive(Debug, Clone)]
pub struct Packer<'a> {
    stock_location: &'a StockLocation,
    order: &'a Order,
    overrides: Option<&'a VariantOverrides>,
    currency: Currency,
}

impl<'a> Packer<'a> {
    pub fn new(stock_location: &'a StockLocation, order: &'a Order, config: &AllocationConfig) -> Self {
        Self {
            stock_location,
            order,
            overrides: None,
            currency: order
                .currency()
                .cloned()
                .unwrap_or_else(|| config.default_currency.clone()),
        }
    }

    /// Consult distributor-specific stock overrides when filling.
    pub fn with_overrides(mut self, overrides: &'a VariantOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn package(&self) -> Package<'a> {
        let mut package = Package::new(self.stock_location, self.order, self.currency.clone());
        let distributor_id = self.order.distributor().id_typed();

        for (variant, quantity) in self.order.requested_quantities() {
            if self.stock_location.stock_item(&variant.id).is_none() {
                continue;
            }
            let ov = self
                .overrides
                .and_then(|overrides| overrides.get(distributor_id, variant.id));
            let status = self.stock_location.fill_status_with(&variant.id, quantity, ov);

            package.add(variant, status.on_hand, FulfillmentState::OnHand);
            package.add(variant, status.backordered, FulfillmentState::Backordered);
        }

        tracing::debug!(
            order_id = %self.order.id_typed(),
            stock_location_id = %self.stock_location.id_typed(),
            on_hand = package.quantity(Some(FulfillmentState::OnHand)),
            backordered = package.quantity(Some(FulfillmentState::Backordered)),
            "packed"
        );
        package
    }
}
