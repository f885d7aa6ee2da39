//! Owned records handed to the caller for persistence once allocation is done.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larder_core::{OrderId, ShippingMethodId, StockLocationId, VariantId};

use crate::package::FulfillmentState;

/// One allocated unit of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUnit {
    pub variant_id: VariantId,
    pub state: FulfillmentState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRate {
    pub shipping_method_id: ShippingMethodId,
    pub name: String,
    pub cost: Decimal,
    pub selected: bool,
}

/// A package converted into a shipment-shaped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub order_id: OrderId,
    pub stock_location_id: StockLocationId,
    pub inventory_units: Vec<InventoryUnit>,
    pub shipping_rates: Vec<ShipmentRate>,
}

impl Shipment {
    pub fn selected_rate(&self) -> Option<&ShipmentRate> {
        self.shipping_rates.iter().find(|rate| rate.selected)
    }

    /// Units in `state`.
    pub fn unit_count(&self, state: FulfillmentState) -> usize {
        self.inventory_units.iter().filter(|u| u.state == state).count()
    }
}
