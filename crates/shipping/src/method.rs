use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use larder_core::{Address, ShippingCategoryId, ShippingMethodId};

use crate::calculator::ShippingCalculator;
use crate::zone::Zone;

/// Where a shipping method may be offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOn {
    #[default]
    Both,
    FrontEnd,
    BackEnd,
}

/// A way of getting a package to the customer (delivery run, pickup point, courier).
#[derive(Debug, Clone)]
pub struct ShippingMethod {
    id: ShippingMethodId,
    name: String,
    display_on: DisplayOn,
    requires_ship_address: bool,
    zones: Vec<Zone>,
    shipping_categories: BTreeSet<ShippingCategoryId>,
    tags: Vec<String>,
    calculator: Arc<dyn ShippingCalculator>,
}

impl ShippingMethod {
    /// A delivery method (requires a ship address) available everywhere and in both
    /// front and back office, with no categories or tags yet.
    pub fn new(
        id: ShippingMethodId,
        name: impl Into<String>,
        calculator: Arc<dyn ShippingCalculator>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            display_on: DisplayOn::Both,
            requires_ship_address: true,
            zones: Vec::new(),
            shipping_categories: BTreeSet::new(),
            tags: Vec::new(),
            calculator,
        }
    }

    pub fn with_display_on(mut self, display_on: DisplayOn) -> Self {
        self.display_on = display_on;
        self
    }

    /// Pickup methods do not need a ship address.
    pub fn with_requires_ship_address(mut self, requires: bool) -> Self {
        self.requires_ship_address = requires;
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_shipping_category(mut self, category: ShippingCategoryId) -> Self {
        self.shipping_categories.insert(category);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn id_typed(&self) -> ShippingMethodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_on(&self) -> DisplayOn {
        self.display_on
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn shipping_categories(&self) -> &BTreeSet<ShippingCategoryId> {
        &self.shipping_categories
    }

    pub fn calculator(&self) -> &dyn ShippingCalculator {
        self.calculator.as_ref()
    }

    /// Whether customers may pick this method during checkout.
    pub fn frontend_eligible(&self) -> bool {
        self.display_on != DisplayOn::BackEnd
    }

    /// Whether this method can ship to `address`.
    pub fn include(&self, address: Option<&Address>) -> bool {
        if !self.requires_ship_address {
            return true;
        }
        let Some(address) = address else {
            return false;
        };
        self.zones.is_empty() || self.zones.iter().any(|z| z.include(address))
    }

    /// Whether this method may carry every category in `categories`.
    pub fn covers(&self, categories: &BTreeSet<ShippingCategoryId>) -> bool {
        categories.is_subset(&self.shipping_categories)
    }
}
