use std::collections::HashMap;
use std::sync::Arc;

use larder_core::{Address, Currency, DomainError, DomainResult, OrderId, VariantId};

use crate::distributor::Distributor;
use crate::variant::Variant;

/// Order line: variant and ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    variant: Arc<Variant>,
    quantity: u32,
}

impl LineItem {
    pub fn new(variant: Arc<Variant>, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity", "must be positive"));
        }
        Ok(Self { variant, quantity })
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// An order awaiting fulfilment.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    distributor: Arc<Distributor>,
    currency: Option<Currency>,
    ship_address: Option<Address>,
    customer_tags: Vec<String>,
    line_items: Vec<LineItem>,
}

impl Order {
    pub fn new(id: OrderId, distributor: Arc<Distributor>) -> Self {
        Self {
            id,
            distributor,
            currency: None,
            ship_address: None,
            customer_tags: Vec::new(),
            line_items: Vec::new(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_ship_address(mut self, address: Address) -> Self {
        self.ship_address = Some(address);
        self
    }

    pub fn with_customer_tag(mut self, tag: impl Into<String>) -> Self {
        self.customer_tags.push(tag.into());
        self
    }

    pub fn with_line_item(mut self, line_item: LineItem) -> Self {
        self.line_items.push(line_item);
        self
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.currency.as_ref()
    }

    pub fn ship_address(&self) -> Option<&Address> {
        self.ship_address.as_ref()
    }

    pub fn customer_tags(&self) -> &[String] {
        &self.customer_tags
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Distinct variants referenced by the line items, in first-appearance order.
    pub fn variant_ids(&self) -> Vec<VariantId> {
        self.requested_quantities()
            .into_iter()
            .map(|(variant, _)| variant.id)
            .collect()
    }

    /// One `(variant, total quantity)` entry per distinct variant, in first-appearance
    /// order. Repeated lines for the same variant are summed.
    pub fn requested_quantities(&self) -> Vec<(&Variant, u32)> {
        let mut positions: HashMap<VariantId, usize> = HashMap::new();
        let mut requested: Vec<(&Variant, u32)> = Vec::new();
        for line in &self.line_items {
            match positions.get(&line.variant.id) {
                Some(&i) => requested[i].1 = requested[i].1.saturating_add(line.quantity),
                None => {
                    positions.insert(line.variant.id, requested.len());
                    requested.push((line.variant(), line.quantity));
                }
            }
        }
        requested
    }
}
