use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larder_core::{Currency, ShippingCategoryId, VariantId};
use larder_inventory::StockLocation;
use larder_orders::{Order, Variant};
use larder_shipping::{Shippable, ShippingMethod, ShippingRate, TagRuleApplicator};

use crate::shipment::{InventoryUnit, Shipment, ShipmentRate};

/// Whether allocated units are physically there or promised on backorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentState {
    OnHand,
    Backordered,
}

/// Units of one variant in one fulfilment state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem<'a> {
    pub variant: &'a Variant,
    pub quantity: u32,
    pub state: FulfillmentState,
}

impl ContentItem<'_> {
    /// `None` if the product overflows a `Decimal`.
    pub fn weight(&self) -> Option<Decimal> {
        self.variant.weight.checked_mul(Decimal::from(self.quantity))
    }

    /// `None` if the product overflows a `Decimal`.
    pub fn amount(&self) -> Option<Decimal> {
        self.variant.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// What one stock location will ship for an order, pending conversion into a shipment.
///
/// Contents hold at most one item per `(variant, state)`.
#[derive(Debug, Clone)]
pub struct Package<'a> {
    stock_location: &'a StockLocation,
    order: &'a Order,
    currency: Currency,
    contents: Vec<ContentItem<'a>>,
    shipping_rates: Vec<ShippingRate<'a>>,
}

impl<'a> Package<'a> {
    pub fn new(stock_location: &'a StockLocation, order: &'a Order, currency: Currency) -> Self {
        Self {
            stock_location,
            order,
            currency,
            contents: Vec::new(),
            shipping_rates: Vec::new(),
        }
    }

    pub fn stock_location(&self) -> &'a StockLocation {
        self.stock_location
    }

    pub fn order(&self) -> &'a Order {
        self.order
    }

    pub fn contents(&self) -> &[ContentItem<'a>] {
        &self.contents
    }

    /// Add `quantity` units, merging into an existing item for the same variant and state.
    pub fn add(&mut self, variant: &'a Variant, quantity: u32, state: FulfillmentState) {
        if quantity == 0 {
            return;
        }
        match self.find_item(&variant.id, state) {
            Some(index) => {
                let item = &mut self.contents[index];
                item.quantity = item.quantity.saturating_add(quantity);
            }
            None => self.contents.push(ContentItem {
                variant,
                quantity,
                state,
            }),
        }
    }

    /// Index of the item for `(variant, state)`, if present.
    pub fn find_item(&self, variant_id: &VariantId, state: FulfillmentState) -> Option<usize> {
        self.contents
            .iter()
            .position(|item| item.variant.id == *variant_id && item.state == state)
    }

    pub fn item(&self, index: usize) -> Option<&ContentItem<'a>> {
        self.contents.get(index)
    }

    /// Overwrite the quantity of the item at `index`. Out-of-range indexes are ignored.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(item) = self.contents.get_mut(index) {
            item.quantity = quantity;
        }
    }

    /// Drop items whose quantity has been reduced to zero.
    pub fn remove_empty_items(&mut self) {
        self.contents.retain(|item| item.quantity > 0);
    }

    /// Total units, optionally restricted to one state.
    ///
    /// Widened to `u64`: several line items near `u32::MAX` still add up exactly.
    pub fn quantity(&self, state: Option<FulfillmentState>) -> u64 {
        self.contents
            .iter()
            .filter(|item| state.is_none_or(|s| item.state == s))
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.iter().all(|item| item.quantity == 0)
    }

    /// Sum of `variant.weight * quantity` over the contents; `None` on overflow.
    pub fn weight(&self) -> Option<Decimal> {
        checked_total(self.contents.iter().map(ContentItem::weight))
    }

    /// Sum of `variant.price * quantity` over the contents; `None` on overflow.
    pub fn item_total(&self) -> Option<Decimal> {
        checked_total(self.contents.iter().map(ContentItem::amount))
    }

    pub fn on_hand(&self) -> impl Iterator<Item = &ContentItem<'a>> {
        self.contents
            .iter()
            .filter(|item| item.state == FulfillmentState::OnHand)
    }

    pub fn backordered(&self) -> impl Iterator<Item = &ContentItem<'a>> {
        self.contents
            .iter()
            .filter(|item| item.state == FulfillmentState::Backordered)
    }

    /// Shipping categories of everything in the package.
    pub fn shipping_categories(&self) -> BTreeSet<ShippingCategoryId> {
        self.contents
            .iter()
            .map(|item| item.variant.shipping_category)
            .collect()
    }

    /// Candidate shipping methods: the distributor's methods that can carry every
    /// category in the package, filtered by the customer's tag rules when `apply_tags`.
    ///
    /// Front-end eligibility is not applied here; the estimator decides it when it
    /// selects a rate.
    pub fn shipping_methods(&self, apply_tags: bool) -> Vec<&'a ShippingMethod> {
        let distributor = self.order.distributor();
        let categories = self.shipping_categories();
        let covering = distributor
            .shipping_methods()
            .iter()
            .filter(|method| method.covers(&categories));

        if apply_tags {
            TagRuleApplicator::new(distributor.tag_rules(), self.order.customer_tags())
                .filter(covering)
        } else {
            covering.collect()
        }
    }

    pub fn shipping_rates(&self) -> &[ShippingRate<'a>] {
        &self.shipping_rates
    }

    pub fn set_shipping_rates(&mut self, rates: Vec<ShippingRate<'a>>) {
        self.shipping_rates = rates;
    }

    pub fn selected_shipping_rate(&self) -> Option<&ShippingRate<'a>> {
        self.shipping_rates.iter().find(|rate| rate.selected)
    }

    /// Owned hand-off record: one inventory unit per allocated unit, plus the rates.
    pub fn to_shipment(&self) -> Shipment {
        let inventory_units = self
            .contents
            .iter()
            .flat_map(|item| {
                (0..item.quantity).map(move |_| InventoryUnit {
                    variant_id: item.variant.id,
                    state: item.state,
                })
            })
            .collect();
        let shipping_rates = self
            .shipping_rates
            .iter()
            .map(|rate| ShipmentRate {
                shipping_method_id: rate.shipping_method.id_typed(),
                name: rate.shipping_method.name().to_string(),
                cost: rate.cost,
                selected: rate.selected,
            })
            .collect();

        Shipment {
            order_id: self.order.id_typed(),
            stock_location_id: self.stock_location.id_typed(),
            inventory_units,
            shipping_rates,
        }
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Option<Decimal>>) -> Option<Decimal> {
    amounts.try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount?))
}

impl Shippable for Package<'_> {
    fn quantity(&self) -> u64 {
        self.quantity(None)
    }

    fn weight(&self) -> Option<Decimal> {
        self.weight()
    }

    fn item_total(&self) -> Option<Decimal> {
        self.item_total()
    }

    fn currency(&self) -> &Currency {
        &self.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use larder_core::{Address, DistributorId, OrderId, ShippingMethodId, StockLocationId};
    use larder_orders::Distributor;
    use larder_shipping::calculator::FlatRate;
    use larder_shipping::{TagRule, Visibility};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use uuid::Uuid;

    fn test_category(n: u128) -> ShippingCategoryId {
        ShippingCategoryId::from_uuid(Uuid::from_u128(n))
    }

    fn test_variant(n: u128, category: u128) -> Variant {
        Variant::new(
            VariantId::from_uuid(Uuid::from_u128(n)),
            format!("SKU-{n}"),
            dec!(3.00),
            test_category(category),
        )
        .with_weight(dec!(0.5))
    }

    fn test_method(n: u128, categories: &[u128]) -> ShippingMethod {
        let calculator = Arc::new(FlatRate::from_json(json!({ "amount": n as u64 })).unwrap());
        let mut method =
            ShippingMethod::new(ShippingMethodId::from_uuid(Uuid::from_u128(n)), format!("m{n}"), calculator);
        for c in categories {
            method = method.with_shipping_category(test_category(*c));
        }
        method
    }

    fn test_location() -> StockLocation {
        StockLocation::new(StockLocationId::from_uuid(Uuid::from_u128(1)), "Shed")
    }

    fn test_order(distributor: Distributor) -> Order {
        Order::new(OrderId::from_uuid(Uuid::from_u128(5)), Arc::new(distributor))
            .with_ship_address(Address::new("AU"))
    }

    fn test_distributor() -> Distributor {
        Distributor::new(DistributorId::from_uuid(Uuid::from_u128(3)), "Hub")
    }

    #[test]
    fn add_merges_same_variant_and_state() {
        let location = test_location();
        let order = test_order(test_distributor());
        let v = test_variant(10, 1);
        let mut package = Package::new(&location, &order, Currency::usd());

        package.add(&v, 2, FulfillmentState::OnHand);
        package.add(&v, 3, FulfillmentState::OnHand);
        package.add(&v, 1, FulfillmentState::Backordered);
        package.add(&v, 0, FulfillmentState::Backordered);

        assert_eq!(package.contents().len(), 2);
        assert_eq!(package.quantity(None), 6);
        assert_eq!(package.quantity(Some(FulfillmentState::OnHand)), 5);
        assert_eq!(package.quantity(Some(FulfillmentState::Backordered)), 1);
        assert_eq!(package.on_hand().count(), 1);
        assert_eq!(package.backordered().count(), 1);
    }

    #[test]
    fn find_item_and_set_quantity_work_by_index() {
        let location = test_location();
        let order = test_order(test_distributor());
        let v = test_variant(10, 1);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&v, 4, FulfillmentState::Backordered);

        assert!(package.find_item(&v.id, FulfillmentState::OnHand).is_none());
        let index = package.find_item(&v.id, FulfillmentState::Backordered).unwrap();
        package.set_quantity(index, 0);
        assert!(package.is_empty());

        package.remove_empty_items();
        assert!(package.contents().is_empty());
    }

    #[test]
    fn weight_and_item_total_sum_over_contents() {
        let location = test_location();
        let order = test_order(test_distributor());
        let v1 = test_variant(10, 1);
        let v2 = test_variant(11, 1).with_weight(dec!(2));
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&v1, 2, FulfillmentState::OnHand);
        package.add(&v2, 1, FulfillmentState::Backordered);

        assert_eq!(package.weight(), Some(dec!(3.0)));
        assert_eq!(package.item_total(), Some(dec!(9.00)));
        assert_eq!(Shippable::quantity(&package), 3);
    }

    #[test]
    fn totals_do_not_wrap_for_large_line_items() {
        let location = test_location();
        let order = test_order(test_distributor());
        let v1 = test_variant(10, 1);
        let v2 = test_variant(11, 1);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&v1, 1 << 31, FulfillmentState::OnHand);
        package.add(&v2, 1 << 31, FulfillmentState::OnHand);

        assert_eq!(package.quantity(None), 1 << 32);
        assert_eq!(Shippable::quantity(&package), 1 << 32);
        assert!(!package.is_empty());
    }

    #[test]
    fn weight_is_none_when_it_overflows() {
        let location = test_location();
        let order = test_order(test_distributor());
        let heavy = test_variant(10, 1).with_weight(Decimal::MAX);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&heavy, 1, FulfillmentState::OnHand);
        assert_eq!(package.weight(), Some(Decimal::MAX));

        package.add(&heavy, 1, FulfillmentState::Backordered);
        assert_eq!(package.weight(), None);
        assert_eq!(package.item_total(), Some(dec!(6.00)));
    }

    #[test]
    fn shipping_methods_must_cover_every_category() {
        let distributor = test_distributor()
            .with_shipping_method(test_method(1, &[1]))
            .with_shipping_method(test_method(2, &[1, 2]));
        let order = test_order(distributor);
        let location = test_location();
        let chilled = test_variant(10, 2);
        let dry = test_variant(11, 1);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&chilled, 1, FulfillmentState::OnHand);
        package.add(&dry, 1, FulfillmentState::OnHand);

        let names: Vec<_> = package.shipping_methods(true).iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["m2"]);
    }

    #[test]
    fn shipping_methods_apply_tag_rules_on_request() {
        let distributor = test_distributor()
            .with_shipping_method(test_method(1, &[1]).with_tag("bulk"))
            .with_shipping_method(test_method(2, &[1]))
            .with_tag_rule(TagRule::default_rule(vec!["bulk".to_string()], Visibility::Hidden));
        let order = test_order(distributor);
        let location = test_location();
        let v = test_variant(10, 1);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&v, 1, FulfillmentState::OnHand);

        assert_eq!(package.shipping_methods(true).len(), 1);
        assert_eq!(package.shipping_methods(false).len(), 2);
    }

    #[test]
    fn to_shipment_expands_units() {
        let location = test_location();
        let order = test_order(test_distributor().with_shipping_method(test_method(7, &[1])));
        let v = test_variant(10, 1);
        let mut package = Package::new(&location, &order, Currency::usd());
        package.add(&v, 2, FulfillmentState::OnHand);
        package.add(&v, 1, FulfillmentState::Backordered);
        let method = &order.distributor().shipping_methods()[0];
        package.set_shipping_rates(vec![ShippingRate {
            shipping_method: method,
            cost: dec!(7),
            selected: true,
        }]);

        let shipment = package.to_shipment();
        assert_eq!(shipment.stock_location_id, location.id_typed());
        assert_eq!(shipment.inventory_units.len(), 3);
        assert_eq!(
            shipment
                .inventory_units
                .iter()
                .filter(|u| u.state == FulfillmentState::Backordered)
                .count(),
            1
        );
        assert_eq!(shipment.selected_rate().map(|r| r.cost), Some(dec!(7)));
        assert_eq!(package.selected_shipping_rate().map(|r| r.cost), Some(dec!(7)));
    }
}
