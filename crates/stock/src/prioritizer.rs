//! Reconciles per-location packages against what the order actually needs.
//!
//! Each package was built by asking one location "how much of this can you supply?"
//! in isolation, so summing them can exceed the order. For every requested variant the
//! prioritizer walks the packages in order, first over on-hand items and then over
//! backordered items, keeping units until the requested quantity is met and reducing
//! everything after that. Earlier packages therefore win. Packages left with nothing
//! are dropped.

use serde::{Deserialize, Serialize};

use larder_core::VariantId;
use larder_orders::Order;

use crate::adjuster::Adjuster;
use crate::package::Package;

/// Units of a variant no package could cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unfulfilled {
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// Outcome of prioritization.
#[derive(Debug, Clone)]
pub struct Prioritized<'a> {
    /// Non-empty packages, in their original relative order.
    pub packages: Vec<Package<'a>>,
    /// Shortfalls, in line-item order. Empty when every unit was allocated.
    pub unfulfilled: Vec<Unfulfilled>,
}

#[derive(Debug)]
pub struct Prioritizer<'a> {
    order: &'a Order,
    packages: Vec<Package<'a>>,
}

impl<'a> Prioritizer<'a> {
    pub fn new(order: &'a Order, packages: Vec<Package<'a>>) -> Self {
        Self { order, packages }
    }

    /// Reconciled, non-empty packages.
    pub fn prioritized_packages(self) -> Vec<Package<'a>> {
        self.prioritize().packages
    }

    /// Reconciled packages together with any shortfall.
    pub fn prioritize(mut self) -> Prioritized<'a> {
        let unfulfilled = self.adjust_packages();
        self.prune_packages();
        Prioritized {
            packages: self.packages,
            unfulfilled,
        }
    }

    fn adjust_packages(&mut self) -> Vec<Unfulfilled> {
        let mut unfulfilled = Vec::new();
        let order = self.order;

        for (variant, quantity) in order.requested_quantities() {
            let mut adjuster = Adjuster::new(variant.id, quantity);
            self.visit_packages(&mut adjuster);
            adjuster.backorder();
            self.visit_packages(&mut adjuster);

            if !adjuster.is_fulfilled() {
                tracing::debug!(
                    order_id = %order.id_typed(),
                    variant_id = %variant.id,
                    requested = quantity,
                    short = adjuster.need(),
                    "insufficient stock across locations"
                );
                unfulfilled.push(Unfulfilled {
                    variant_id: variant.id,
                    quantity: adjuster.need(),
                });
            }
        }

        unfulfilled
    }

    fn visit_packages(&mut self, adjuster: &mut Adjuster) {
        for package in &mut self.packages {
            let Some(index) = package.find_item(adjuster.variant_id(), adjuster.status()) else {
                continue;
            };
            let available = package.item(index).map_or(0, |item| item.quantity);
            package.set_quantity(index, adjuster.adjust(available));
        }
    }

    fn prune_packages(&mut self) {
        for package in &mut self.packages {
            package.remove_empty_items();
        }
        self.packages.retain(|package| !package.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use larder_core::{Currency, DistributorId, OrderId, ShippingCategoryId, StockLocationId};
    use larder_inventory::StockLocation;
    use larder_orders::{Distributor, LineItem, Variant};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::package::FulfillmentState::{Backordered, OnHand};

    fn test_variant(n: u128) -> Arc<Variant> {
        Arc::new(Variant::new(
            VariantId::from_uuid(Uuid::from_u128(n)),
            format!("SKU-{n}"),
            dec!(1),
            ShippingCategoryId::from_uuid(Uuid::from_u128(1)),
        ))
    }

    fn test_order(lines: &[(&Arc<Variant>, u32)]) -> Order {
        let distributor = Arc::new(Distributor::new(DistributorId::from_uuid(Uuid::from_u128(3)), "Hub"));
        lines.iter().fold(
            Order::new(OrderId::from_uuid(Uuid::from_u128(5)), distributor),
            |order, (variant, qty)| order.with_line_item(LineItem::new(Arc::clone(variant), *qty).unwrap()),
        )
    }

    fn test_locations(count: usize) -> Vec<StockLocation> {
        (0..count)
            .map(|i| StockLocation::new(StockLocationId::from_uuid(Uuid::from_u128(i as u128 + 1)), format!("L{i}")))
            .collect()
    }

    #[test]
    fn earlier_package_is_preferred() {
        let v = test_variant(10);
        let order = test_order(&[(&v, 5)]);
        let locations = test_locations(2);
        let mut a = Package::new(&locations[0], &order, Currency::usd());
        a.add(&v, 3, OnHand);
        let mut b = Package::new(&locations[1], &order, Currency::usd());
        b.add(&v, 5, OnHand);

        let packages = Prioritizer::new(&order, vec![a, b]).prioritized_packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].quantity(Some(OnHand)), 3);
        assert_eq!(packages[1].quantity(Some(OnHand)), 2);
    }

    #[test]
    fn does_not_double_allocate() {
        let v = test_variant(10);
        let order = test_order(&[(&v, 4)]);
        let locations = test_locations(2);
        let mut a = Package::new(&locations[0], &order, Currency::usd());
        a.add(&v, 4, OnHand);
        let mut b = Package::new(&locations[1], &order, Currency::usd());
        b.add(&v, 4, OnHand);

        let packages = Prioritizer::new(&order, vec![a, b]).prioritized_packages();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].stock_location().id_typed(), locations[0].id_typed());
        assert_eq!(packages[0].quantity(None), 4);
    }

    #[test]
    fn on_hand_anywhere_beats_backorder_earlier() {
        let v = test_variant(10);
        let order = test_order(&[(&v, 3)]);
        let locations = test_locations(2);
        let mut a = Package::new(&locations[0], &order, Currency::usd());
        a.add(&v, 3, Backordered);
        let mut b = Package::new(&locations[1], &order, Currency::usd());
        b.add(&v, 3, OnHand);

        let packages = Prioritizer::new(&order, vec![a, b]).prioritized_packages();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].stock_location().id_typed(), locations[1].id_typed());
        assert_eq!(packages[0].quantity(Some(OnHand)), 3);
    }

    #[test]
    fn reports_shortfall_without_failing() {
        let v = test_variant(10);
        let order = test_order(&[(&v, 5)]);
        let locations = test_locations(1);
        let mut a = Package::new(&locations[0], &order, Currency::usd());
        a.add(&v, 2, OnHand);

        let prioritized = Prioritizer::new(&order, vec![a]).prioritize();
        assert_eq!(prioritized.packages[0].quantity(None), 2);
        assert_eq!(
            prioritized.unfulfilled,
            vec![Unfulfilled {
                variant_id: v.id,
                quantity: 3
            }]
        );
    }

    #[test]
    fn zeroed_items_are_removed_from_surviving_packages() {
        let v1 = test_variant(10);
        let v2 = test_variant(11);
        let order = test_order(&[(&v1, 1), (&v2, 1)]);
        let locations = test_locations(2);
        let mut a = Package::new(&locations[0], &order, Currency::usd());
        a.add(&v1, 1, OnHand);
        let mut b = Package::new(&locations[1], &order, Currency::usd());
        b.add(&v1, 1, OnHand);
        b.add(&v2, 1, OnHand);

        let packages = Prioritizer::new(&order, vec![a, b]).prioritized_packages();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].contents().len(), 1);
        assert_eq!(packages[1].contents()[0].variant.id, v2.id);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: allocation never exceeds the order, matches it when capacity allows,
        /// and leaves no empty packages.
        #[test]
        fn conserves_ordered_quantity(
            ordered in 1u32..40,
            capacity in prop::collection::vec((0u32..30, 0u32..30), 1..6),
        ) {
            let v = test_variant(10);
            let order = test_order(&[(&v, ordered)]);
            let locations = test_locations(capacity.len());
            let packages: Vec<_> = locations
                .iter()
                .zip(&capacity)
                .map(|(location, (on_hand, backordered))| {
                    let mut p = Package::new(location, &order, Currency::usd());
                    p.add(&v, (*on_hand).min(ordered), OnHand);
                    p.add(&v, (*backordered).min(ordered - (*on_hand).min(ordered)), Backordered);
                    p
                })
                .collect();
            let supply: u64 = packages.iter().map(|p| p.quantity(None)).sum();

            let prioritized = Prioritizer::new(&order, packages).prioritize();
            let allocated: u64 = prioritized.packages.iter().map(|p| p.quantity(None)).sum();
            let short: u64 = prioritized.unfulfilled.iter().map(|u| u64::from(u.quantity)).sum();
            let ordered = u64::from(ordered);

            prop_assert!(allocated <= ordered);
            prop_assert_eq!(allocated, supply.min(ordered));
            prop_assert_eq!(allocated + short, ordered);
            prop_assert!(prioritized.packages.iter().all(|p| !p.is_empty()));
        }
    }
}
