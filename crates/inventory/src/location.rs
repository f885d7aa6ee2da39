use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use larder_core::{StockLocationId, VariantId};

use crate::overrides::VariantOverride;

/// Stock held for one variant at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub variant_id: VariantId,
    /// May be negative when the location has been oversold.
    pub count_on_hand: i64,
    /// Whether units beyond `count_on_hand` may still be promised.
    pub backorderable: bool,
}

impl StockItem {
    pub fn new(variant_id: VariantId, count_on_hand: i64, backorderable: bool) -> Self {
        Self {
            variant_id,
            count_on_hand,
            backorderable,
        }
    }

    /// Split `quantity` into the part available now and the part that can be backordered.
    ///
    /// Anything left over when the item is not backorderable is simply not filled.
    pub fn fill(&self, quantity: u32) -> FillStatus {
        let available = u32::try_from(self.count_on_hand.max(0)).unwrap_or(u32::MAX);
        let on_hand = quantity.min(available);
        let backordered = if self.backorderable {
            quantity - on_hand
        } else {
            0
        };
        FillStatus {
            on_hand,
            backordered,
        }
    }

    /// The item as seen by a distributor that overrides its stock level.
    pub fn overridden_by(&self, ov: &VariantOverride) -> StockItem {
        StockItem {
            variant_id: self.variant_id,
            count_on_hand: ov.count_on_hand.unwrap_or(self.count_on_hand),
            backorderable: ov.on_demand.unwrap_or(self.backorderable),
        }
    }
}

/// Result of asking a location how much of a requested quantity it can supply.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FillStatus {
    pub on_hand: u32,
    pub backordered: u32,
}

impl FillStatus {
    pub fn total(&self) -> u32 {
        self.on_hand + self.backordered
    }
}

/// A physical place stock ships from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLocation {
    id: StockLocationId,
    name: String,
    active: bool,
    items: HashMap<VariantId, StockItem>,
}

impl StockLocation {
    pub fn new(id: StockLocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            items: HashMap::new(),
        }
    }

    pub fn with_item(mut self, item: StockItem) -> Self {
        self.set_item(item);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Insert or replace the stock record for `item.variant_id`.
    pub fn set_item(&mut self, item: StockItem) {
        self.items.insert(item.variant_id, item);
    }

    pub fn id_typed(&self) -> StockLocationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stock_item(&self, variant_id: &VariantId) -> Option<&StockItem> {
        self.items.get(variant_id)
    }

    /// Cheap pre-check: does this location hold a record for any of `variant_ids`?
    pub fn has_stock_for<'v>(&self, variant_ids: impl IntoIterator<Item = &'v VariantId>) -> bool {
        variant_ids.into_iter().any(|v| self.items.contains_key(v))
    }

    /// `(on_hand, backordered)` this location can supply for `quantity` units.
    ///
    /// Returns `(0, 0)` when there is no stock record for the variant.
    pub fn fill_status(&self, variant_id: &VariantId, quantity: u32) -> FillStatus {
        self.fill_status_with(variant_id, quantity, None)
    }

    /// Like [`fill_status`](Self::fill_status) but seen through a distributor override.
    pub fn fill_status_with(
        &self,
        variant_id: &VariantId,
        quantity: u32,
        ov: Option<&VariantOverride>,
    ) -> FillStatus {
        let Some(item) = self.stock_item(variant_id) else {
            return FillStatus::default();
        };
        let status = match ov {
            Some(ov) => item.overridden_by(ov).fill(quantity),
            None => item.fill(quantity),
        };
        tracing::trace!(
            stock_location_id = %self.id,
            variant_id = %variant_id,
            quantity,
            on_hand = status.on_hand,
            backordered = status.backordered,
            overridden = ov.is_some(),
            "fill status"
        );
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::DistributorId;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn test_variant_id(n: u128) -> VariantId {
        VariantId::from_uuid(Uuid::from_u128(n))
    }

    fn test_location() -> StockLocation {
        StockLocation::new(StockLocationId::from_uuid(Uuid::from_u128(1)), "Warehouse")
    }

    #[test]
    fn fill_status_is_fully_on_hand_when_enough_stock() {
        let v = test_variant_id(10);
        let loc = test_location().with_item(StockItem::new(v, 10, false));
        assert_eq!(
            loc.fill_status(&v, 4),
            FillStatus {
                on_hand: 4,
                backordered: 0
            }
        );
    }

    #[test]
    fn fill_status_backorders_remainder_when_backorderable() {
        let v = test_variant_id(10);
        let loc = test_location().with_item(StockItem::new(v, 2, true));
        assert_eq!(
            loc.fill_status(&v, 5),
            FillStatus {
                on_hand: 2,
                backordered: 3
            }
        );
    }

    #[test]
    fn fill_status_drops_remainder_when_not_backorderable() {
        let v = test_variant_id(10);
        let loc = test_location().with_item(StockItem::new(v, 3, false));
        assert_eq!(
            loc.fill_status(&v, 5),
            FillStatus {
                on_hand: 3,
                backordered: 0
            }
        );
    }

    #[test]
    fn negative_count_on_hand_counts_as_zero() {
        let v = test_variant_id(10);
        let loc = test_location().with_item(StockItem::new(v, -4, true));
        assert_eq!(
            loc.fill_status(&v, 5),
            FillStatus {
                on_hand: 0,
                backordered: 5
            }
        );
    }

    #[test]
    fn missing_stock_item_fills_nothing() {
        let loc = test_location();
        let v = test_variant_id(10);
        assert!(loc.stock_item(&v).is_none());
        assert_eq!(loc.fill_status(&v, 5), FillStatus::default());
    }

    #[test]
    fn has_stock_for_checks_any_variant() {
        let v1 = test_variant_id(10);
        let v2 = test_variant_id(11);
        let loc = test_location().with_item(StockItem::new(v2, 0, false));
        assert!(loc.has_stock_for([&v1, &v2]));
        assert!(!loc.has_stock_for([&v1]));
        assert!(!loc.has_stock_for(Vec::<&VariantId>::new()));
    }

    #[test]
    fn override_replaces_count_and_backorder_policy() {
        let v = test_variant_id(10);
        let loc = test_location().with_item(StockItem::new(v, 100, false));
        let ov = VariantOverride {
            distributor_id: DistributorId::from_uuid(Uuid::from_u128(7)),
            variant_id: v,
            count_on_hand: Some(1),
            on_demand: Some(true),
        };
        assert_eq!(
            loc.fill_status_with(&v, 3, Some(&ov)),
            FillStatus {
                on_hand: 1,
                backordered: 2
            }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a location never fills more than was asked for, and fills
        /// everything when it is backorderable.
        #[test]
        fn fill_never_exceeds_request(
            count in -50i64..200,
            backorderable in any::<bool>(),
            quantity in 0u32..150,
        ) {
            let status = StockItem::new(test_variant_id(1), count, backorderable).fill(quantity);
            prop_assert!(status.total() <= quantity);
            prop_assert!(i64::from(status.on_hand) <= count.max(0));
            if backorderable {
                prop_assert_eq!(status.total(), quantity);
            }
        }
    }
}
