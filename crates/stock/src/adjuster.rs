use larder_core::VariantId;

use crate::package::FulfillmentState;

/// Tracks how much of one variant still has to be found while the prioritizer walks the
/// packages.
///
/// Lives for one line item: first over on-hand items, then (after
/// [`backorder`](Self::backorder)) over backordered items, carrying the remaining need
/// across.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjuster {
    variant_id: VariantId,
    need: u32,
    status: FulfillmentState,
}

impl Adjuster {
    pub fn new(variant_id: VariantId, quantity: u32) -> Self {
        Self {
            variant_id,
            need: quantity,
            status: FulfillmentState::OnHand,
        }
    }

    pub fn variant_id(&self) -> &VariantId {
        &self.variant_id
    }

    pub fn need(&self) -> u32 {
        self.need
    }

    pub fn status(&self) -> FulfillmentState {
        self.status
    }

    /// Switch to the backordered sweep. The remaining need is kept.
    pub fn backorder(&mut self) {
        self.status = FulfillmentState::Backordered;
    }

    pub fn is_fulfilled(&self) -> bool {
        self.need == 0
    }

    /// Claim up to `need` units from an item holding `quantity`; returns the item's new
    /// quantity.
    ///
    /// The result never exceeds `quantity`. Once the need is met, every further item is
    /// clamped to zero.
    pub fn adjust(&mut self, quantity: u32) -> u32 {
        if quantity >= self.need {
            let kept = self.need;
            self.need = 0;
            kept
        } else {
            self.need -= quantity;
            quantity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_adjuster(need: u32) -> Adjuster {
        Adjuster::new(VariantId::from_uuid(Uuid::from_u128(1)), need)
    }

    #[test]
    fn clamps_item_to_remaining_need() {
        let mut adjuster = test_adjuster(5);
        assert_eq!(adjuster.adjust(10), 5);
        assert!(adjuster.is_fulfilled());
    }

    #[test]
    fn consumes_smaller_items_whole() {
        let mut adjuster = test_adjuster(5);
        assert_eq!(adjuster.adjust(3), 3);
        assert_eq!(adjuster.need(), 2);
        assert_eq!(adjuster.adjust(10), 2);
        assert_eq!(adjuster.need(), 0);
    }

    #[test]
    fn zeroes_items_after_fulfilment() {
        let mut adjuster = test_adjuster(1);
        adjuster.adjust(1);
        assert_eq!(adjuster.adjust(7), 0);
    }

    #[test]
    fn backorder_keeps_need() {
        let mut adjuster = test_adjuster(4);
        adjuster.adjust(1);
        adjuster.backorder();
        assert_eq!(adjuster.status(), FulfillmentState::Backordered);
        assert_eq!(adjuster.need(), 3);
    }
}
