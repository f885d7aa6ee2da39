use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larder_core::{ShippingCategoryId, VariantId};

/// A purchasable variant of a product (e.g. "Apples, 1kg bag").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub sku: String,
    /// Weight of one unit; zero when unknown.
    pub weight: Decimal,
    /// Unit price in the order's currency.
    pub price: Decimal,
    pub shipping_category: ShippingCategoryId,
}

impl Variant {
    pub fn new(
        id: VariantId,
        sku: impl Into<String>,
        price: Decimal,
        shipping_category: ShippingCategoryId,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            weight: Decimal::ZERO,
            price,
            shipping_category,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }
}
