use rust_decimal::Decimal;

use crate::method::ShippingMethod;

/// A priced shipping option for one package.
#[derive(Debug, Clone)]
pub struct ShippingRate<'m> {
    pub shipping_method: &'m ShippingMethod,
    pub cost: Decimal,
    pub selected: bool,
}

impl<'m> ShippingRate<'m> {
    pub fn new(shipping_method: &'m ShippingMethod, cost: Decimal) -> Self {
        Self {
            shipping_method,
            cost,
            selected: false,
        }
    }
}
