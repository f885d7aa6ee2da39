use rust_decimal::Decimal;

use larder_core::Currency;

/// What a calculator is allowed to know about a package.
///
/// Money and weight totals are `None` when they do not fit in a `Decimal`.
pub trait Shippable {
    /// Total number of units in the package.
    fn quantity(&self) -> u64;

    /// Sum of `variant.weight * quantity` over all contents.
    fn weight(&self) -> Option<Decimal>;

    /// Sum of `variant.price * quantity` over all contents.
    fn item_total(&self) -> Option<Decimal>;

    fn currency(&self) -> &Currency;
}
