//! `larder-core`: identifiers and small value types shared by the fulfilment crates.
//!
//! Pure domain primitives; nothing here knows about stock or shipping rules.

pub mod address;
pub mod currency;
pub mod error;
pub mod id;

pub use address::Address;
pub use currency::Currency;
pub use error::{DomainError, DomainResult};
pub use id::{
    DistributorId, OrderId, ShippingCategoryId, ShippingMethodId, StockLocationId, VariantId,
};
