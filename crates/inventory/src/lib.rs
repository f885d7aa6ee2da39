//! Inventory module: physical stock locations and what they can supply.
//!
//! Pure, in-memory domain logic (no IO, no storage). Callers load stock locations and
//! overrides up front and hand them to the allocation pipeline.

pub mod location;
pub mod overrides;

pub use location::{FillStatus, StockItem, StockLocation};
pub use overrides::{VariantOverride, VariantOverrides};
