//! Orders module: the order-side collaborators the allocation pipeline reads.
//!
//! Orders are loaded by the caller and handed over read-only; nothing here persists or
//! mutates them.

pub mod distributor;
pub mod order;
pub mod variant;

pub use distributor::Distributor;
pub use order::{LineItem, Order};
pub use variant::Variant;
