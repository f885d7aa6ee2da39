//! Stock allocation and shipping-rate estimation.
//!
//! Given an order and the stock locations that might supply it, this crate decides how
//! many units ship from where (on hand or backordered), reconciles quantities so the
//! order is never over-allocated, and prices every resulting package.
//!
//! ```text
//! Order ─▶ Coordinator::packages()
//!            ├─ Packer::package()            one Package per eligible location
//!            ├─ Prioritizer::prioritize()    reconcile quantities, drop empties
//!            └─ Estimator::shipping_rates()  price + pre-select a rate per package
//!          ─▶ Vec<Package>  (caller converts each into a persisted shipment)
//! ```
//!
//! The pipeline is synchronous and does no IO: everything it reads is borrowed from
//! data the caller already loaded.

pub mod adjuster;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod estimator;
pub mod package;
pub mod packer;
pub mod prioritizer;
pub mod shipment;

pub use adjuster::Adjuster;
pub use config::{AllocationConfig, LocationOrder};
pub use coordinator::{Allocation, Coordinator};
pub use error::AllocationError;
pub use estimator::Estimator;
pub use package::{ContentItem, FulfillmentState, Package};
pub use packer::Packer;
pub use prioritizer::{Prioritized, Prioritizer, Unfulfilled};
pub use shipment::{InventoryUnit, Shipment, ShipmentRate};
