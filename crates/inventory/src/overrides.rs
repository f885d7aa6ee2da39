//! Distributor-specific views of variant stock.
//!
//! A hub selling a producer's variant may track its own stock level (or sell it on
//! demand) independently of the producer's stock location record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use larder_core::{DistributorId, VariantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOverride {
    pub distributor_id: DistributorId,
    pub variant_id: VariantId,
    /// Replaces the stock item's `count_on_hand` when set.
    pub count_on_hand: Option<i64>,
    /// `Some(true)` sells without limit (backorderable), `Some(false)` forbids backorders.
    pub on_demand: Option<bool>,
}

/// Overrides keyed by `(distributor, variant)`.
#[derive(Debug, Clone, Default)]
pub struct VariantOverrides {
    by_key: HashMap<(DistributorId, VariantId), VariantOverride>,
}

impl VariantOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an override, replacing any previous one for the same key.
    pub fn insert(&mut self, ov: VariantOverride) -> Option<VariantOverride> {
        self.by_key.insert((ov.distributor_id, ov.variant_id), ov)
    }

    pub fn get(&self, distributor_id: DistributorId, variant_id: VariantId) -> Option<&VariantOverride> {
        self.by_key.get(&(distributor_id, variant_id))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl FromIterator<VariantOverride> for VariantOverrides {
    fn from_iter<I: IntoIterator<Item = VariantOverride>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for ov in iter {
            overrides.insert(ov);
        }
        overrides
    }
}
