use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::builtin::{FlatPercentItemTotal, FlatRate, FlexiRate, PerItem, PriceSack, Weight};
use super::{CalculatorError, CalculatorSpec, ShippingCalculator};

/// Builds a calculator from its stored preferences.
pub type CalculatorFactory =
    Box<dyn Fn(JsonValue) -> Result<Arc<dyn ShippingCalculator>, CalculatorError> + Send + Sync>;

/// Calculator kinds known to the marketplace, keyed by name.
///
/// Dispatch is by registered kind only; there is no probing of arbitrary objects.
#[derive(Default)]
pub struct CalculatorRegistry {
    factories: BTreeMap<String, CalculatorFactory>,
}

impl core::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CalculatorRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CalculatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in calculator kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(FlatRate::KIND, |p| Ok(Arc::new(FlatRate::from_json(p)?)));
        registry.insert(PerItem::KIND, |p| Ok(Arc::new(PerItem::from_json(p)?)));
        registry.insert(FlatPercentItemTotal::KIND, |p| {
            Ok(Arc::new(FlatPercentItemTotal::from_json(p)?))
        });
        registry.insert(FlexiRate::KIND, |p| Ok(Arc::new(FlexiRate::from_json(p)?)));
        registry.insert(PriceSack::KIND, |p| Ok(Arc::new(PriceSack::from_json(p)?)));
        registry.insert(Weight::KIND, |p| Ok(Arc::new(Weight::from_json(p)?)));
        registry
    }

    fn insert<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(JsonValue) -> Result<Arc<dyn ShippingCalculator>, CalculatorError> + Send + Sync + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    /// Register a custom calculator kind. Kinds cannot be re-registered.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), CalculatorError>
    where
        F: Fn(JsonValue) -> Result<Arc<dyn ShippingCalculator>, CalculatorError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(CalculatorError::DuplicateKind(kind));
        }
        tracing::debug!(kind = %kind, "registered shipping calculator");
        self.insert(&kind, factory);
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, in name order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn build(
        &self,
        kind: &str,
        preferences: JsonValue,
    ) -> Result<Arc<dyn ShippingCalculator>, CalculatorError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| CalculatorError::UnknownKind(kind.to_string()))?;
        factory(preferences)
    }

    pub fn build_spec(&self, spec: &CalculatorSpec) -> Result<Arc<dyn ShippingCalculator>, CalculatorError> {
        self.build(&spec.kind, spec.preferences.clone())
    }
}
