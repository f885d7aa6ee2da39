use larder_core::DistributorId;
use larder_shipping::{ShippingMethod, TagRule};

/// The enterprise an order is placed with: owns the shipping methods on offer and the
/// tag rules that decide which customers see them.
#[derive(Debug, Clone)]
pub struct Distributor {
    id: DistributorId,
    name: String,
    shipping_methods: Vec<ShippingMethod>,
    tag_rules: Vec<TagRule>,
}

impl Distributor {
    pub fn new(id: DistributorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            shipping_methods: Vec::new(),
            tag_rules: Vec::new(),
        }
    }

    pub fn with_shipping_method(mut self, method: ShippingMethod) -> Self {
        self.shipping_methods.push(method);
        self
    }

    pub fn with_tag_rule(mut self, rule: TagRule) -> Self {
        self.tag_rules.push(rule);
        self
    }

    pub fn id_typed(&self) -> DistributorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    pub fn tag_rules(&self) -> &[TagRule] {
        &self.tag_rules
    }
}
