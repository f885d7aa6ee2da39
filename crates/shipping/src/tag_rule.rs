//! Tag rules that show or hide shipping methods for particular customers.
//!
//! A distributor tags its customers (e.g. "wholesale") and its shipping methods
//! (e.g. "bulk-freight"), then writes rules such as "hide bulk-freight from everyone"
//! (a default rule) and "show bulk-freight to wholesale customers" (a customer rule).
//! Customer rules win over default rules; the first rule that matches a method decides.

use serde::{Deserialize, Serialize};

use crate::method::ShippingMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Default rules apply to every customer; others only to customers carrying one of
    /// `customer_tags`.
    pub is_default: bool,
    #[serde(default)]
    pub customer_tags: Vec<String>,
    pub method_tags: Vec<String>,
    pub visibility: Visibility,
}

impl TagRule {
    pub fn default_rule(method_tags: Vec<String>, visibility: Visibility) -> Self {
        Self {
            is_default: true,
            customer_tags: Vec::new(),
            method_tags,
            visibility,
        }
    }

    pub fn customer_rule(
        customer_tags: Vec<String>,
        method_tags: Vec<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            is_default: false,
            customer_tags,
            method_tags,
            visibility,
        }
    }

    fn applies_to_customer(&self, customer_tags: &[String]) -> bool {
        self.customer_tags.iter().any(|t| customer_tags.contains(t))
    }

    fn matches(&self, method: &ShippingMethod) -> bool {
        self.method_tags.iter().any(|t| method.tags().contains(t))
    }

    fn rejects_match(&self) -> bool {
        self.visibility != Visibility::Visible
    }
}

/// Applies a distributor's rules for one customer.
#[derive(Debug, Clone)]
pub struct TagRuleApplicator<'r> {
    customer_rules: Vec<&'r TagRule>,
    default_rules: Vec<&'r TagRule>,
}

impl<'r> TagRuleApplicator<'r> {
    pub fn new(rules: &'r [TagRule], customer_tags: &[String]) -> Self {
        let customer_rules = rules
            .iter()
            .filter(|r| !r.is_default && r.applies_to_customer(customer_tags))
            .collect();
        let default_rules = rules.iter().filter(|r| r.is_default).collect();
        Self {
            customer_rules,
            default_rules,
        }
    }

    pub fn rejects(&self, method: &ShippingMethod) -> bool {
        self.customer_rules
            .iter()
            .chain(self.default_rules.iter())
            .find(|r| r.matches(method))
            .is_some_and(|r| r.rejects_match())
    }

    /// Keep the methods this customer may see, preserving order.
    pub fn filter<'m>(&self, methods: impl IntoIterator<Item = &'m ShippingMethod>) -> Vec<&'m ShippingMethod> {
        methods.into_iter().filter(|m| !self.rejects(m)).collect()
    }
}
