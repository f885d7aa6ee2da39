//! Postal address used to decide whether a shipping method services an order.

use serde::{Deserialize, Serialize};

/// Ship address (only the parts zone matching needs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code (e.g. "AU").
    pub country: String,
    /// State / province abbreviation within the country (e.g. "VIC").
    pub state: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
}

impl Address {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: None,
            city: None,
            zipcode: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_zipcode(mut self, zipcode: impl Into<String>) -> Self {
        self.zipcode = Some(zipcode.into());
        self
    }
}

