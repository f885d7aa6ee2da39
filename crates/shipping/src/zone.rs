use serde::{Deserialize, Serialize};

use larder_core::Address;

/// A member of a zone: a whole country, or one state within a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneMember {
    Country { country: String },
    State { country: String, state: String },
}

impl ZoneMember {
    pub fn country(code: impl Into<String>) -> Self {
        Self::Country {
            country: code.into(),
        }
    }

    pub fn state(country: impl Into<String>, state: impl Into<String>) -> Self {
        Self::State {
            country: country.into(),
            state: state.into(),
        }
    }

    fn matches(&self, address: &Address) -> bool {
        match self {
            ZoneMember::Country { country } => country.eq_ignore_ascii_case(&address.country),
            ZoneMember::State { country, state } => {
                country.eq_ignore_ascii_case(&address.country)
                    && address
                        .state
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(state))
            }
        }
    }
}

/// Geographic area a shipping method services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub members: Vec<ZoneMember>,
}

impl Zone {
    pub fn new(name: impl Into<String>, members: Vec<ZoneMember>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn include(&self, address: &Address) -> bool {
        self.members.iter().any(|m| m.matches(address))
    }
}
