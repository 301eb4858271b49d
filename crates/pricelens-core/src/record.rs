//! Catalog record types
//!
//! A [`Record`] is one model offering as read from the catalog source.
//! Records are immutable after parsing and are identified by their
//! [`ModelKey`] (provider + code name).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Speed tier value that counts as "fastest"
pub const FAST_SPEED: &str = "Fast";

/// Quality tier value that counts as "premium"
pub const TOP_QUALITY: &str = "Very High";

/// Structured identity of a record
///
/// Uniqueness of (provider, code name) across a catalog is assumed, not
/// enforced. Two records sharing a key are indistinguishable to the
/// selection and badge logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey {
    pub provider: String,
    pub code_name: String,
}

impl ModelKey {
    pub fn new(provider: impl Into<String>, code_name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            code_name: code_name.into(),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.code_name)
    }
}

impl FromStr for ModelKey {
    type Err = Error;

    /// Parse `provider/code-name`. The split happens on the first `/`, so
    /// code names may themselves contain slashes.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((provider, code)) if !provider.trim().is_empty() && !code.trim().is_empty() => {
                Ok(Self::new(provider.trim(), code.trim()))
            }
            _ => Err(Error::InvalidKey(s.to_string())),
        }
    }
}

/// Regional availability, classified from the free-text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    VpnRequired,
    Unavailable,
}

impl Availability {
    pub fn classify(raw: &str) -> Self {
        let value = raw.trim().to_lowercase();
        if matches!(value.as_str(), "да" | "yes" | "available") {
            Availability::Available
        } else if value.contains("vpn") {
            Availability::VpnRequired
        } else {
            Availability::Unavailable
        }
    }
}

/// One model offering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub provider: String,
    pub name: String,
    pub code_name: String,
    /// USD per 1M input tokens
    pub input_price: f64,
    /// USD per 1M output tokens
    pub output_price: f64,
    pub context_window: u64,
    pub modality: String,
    /// Raw regional availability text, see [`Record::availability_status`]
    pub availability: String,
    pub speed: String,
    pub quality: String,
    pub specialization: String,
    pub docs_url: String,
}

impl Record {
    pub fn key(&self) -> ModelKey {
        ModelKey::new(self.provider.clone(), self.code_name.clone())
    }

    /// Cheap key comparison without allocating a [`ModelKey`]
    pub fn has_key(&self, key: &ModelKey) -> bool {
        self.provider == key.provider && self.code_name == key.code_name
    }

    pub fn average_price(&self) -> f64 {
        (self.input_price + self.output_price) / 2.0
    }

    pub fn availability_status(&self) -> Availability {
        Availability::classify(&self.availability)
    }

    pub fn is_fast(&self) -> bool {
        self.speed == FAST_SPEED
    }

    pub fn is_premium(&self) -> bool {
        self.quality == TOP_QUALITY
    }

    /// Text the free-text search matches against
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.provider, self.name, self.code_name).to_lowercase()
    }
}
