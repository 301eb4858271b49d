//! Filter engine
//!
//! [`FilterCriteria`] is a conjunction of independent, individually
//! optional conditions. An unset condition always passes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Inclusive input-price range (USD per 1M tokens)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// An inverted range (min > max) contains nothing.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Active filter conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over provider, name and code name
    pub search: String,
    pub providers: BTreeSet<String>,
    pub modalities: BTreeSet<String>,
    pub availability: BTreeSet<String>,
    pub speeds: BTreeSet<String>,
    pub qualities: BTreeSet<String>,
    pub price_range: Option<PriceRange>,
}

impl FilterCriteria {
    /// Criteria with only a price range set
    pub fn with_price_range(range: PriceRange) -> Self {
        Self {
            price_range: Some(range),
            ..Default::default()
        }
    }

    /// Clear every condition, keeping `default_range` as the price bound
    pub fn reset(&mut self, default_range: Option<PriceRange>) {
        *self = Self {
            price_range: default_range,
            ..Default::default()
        };
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.providers.is_empty()
            && self.modalities.is_empty()
            && self.availability.is_empty()
            && self.speeds.is_empty()
            && self.qualities.is_empty()
            && self.price_range.is_none()
    }

    /// Whether `record` satisfies every active condition
    pub fn matches(&self, record: &Record) -> bool {
        let term = self.search.to_lowercase();
        if !term.is_empty() && !record.search_text().contains(&term) {
            return false;
        }
        if !member(&self.providers, &record.provider) {
            return false;
        }
        if !member(&self.modalities, &record.modality) {
            return false;
        }
        if !member(&self.availability, &record.availability) {
            return false;
        }
        if !member(&self.speeds, &record.speed) {
            return false;
        }
        if !member(&self.qualities, &record.quality) {
            return false;
        }
        if let Some(range) = &self.price_range
            && !range.contains(record.input_price)
        {
            return false;
        }
        true
    }

    /// Apply the criteria to `records`, preserving order
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

fn member(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Distinct values used to populate filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub providers: Vec<String>,
    pub modalities: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[Record]) -> Self {
        let providers: BTreeSet<&str> = records.iter().map(|r| r.provider.as_str()).collect();
        let modalities: BTreeSet<&str> = records.iter().map(|r| r.modality.as_str()).collect();
        Self {
            providers: providers.into_iter().map(String::from).collect(),
            modalities: modalities.into_iter().map(String::from).collect(),
        }
    }
}
