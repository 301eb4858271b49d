//! Quick-filter / sort presets
//!
//! A preset replaces the working result set. Presets are mutually
//! exclusive: each one starts from its own base set, never from the
//! output of a previous preset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::record::{Availability, Record};
use crate::scoring::rank_by_roi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Criteria-filtered set, ascending by input price
    Cheapest,
    /// Every "Fast" model in the catalog, ignoring criteria
    Fastest,
    /// Whole catalog, descending by ROI
    BestRoi,
    /// Every regionally available model, ignoring criteria
    RfAvailable,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Cheapest, Preset::Fastest, Preset::BestRoi, Preset::RfAvailable];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Cheapest => "cheapest",
            Preset::Fastest => "fastest",
            Preset::BestRoi => "best-roi",
            Preset::RfAvailable => "rf-available",
        }
    }

    /// Produce the preset's result set
    pub fn apply(self, all: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
        match self {
            Preset::Cheapest => {
                let mut records = criteria.apply(all);
                records.sort_by(|a, b| a.input_price.total_cmp(&b.input_price));
                records
            }
            Preset::Fastest => all.iter().filter(|r| r.is_fast()).cloned().collect(),
            Preset::BestRoi => rank_by_roi(all).into_iter().map(|(r, _)| r).collect(),
            Preset::RfAvailable => all
                .iter()
                .filter(|r| r.availability_status() == Availability::Available)
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}
