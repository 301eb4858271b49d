//! Derived metrics: ROI, savings, badges and catalog-wide stats
//!
//! Nothing here is stored on a [`Record`]; every value is recomputed from
//! the record and, where needed, the surrounding record set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::{ModelKey, Record};

/// How many records earn the "Best Deal" badge / appear in top lists
pub const TOP_N: usize = 3;

/// Weight of a quality tier in the ROI formula
pub fn quality_weight(quality: &str) -> f64 {
    match quality {
        "Very High" => 10.0,
        "High" => 7.0,
        "Medium" => 4.0,
        "Low" => 2.0,
        _ => 1.0,
    }
}

/// quality weight / average price × 100; a free model scores 0, never infinity
pub fn roi(record: &Record) -> f64 {
    let avg = record.average_price();
    if avg > 0.0 {
        quality_weight(&record.quality) / avg * 100.0
    } else {
        0.0
    }
}

/// Highest input price among records with a positive input price
pub fn max_input_price(records: &[Record]) -> Option<f64> {
    records
        .iter()
        .map(|r| r.input_price)
        .filter(|p| *p > 0.0)
        .max_by(f64::total_cmp)
}

/// Percentage saved versus the most expensive model, 0 when there is none
pub fn savings_percent(record: &Record, max_input_price: Option<f64>) -> i64 {
    match max_input_price {
        Some(max) if max > 0.0 => ((max - record.input_price) / max * 100.0).round() as i64,
        _ => 0,
    }
}

/// Records paired with their ROI, sorted descending; ties keep input order
pub fn rank_by_roi(records: &[Record]) -> Vec<(Record, f64)> {
    let mut ranked: Vec<(Record, f64)> = records.iter().map(|r| (r.clone(), roi(r))).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Colour band for an ROI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiTier {
    High,
    Medium,
    Low,
}

impl RoiTier {
    pub fn of(roi: f64) -> Self {
        if roi > 150.0 {
            RoiTier::High
        } else if roi > 75.0 {
            RoiTier::Medium
        } else {
            RoiTier::Low
        }
    }
}

/// Display-only badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    BestDeal,
    Fastest,
    Premium,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::BestDeal => "Best Deal",
            Badge::Fastest => "Fastest",
            Badge::Premium => "Premium",
        }
    }
}

/// Precomputed inputs for badge derivation.
///
/// "Best Deal" is relative to the filtered set, "Fastest" to the full set.
#[derive(Debug, Clone, Default)]
pub struct BadgeContext {
    best_deals: HashSet<ModelKey>,
    fastest: HashSet<ModelKey>,
}

impl BadgeContext {
    pub fn new(all: &[Record], filtered: &[Record]) -> Self {
        let best_deals = rank_by_roi(filtered)
            .into_iter()
            .take(TOP_N)
            .map(|(r, _)| r.key())
            .collect();
        let fastest = all.iter().filter(|r| r.is_fast()).map(Record::key).collect();
        Self { best_deals, fastest }
    }

    pub fn badges_for(&self, record: &Record) -> Vec<Badge> {
        let key = record.key();
        let mut badges = Vec::new();
        if self.best_deals.contains(&key) {
            badges.push(Badge::BestDeal);
        }
        if self.fastest.contains(&key) {
            badges.push(Badge::Fastest);
        }
        if record.is_premium() {
            badges.push(Badge::Premium);
        }
        badges
    }
}

/// Use-case tag derived from modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    Text,
    Chat,
    Data,
    Images,
}

impl UseCase {
    pub fn for_modality(modality: &str) -> Vec<UseCase> {
        let mut tags = Vec::new();
        if modality.contains("Text") {
            tags.extend([UseCase::Text, UseCase::Chat, UseCase::Data]);
        }
        if modality.contains("Vision") {
            tags.push(UseCase::Images);
        }
        tags
    }

    pub fn label(self) -> &'static str {
        match self {
            UseCase::Text => "Text",
            UseCase::Chat => "Chat",
            UseCase::Data => "Data",
            UseCase::Images => "Images",
        }
    }
}

/// Catalog-wide summary, computed once at load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Spread between the cheapest and priciest positive input price, as %
    pub max_savings_percent: i64,
    /// Code names of the first few High / Very High quality models
    pub popular: Vec<String>,
    /// Code names of the top models by ROI
    pub best_deals: Vec<String>,
}

impl CatalogStats {
    pub fn compute(records: &[Record]) -> Self {
        let positive = records.iter().map(|r| r.input_price).filter(|p| *p > 0.0);
        let (min, max) = positive.fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let max_savings_percent = if max > 0.0 {
            ((max - min) / max * 100.0).round() as i64
        } else {
            0
        };

        let popular = records
            .iter()
            .filter(|r| r.quality == "Very High" || r.quality == "High")
            .take(TOP_N)
            .map(|r| r.code_name.clone())
            .collect();

        let best_deals = rank_by_roi(records)
            .into_iter()
            .take(TOP_N)
            .map(|(r, _)| r.code_name)
            .collect();

        Self {
            total: records.len(),
            max_savings_percent,
            popular,
            best_deals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(code: &str, input: f64, output: f64, quality: &str) -> Record {
        Record {
            provider: format!("P-{code}"),
            code_name: code.into(),
            input_price: input,
            output_price: output,
            quality: quality.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_quality_weights() {
        assert_eq!(quality_weight("Very High"), 10.0);
        assert_eq!(quality_weight("High"), 7.0);
        assert_eq!(quality_weight("Medium"), 4.0);
        assert_eq!(quality_weight("Low"), 2.0);
        assert_eq!(quality_weight("Experimental"), 1.0);
    }

    #[test]
    fn test_roi_formula() {
        let r = priced("m2", 0.5, 0.5, "Very High");
        assert!((roi(&r) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_zero_price_is_zero() {
        let r = priced("free", 0.0, 0.0, "Very High");
        let score = roi(&r);
        assert_eq!(score, 0.0);
        assert!(score.is_finite());
    }

    #[test]
    fn test_savings_ignores_zero_prices_for_max() {
        let records = vec![priced("a", 0.0, 0.0, "Low"), priced("b", 2.0, 2.0, "Low"), priced("c", 0.5, 1.0, "Low")];
        let max = max_input_price(&records);
        assert_eq!(max, Some(2.0));
        assert_eq!(savings_percent(&records[1], max), 0);
        assert_eq!(savings_percent(&records[2], max), 75);
        assert_eq!(savings_percent(&records[0], max), 100);
    }

    #[test]
    fn test_savings_without_priced_records() {
        let records = vec![priced("a", 0.0, 0.0, "Low")];
        assert_eq!(max_input_price(&records), None);
        assert_eq!(savings_percent(&records[0], None), 0);
    }

    #[test]
    fn test_rank_by_roi_is_stable() {
        let records = vec![
            priced("first", 1.0, 1.0, "High"),
            priced("second", 1.0, 1.0, "High"),
            priced("best", 0.1, 0.1, "High"),
        ];
        let codes: Vec<_> = rank_by_roi(&records).into_iter().map(|(r, _)| r.code_name).collect();
        assert_eq!(codes, vec!["best", "first", "second"]);
    }

    #[test]
    fn test_badges() {
        let mut fast = priced("fast", 1.0, 1.0, "Very High");
        fast.speed = "Fast".into();
        let slow = priced("slow", 50.0, 50.0, "Low");
        let all = vec![fast.clone(), slow.clone()];

        let ctx = BadgeContext::new(&all, &all);
        assert_eq!(ctx.badges_for(&fast), vec![Badge::BestDeal, Badge::Fastest, Badge::Premium]);
        // Only two records, so both are in the top 3
        assert_eq!(ctx.badges_for(&slow), vec![Badge::BestDeal]);
    }

    #[test]
    fn test_best_deal_relative_to_filtered_set() {
        let records: Vec<Record> = (1..=5)
            .map(|i| priced(&format!("m{i}"), i as f64, i as f64, "High"))
            .collect();
        let ctx = BadgeContext::new(&records, &records[2..]);
        assert!(ctx.badges_for(&records[2]).contains(&Badge::BestDeal));
        assert!(ctx.badges_for(&records[4]).contains(&Badge::BestDeal));
        assert!(!ctx.badges_for(&records[0]).contains(&Badge::BestDeal));
    }

    #[test]
    fn test_roi_tier() {
        assert_eq!(RoiTier::of(151.0), RoiTier::High);
        assert_eq!(RoiTier::of(150.0), RoiTier::Medium);
        assert_eq!(RoiTier::of(76.0), RoiTier::Medium);
        assert_eq!(RoiTier::of(75.0), RoiTier::Low);
    }

    #[test]
    fn test_use_cases() {
        assert_eq!(UseCase::for_modality("Text"), vec![UseCase::Text, UseCase::Chat, UseCase::Data]);
        assert_eq!(
            UseCase::for_modality("Text & Vision"),
            vec![UseCase::Text, UseCase::Chat, UseCase::Data, UseCase::Images]
        );
        assert_eq!(UseCase::for_modality("Vision"), vec![UseCase::Images]);
        assert!(UseCase::for_modality("Audio").is_empty());
    }

    #[test]
    fn test_catalog_stats() {
        let records = vec![
            priced("m1", 1.0, 2.0, "High"),
            priced("m2", 0.5, 0.5, "Very High"),
            priced("m3", 0.0, 0.0, "Low"),
            priced("m4", 4.0, 4.0, "High"),
            priced("m5", 2.0, 2.0, "Very High"),
        ];
        let stats = CatalogStats::compute(&records);
        assert_eq!(stats.total, 5);
        // (4 - 0.5) / 4
        assert_eq!(stats.max_savings_percent, 88);
        assert_eq!(stats.popular, vec!["m1", "m2", "m4"]);
        assert_eq!(stats.best_deals, vec!["m2", "m5", "m1"]);
    }

    #[test]
    fn test_catalog_stats_empty() {
        let stats = CatalogStats::compute(&[]);
        assert_eq!(stats.max_savings_percent, 0);
        assert!(stats.popular.is_empty());
        assert!(stats.best_deals.is_empty());
    }
}
