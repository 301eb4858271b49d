//! Catalog pipeline tests
//!
//! Parse -> filter -> score -> preset over the bundled fixture catalog.

use std::collections::BTreeSet;

use pricelens_core::filter::{FilterCriteria, PriceRange};
use pricelens_core::parser::{ColumnMap, parse_catalog, split_line, write_catalog};
use pricelens_core::preset::Preset;
use pricelens_core::record::Record;
use pricelens_core::scoring::{self, CatalogStats};

const FIXTURE: &str = include_str!("fixtures/models.csv");

fn fixture() -> Vec<Record> {
    parse_catalog(FIXTURE, &ColumnMap::default())
}

fn codes(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.code_name.as_str()).collect()
}

mod parse_tests {
    use super::*;

    #[test]
    fn test_fixture_parses_every_row() {
        let records = fixture();
        assert_eq!(records.len(), 9);
        assert_eq!(records[0].provider, "OpenAI");
        assert_eq!(records[3].context_window, 1_000_000);
    }

    #[test]
    fn test_quoted_specialization_stays_one_field() {
        let records = fixture();
        assert_eq!(records[0].specialization, "Универсальная, мультимодальная");
        // the field after the quoted one is not shifted
        assert_eq!(records[0].docs_url, "https://platform.openai.com/docs/models/gpt-4o");
    }

    #[test]
    fn test_quoted_delimiter_property() {
        for inner in ["a,b", ",", "x, y, z", "trailing,"] {
            let line = format!("left,\"{inner}\",right");
            let cells = split_line(&line);
            assert_eq!(cells.len(), 3, "{line}");
            assert_eq!(cells[1], inner);
        }
    }

    #[test]
    fn test_numeric_invariants_hold() {
        for record in fixture() {
            assert!(record.input_price.is_finite() && record.input_price >= 0.0);
            assert!(record.output_price.is_finite() && record.output_price >= 0.0);
        }
    }

    #[test]
    fn test_write_then_parse_round_trip() {
        let records = fixture();
        let text = write_catalog(&records);
        let reparsed = parse_catalog(&text, &ColumnMap::default());
        assert_eq!(reparsed.len(), records.len());
        for (a, b) in records.iter().zip(&reparsed) {
            assert_eq!(a.provider, b.provider);
            assert_eq!(a.name, b.name);
            assert_eq!(a.code_name, b.code_name);
            assert_eq!(a.specialization, b.specialization);
            assert!((a.input_price - b.input_price).abs() < 1e-9);
            assert!((a.output_price - b.output_price).abs() < 1e-9);
            assert_eq!(a.context_window, b.context_window);
        }
    }
}

mod filter_tests {
    use super::*;

    #[test]
    fn test_empty_criteria_returns_full_set() {
        let records = fixture();
        assert_eq!(FilterCriteria::default().apply(&records), records);
    }

    #[test]
    fn test_conjunction_matches_independent_checks() {
        let records = fixture();
        let criteria = FilterCriteria {
            search: "o".into(),
            availability: BTreeSet::from(["VPN".to_string()]),
            speeds: BTreeSet::from(["Fast".to_string()]),
            price_range: Some(PriceRange::new(0.0, 1.0)),
            ..Default::default()
        };
        let out = criteria.apply(&records);

        for record in &records {
            let expected = record.search_text().contains('o')
                && record.availability == "VPN"
                && record.speed == "Fast"
                && record.input_price <= 1.0;
            assert_eq!(out.contains(record), expected, "{}", record.code_name);
        }
        assert_eq!(codes(&out), vec!["gpt-4o-mini", "gemini-2.0-flash"]);
    }

    #[test]
    fn test_provider_membership() {
        let records = fixture();
        let criteria = FilterCriteria {
            providers: BTreeSet::from(["Sber".to_string(), "Yandex".to_string()]),
            ..Default::default()
        };
        assert_eq!(codes(&criteria.apply(&records)), vec!["yandexgpt", "gigachat-lite"]);
    }

    #[test]
    fn test_single_price_point_range() {
        let records = fixture();
        let out = FilterCriteria::with_price_range(PriceRange::new(0.15, 0.15)).apply(&records);
        assert_eq!(codes(&out), vec!["gpt-4o-mini", "pixtral-12b"]);
    }
}

mod scoring_tests {
    use super::*;

    #[test]
    fn test_catalog_stats() {
        let stats = CatalogStats::compute(&fixture());
        assert_eq!(stats.total, 9);
        // (3.0 - 0.1) / 3.0
        assert_eq!(stats.max_savings_percent, 97);
        assert_eq!(stats.popular, vec!["gpt-4o", "gpt-4o-mini", "claude-sonnet-4"]);
        assert_eq!(stats.best_deals, vec!["gemini-2.0-flash", "pixtral-12b", "gigachat-lite"]);
    }

    #[test]
    fn test_free_model_scores_zero() {
        let records = fixture();
        let llama = records.iter().find(|r| r.code_name == "llama-3.1-8b").unwrap();
        assert_eq!(scoring::roi(llama), 0.0);
    }
}

mod preset_tests {
    use super::*;

    #[test]
    fn test_fastest_overrides_search() {
        let records = fixture();
        let criteria = FilterCriteria {
            search: "claude".into(),
            ..Default::default()
        };
        let out = Preset::Fastest.apply(&records, &criteria);
        let expected: Vec<Record> = records.iter().filter(|r| r.speed == "Fast").cloned().collect();
        assert_eq!(out, expected);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_rf_available() {
        let out = Preset::RfAvailable.apply(&fixture(), &FilterCriteria::default());
        assert_eq!(codes(&out), vec!["deepseek-chat", "yandexgpt", "gigachat-lite", "llama-3.1-8b"]);
    }

    #[test]
    fn test_best_roi_descending() {
        let out = Preset::BestRoi.apply(&fixture(), &FilterCriteria::default());
        let rois: Vec<f64> = out.iter().map(scoring::roi).collect();
        assert!(rois.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(out.last().unwrap().code_name, "llama-3.1-8b");
    }

    #[test]
    fn test_cheapest_ascending() {
        let out = Preset::Cheapest.apply(&fixture(), &FilterCriteria::default());
        assert!(out.windows(2).all(|w| w[0].input_price <= w[1].input_price));
        assert_eq!(out[0].code_name, "llama-3.1-8b");
    }
}
