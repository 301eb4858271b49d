//! Comparison selection
//!
//! Keeps the keys the user ticked, in the order they were ticked, and
//! resolves them against the catalog for side-by-side display.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::formatting::{format_context, format_price};
use crate::record::{ModelKey, Record};

/// Fewest records a comparison may show
pub const MIN_COMPARE: usize = 2;

/// Insertion-ordered set of selected model keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    keys: Vec<ModelKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `key`. Re-adding an already selected key keeps its
    /// original position.
    pub fn toggle(&mut self, key: ModelKey, included: bool) {
        let pos = self.keys.iter().position(|k| *k == key);
        match (included, pos) {
            (true, None) => self.keys.push(key),
            (false, Some(idx)) => {
                self.keys.remove(idx);
            }
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &ModelKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[ModelKey] {
        &self.keys
    }

    /// Selected records in selection order. Keys missing from `all` are
    /// dropped.
    pub fn selected(&self, all: &[Record]) -> Vec<Record> {
        self.keys
            .iter()
            .filter_map(|key| {
                let found = all.iter().find(|r| r.has_key(key)).cloned();
                if found.is_none() {
                    warn!("Selected model {} is not in the catalog", key);
                }
                found
            })
            .collect()
    }

    /// Records to compare; fails unless at least [`MIN_COMPARE`] resolve
    pub fn comparison(&self, all: &[Record]) -> Result<Vec<Record>> {
        let records = self.selected(all);
        if records.len() < MIN_COMPARE {
            return Err(Error::InsufficientSelection {
                selected: records.len(),
            });
        }
        Ok(records)
    }
}

/// Attribute rows of the comparison table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonField {
    Provider,
    Name,
    CodeName,
    InputPrice,
    OutputPrice,
    ContextWindow,
    Modality,
    Availability,
    Speed,
    Quality,
    Specialization,
    DocsUrl,
}

impl ComparisonField {
    pub const ALL: [ComparisonField; 12] = [
        ComparisonField::Provider,
        ComparisonField::Name,
        ComparisonField::CodeName,
        ComparisonField::InputPrice,
        ComparisonField::OutputPrice,
        ComparisonField::ContextWindow,
        ComparisonField::Modality,
        ComparisonField::Availability,
        ComparisonField::Speed,
        ComparisonField::Quality,
        ComparisonField::Specialization,
        ComparisonField::DocsUrl,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComparisonField::Provider => "Provider",
            ComparisonField::Name => "Model",
            ComparisonField::CodeName => "Code name",
            ComparisonField::InputPrice => "Input / 1M",
            ComparisonField::OutputPrice => "Output / 1M",
            ComparisonField::ContextWindow => "Context",
            ComparisonField::Modality => "Modality",
            ComparisonField::Availability => "Availability",
            ComparisonField::Speed => "Speed",
            ComparisonField::Quality => "Quality",
            ComparisonField::Specialization => "Specialization",
            ComparisonField::DocsUrl => "Docs",
        }
    }

    pub fn display(self, record: &Record) -> String {
        match self {
            ComparisonField::Provider => record.provider.clone(),
            ComparisonField::Name => record.name.clone(),
            ComparisonField::CodeName => record.code_name.clone(),
            ComparisonField::InputPrice => format_price(record.input_price),
            ComparisonField::OutputPrice => format_price(record.output_price),
            ComparisonField::ContextWindow => format_context(record.context_window),
            ComparisonField::Modality => record.modality.clone(),
            ComparisonField::Availability => record.availability.clone(),
            ComparisonField::Speed => record.speed.clone(),
            ComparisonField::Quality => record.quality.clone(),
            ComparisonField::Specialization => record.specialization.clone(),
            ComparisonField::DocsUrl => record.docs_url.clone(),
        }
    }
}

/// One labelled row of a comparison, one value per compared record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub values: Vec<String>,
}

/// Build the comparison table body for already-validated records
pub fn comparison_rows(records: &[Record]) -> Vec<ComparisonRow> {
    ComparisonField::ALL
        .iter()
        .map(|field| ComparisonRow {
            label: field.label().to_string(),
            values: records.iter().map(|r| field.display(r)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(provider: &str, code: &str) -> Record {
        Record {
            provider: provider.into(),
            code_name: code.into(),
            name: code.to_uppercase(),
            input_price: 1.5,
            context_window: 128_000,
            docs_url: format!("https://docs.{code}.example"),
            ..Default::default()
        }
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut sel = Selection::new();
        sel.toggle(ModelKey::new("B", "b"), true);
        sel.toggle(ModelKey::new("A", "a"), true);
        sel.toggle(ModelKey::new("B", "b"), true);
        assert_eq!(sel.keys(), &[ModelKey::new("B", "b"), ModelKey::new("A", "a")]);

        sel.toggle(ModelKey::new("B", "b"), false);
        assert_eq!(sel.keys(), &[ModelKey::new("A", "a")]);

        // removing something never selected is a no-op
        sel.toggle(ModelKey::new("C", "c"), false);
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_selected_resolves_in_selection_order() {
        let all = vec![model("A", "a"), model("B", "b"), model("C", "c")];
        let mut sel = Selection::new();
        sel.toggle(ModelKey::new("C", "c"), true);
        sel.toggle(ModelKey::new("A", "a"), true);
        let codes: Vec<_> = sel.selected(&all).into_iter().map(|r| r.code_name).collect();
        assert_eq!(codes, vec!["c", "a"]);
    }

    #[test]
    fn test_unresolved_keys_are_dropped() {
        let all = vec![model("A", "a")];
        let mut sel = Selection::new();
        sel.toggle(ModelKey::new("Gone", "x"), true);
        sel.toggle(ModelKey::new("A", "a"), true);
        assert_eq!(sel.selected(&all).len(), 1);
    }

    #[test]
    fn test_comparison_requires_two() {
        let all = vec![model("A", "a"), model("B", "b")];
        let mut sel = Selection::new();
        assert!(matches!(
            sel.comparison(&all),
            Err(Error::InsufficientSelection { selected: 0 })
        ));

        sel.toggle(ModelKey::new("A", "a"), true);
        assert!(matches!(
            sel.comparison(&all),
            Err(Error::InsufficientSelection { selected: 1 })
        ));

        sel.toggle(ModelKey::new("B", "b"), true);
        assert_eq!(sel.comparison(&all).unwrap().len(), 2);
    }

    #[test]
    fn test_comparison_counts_only_resolved_keys() {
        let all = vec![model("A", "a")];
        let mut sel = Selection::new();
        sel.toggle(ModelKey::new("A", "a"), true);
        sel.toggle(ModelKey::new("Gone", "x"), true);
        assert!(sel.comparison(&all).is_err());
    }

    #[test]
    fn test_clear() {
        let mut sel = Selection::new();
        sel.toggle(ModelKey::new("A", "a"), true);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_comparison_rows_format_values() {
        let records = vec![model("A", "a"), model("B", "b")];
        let rows = comparison_rows(&records);
        assert_eq!(rows.len(), ComparisonField::ALL.len());
        let price = rows.iter().find(|r| r.label == "Input / 1M").unwrap();
        assert_eq!(price.values, vec!["$1.50", "$1.50"]);
        let context = rows.iter().find(|r| r.label == "Context").unwrap();
        assert_eq!(context.values, vec!["128K", "128K"]);
        let docs = rows.last().unwrap();
        assert_eq!(docs.label, "Docs");
        assert_eq!(docs.values, vec!["https://docs.a.example", "https://docs.b.example"]);
    }
}
