//! Cost estimation
//!
//! Two calculators share [`estimate_cost`]: the free-form one ranks every
//! record of a set by total cost, the guided one picks the best-ROI models
//! for a task at a given monthly volume.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Record;
use crate::scoring::{TOP_N, roi};

pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Cost of a request volume against one record's prices (USD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total: f64,
}

pub fn estimate_cost(record: &Record, input_tokens: u64, output_tokens: u64) -> CostEstimate {
    let input_cost = input_tokens as f64 / TOKENS_PER_MILLION * record.input_price;
    let output_cost = output_tokens as f64 / TOKENS_PER_MILLION * record.output_price;
    CostEstimate {
        input_cost,
        output_cost,
        total: input_cost + output_cost,
    }
}

/// Read a user-entered token count; anything invalid counts as 0
pub fn parse_token_count(raw: &str) -> u64 {
    crate::parser::lenient_count(raw)
}

/// One free-form calculator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub record: Record,
    #[serde(flatten)]
    pub cost: CostEstimate,
}

/// Cost of every record, cheapest first (ties keep input order)
pub fn estimate_freeform(records: &[Record], input_tokens: u64, output_tokens: u64) -> Vec<CostRow> {
    let mut rows: Vec<CostRow> = records
        .iter()
        .map(|r| CostRow {
            record: r.clone(),
            cost: estimate_cost(r, input_tokens, output_tokens),
        })
        .collect();
    rows.sort_by(|a, b| a.cost.total.total_cmp(&b.cost.total));
    rows
}

/// Workload the guided calculator recommends for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Text,
    Chat,
    Data,
    Vision,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Text, Task::Chat, Task::Data, Task::Vision];

    pub fn name(self) -> &'static str {
        match self {
            Task::Text => "text",
            Task::Chat => "chat",
            Task::Data => "data",
            Task::Vision => "vision",
        }
    }

    /// Modality substrings that qualify a record for this task
    pub fn modalities(self) -> &'static [&'static str] {
        match self {
            Task::Vision => &["Text & Vision", "Vision"],
            Task::Text | Task::Chat | Task::Data => &["Text"],
        }
    }

    pub fn accepts(self, record: &Record) -> bool {
        self.modalities().iter().any(|m| record.modality.contains(m))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Task {
    /// Look up a task by name. Unrecognised names fall back to the text
    /// workload.
    pub fn from_name(name: &str) -> Task {
        Task::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_else(|| {
                debug!("Unknown task '{}', using text models", name);
                Task::Text
            })
    }
}

impl FromStr for Task {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        Ok(Task::from_name(s))
    }
}

/// One guided calculator recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidedRow {
    pub record: Record,
    pub total_cost: f64,
    pub roi: f64,
}

/// Top models by ROI for `task`, costed at `volume_millions` input and
/// `volume_millions` output tokens.
pub fn estimate_guided(records: &[Record], task: Task, volume_millions: u64) -> Vec<GuidedRow> {
    let tokens = volume_millions.saturating_mul(1_000_000);
    let mut rows: Vec<GuidedRow> = records
        .iter()
        .filter(|r| task.accepts(r))
        .map(|r| GuidedRow {
            record: r.clone(),
            total_cost: estimate_cost(r, tokens, tokens).total,
            roi: roi(r),
        })
        .collect();
    rows.sort_by(|a, b| b.roi.total_cmp(&a.roi));
    rows.truncate(TOP_N);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(code: &str, input: f64, output: f64, modality: &str) -> Record {
        Record {
            provider: "P".into(),
            code_name: code.into(),
            input_price: input,
            output_price: output,
            modality: modality.into(),
            quality: "High".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_estimate_cost() {
        let r = model("m", 2.0, 8.0, "Text");
        let cost = estimate_cost(&r, 500_000, 250_000);
        assert!((cost.input_cost - 1.0).abs() < 1e-12);
        assert!((cost.output_cost - 2.0).abs() < 1e-12);
        assert!((cost.total - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_token_count_defaults_to_zero() {
        assert_eq!(parse_token_count("1500"), 1500);
        assert_eq!(parse_token_count("lots"), 0);
        assert_eq!(parse_token_count(""), 0);
    }

    #[test]
    fn test_freeform_sorted_ascending() {
        let records = vec![model("pricey", 10.0, 10.0, "Text"), model("cheap", 0.1, 0.1, "Text"), model("mid", 1.0, 1.0, "Text")];
        let rows = estimate_freeform(&records, 1_000_000, 1_000_000);
        let codes: Vec<_> = rows.iter().map(|r| r.record.code_name.as_str()).collect();
        assert_eq!(codes, vec!["cheap", "mid", "pricey"]);
    }

    #[test]
    fn test_freeform_zero_tokens() {
        let records = vec![model("a", 1.0, 1.0, "Text")];
        let rows = estimate_freeform(&records, 0, 0);
        assert_eq!(rows[0].cost.total, 0.0);
    }

    #[test]
    fn test_task_modalities() {
        assert!(Task::Vision.accepts(&model("v", 1.0, 1.0, "Vision")));
        assert!(Task::Vision.accepts(&model("tv", 1.0, 1.0, "Text & Vision")));
        assert!(!Task::Vision.accepts(&model("t", 1.0, 1.0, "Text")));
        assert!(Task::Chat.accepts(&model("tv", 1.0, 1.0, "Text & Vision")));
        assert!(!Task::Data.accepts(&model("v", 1.0, 1.0, "Vision")));
    }

    #[test]
    fn test_task_parse() {
        assert_eq!("Vision".parse::<Task>().unwrap(), Task::Vision);
        assert_eq!(Task::from_name(" chat "), Task::Chat);
    }

    #[test]
    fn test_unknown_task_uses_text_models() {
        assert_eq!(Task::from_name("summarize"), Task::Text);
        assert_eq!("audio".parse::<Task>().unwrap(), Task::Text);

        let records = vec![model("t", 1.0, 1.0, "Text"), model("v", 1.0, 1.0, "Vision")];
        let rows = estimate_guided(&records, Task::from_name("summarize"), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.code_name, "t");
    }

    #[test]
    fn test_guided_single_vision_model() {
        let records = vec![model("t1", 1.0, 1.0, "Text"), model("v1", 2.0, 3.0, "Vision"), model("t2", 0.5, 0.5, "Text")];
        let rows = estimate_guided(&records, Task::Vision, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.code_name, "v1");
        assert!((rows[0].total_cost - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_guided_top_three_by_roi() {
        let records: Vec<Record> = (1..=5)
            .map(|i| model(&format!("m{i}"), i as f64, i as f64, "Text"))
            .collect();
        let rows = estimate_guided(&records, Task::Text, 10);
        let codes: Vec<_> = rows.iter().map(|r| r.record.code_name.as_str()).collect();
        assert_eq!(codes, vec!["m1", "m2", "m3"]);
        assert!((rows[0].total_cost - 20.0).abs() < 1e-9);
    }
}
