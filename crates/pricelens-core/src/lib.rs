//! Pricelens Core - AI model catalog browsing
//!
//! This crate provides the core functionality for Pricelens:
//! - Catalog parsing from delimited text
//! - Composable filters and quick-filter presets
//! - ROI, savings and badge scoring
//! - Free-form and guided cost calculators
//! - Comparison selection
//! - One-shot catalog loading with a readiness signal

pub mod app;
pub mod calculator;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatting;
pub mod loader;
pub mod parser;
pub mod preset;
pub mod record;
pub mod scoring;
pub mod selection;

pub use app::{CatalogApp, CatalogObserver, DataStatus, NoopObserver, TableRow, ViewMode};
pub use calculator::{CostEstimate, CostRow, GuidedRow, Task, estimate_cost};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use filter::{FilterCriteria, FilterOptions, PriceRange};
pub use loader::{Catalog, CatalogLoader, CatalogSource, LoadHandle, LoadState, load_catalog};
pub use parser::{ColumnMap, Field, parse_catalog, write_catalog};
pub use preset::Preset;
pub use record::{Availability, ModelKey, Record};
pub use scoring::{Badge, CatalogStats, RoiTier, UseCase, roi};
pub use selection::{ComparisonField, ComparisonRow, Selection, comparison_rows};

// Formatting exports
pub use formatting::{format_context, format_cost, format_price, format_roi, truncate_str};
