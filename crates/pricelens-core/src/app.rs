//! Application state controller
//!
//! [`CatalogApp`] owns everything a browsing session mutates: the full
//! record set, the filtered set, the active criteria and preset, the
//! current view and the comparison selection. Views talk to it only
//! through the `on_*` hooks and the read accessors, and get notified of
//! load completion through a [`CatalogObserver`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::calculator::{self, CostRow, GuidedRow, Task};
use crate::error::{Error, Result};
use crate::filter::{FilterCriteria, FilterOptions, PriceRange};
use crate::loader::Catalog;
use crate::preset::Preset;
use crate::record::{ModelKey, Record};
use crate::scoring::{self, Badge, BadgeContext, CatalogStats, RoiTier, UseCase};
use crate::selection::Selection;

/// Receives load notifications. Every method has a no-op default.
pub trait CatalogObserver {
    /// Fired once after a successful load, before any filtering
    fn on_data_loaded(&mut self, _records: &[Record], _options: &FilterOptions, _stats: &CatalogStats) {}

    /// Fired once if the catalog could not be loaded
    fn on_load_failed(&mut self, _error: &Error) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NoopObserver;

impl CatalogObserver for NoopObserver {}

/// Whether catalog data is usable yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum DataStatus {
    Loading,
    Ready,
    Unavailable(String),
}

/// How the result set is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
    /// Not implemented; views render a placeholder
    Chart,
}

impl ViewMode {
    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Cards => "cards",
            ViewMode::Chart => "chart",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [ViewMode::Table, ViewMode::Cards, ViewMode::Chart]
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownView(s.to_string()))
    }
}

/// A filtered record decorated for the table view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub record: Record,
    pub selected: bool,
    pub roi: f64,
    pub roi_tier: RoiTier,
    pub savings_percent: i64,
    pub badges: Vec<Badge>,
    pub use_cases: Vec<UseCase>,
}

/// Session controller
pub struct CatalogApp {
    status: DataStatus,
    catalog: Option<Arc<Catalog>>,
    all: Vec<Record>,
    filtered: Vec<Record>,
    criteria: FilterCriteria,
    active_preset: Option<Preset>,
    view: ViewMode,
    selection: Selection,
    stats: CatalogStats,
    options: FilterOptions,
    default_range: Option<PriceRange>,
}

impl Default for CatalogApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogApp {
    /// Empty controller waiting for data
    pub fn new() -> Self {
        Self {
            status: DataStatus::Loading,
            catalog: None,
            all: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            active_preset: None,
            view: ViewMode::default(),
            selection: Selection::new(),
            stats: CatalogStats::default(),
            options: FilterOptions::default(),
            default_range: None,
        }
    }

    /// Price range a filter reset restores
    pub fn with_default_range(mut self, range: PriceRange) -> Self {
        self.default_range = Some(range);
        self
    }

    /// Controller over an already parsed record set
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut app = Self::new();
        app.on_data_loaded(Arc::new(Catalog::from_records(records, "memory")), &mut NoopObserver);
        app
    }

    // ------------------------------------------------------------------
    // Load hooks
    // ------------------------------------------------------------------

    /// Install the loaded catalog. Only the first load counts.
    pub fn on_data_loaded(&mut self, catalog: Arc<Catalog>, observer: &mut dyn CatalogObserver) {
        if self.status == DataStatus::Ready {
            debug!("Ignoring repeated catalog load from {}", catalog.source);
            return;
        }

        self.all = catalog.records.clone();
        self.filtered = self.all.clone();
        self.stats = CatalogStats::compute(&self.all);
        self.options = FilterOptions::from_records(&self.all);
        self.catalog = Some(catalog);
        self.status = DataStatus::Ready;
        info!("Catalog ready with {} models", self.all.len());

        observer.on_data_loaded(&self.all, &self.options, &self.stats);
    }

    /// Record a failed load; every view will see an empty catalog
    pub fn on_load_failed(&mut self, err: Error, observer: &mut dyn CatalogObserver) {
        error!(error = %err, "Catalog data unavailable");
        self.all.clear();
        self.filtered.clear();
        self.status = DataStatus::Unavailable(err.to_string());
        observer.on_load_failed(&err);
    }

    /// Dispatch a load outcome to the matching hook
    pub fn apply_load(&mut self, result: Result<Arc<Catalog>>, observer: &mut dyn CatalogObserver) {
        match result {
            Ok(catalog) => self.on_data_loaded(catalog, observer),
            Err(err) => self.on_load_failed(err, observer),
        }
    }

    // ------------------------------------------------------------------
    // Filtering and presets
    // ------------------------------------------------------------------

    /// Replace the criteria and recompute the filtered set. Clears any
    /// active preset.
    pub fn on_filter_changed(&mut self, criteria: FilterCriteria) -> &[Record] {
        self.criteria = criteria;
        self.active_preset = None;
        self.filtered = self.criteria.apply(&self.all);
        debug!("Filter matched {} of {} models", self.filtered.len(), self.all.len());
        &self.filtered
    }

    /// Apply a quick-filter preset, superseding the previous one
    pub fn on_preset_selected(&mut self, preset: Preset) -> &[Record] {
        self.filtered = preset.apply(&self.all, &self.criteria);
        self.active_preset = Some(preset);
        debug!("Preset {} produced {} models", preset, self.filtered.len());
        &self.filtered
    }

    /// Clear every condition back to defaults
    pub fn reset_filters(&mut self) -> &[Record] {
        let mut criteria = FilterCriteria::default();
        criteria.reset(self.default_range);
        self.on_filter_changed(criteria)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn on_selection_toggled(&mut self, key: ModelKey, included: bool) {
        self.selection.toggle(key, included);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected records for side-by-side display, at least two
    pub fn get_comparison(&self) -> Result<Vec<Record>> {
        self.selection.comparison(&self.all)
    }

    // ------------------------------------------------------------------
    // Calculators
    // ------------------------------------------------------------------

    /// Cost of every filtered model, cheapest first
    pub fn estimate_freeform(&self, input_tokens: u64, output_tokens: u64) -> Vec<CostRow> {
        calculator::estimate_freeform(&self.filtered, input_tokens, output_tokens)
    }

    /// Best-ROI models for a task over the whole catalog
    pub fn estimate_guided(&self, task: Task, volume_millions: u64) -> Result<Vec<GuidedRow>> {
        match &self.status {
            DataStatus::Ready => Ok(calculator::estimate_guided(&self.all, task, volume_millions)),
            DataStatus::Loading => Err(Error::DataNotReady),
            DataStatus::Unavailable(message) => Err(Error::Load(message.clone())),
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Filtered records with derived metrics and badges
    pub fn table_rows(&self) -> Vec<TableRow> {
        let badges = BadgeContext::new(&self.all, &self.filtered);
        let max_price = scoring::max_input_price(&self.all);

        self.filtered
            .iter()
            .map(|record| {
                let roi = scoring::roi(record);
                TableRow {
                    selected: self.selection.contains(&record.key()),
                    roi,
                    roi_tier: RoiTier::of(roi),
                    savings_percent: scoring::savings_percent(record, max_price),
                    badges: badges.badges_for(record),
                    use_cases: UseCase::for_modality(&record.modality),
                    record: record.clone(),
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn status(&self) -> &DataStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == DataStatus::Ready
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        self.catalog.as_ref()
    }

    pub fn all_records(&self) -> &[Record] {
        &self.all
    }

    pub fn filtered_records(&self) -> &[Record] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn active_preset(&self) -> Option<Preset> {
        self.active_preset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }
}
