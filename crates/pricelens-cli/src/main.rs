//! Pricelens CLI - browse an AI model pricing catalog from the terminal
//!
//! The CLI is a thin view over pricelens-core: it loads the catalog once,
//! drives the CatalogApp controller through its hooks and prints the result.

mod view;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use console::style;
use serde::Serialize;

use pricelens_core::calculator::parse_token_count;
use pricelens_core::config::ConfigManager;
use pricelens_core::{
    CatalogApp, CatalogLoader, CatalogObserver, CatalogSource, CatalogStats, Config, DataStatus,
    Error, FilterCriteria, FilterOptions, ModelKey, Preset, PriceRange, Record, Task, ViewMode,
};

#[derive(Parser)]
#[command(name = "pricelens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse, filter and compare AI model pricing catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog location (path or http(s) URL) - defaults to config setting
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List models matching the given filters
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Quick-filter preset (cheapest, fastest, best-roi, rf-available)
        #[arg(long)]
        preset: Option<String>,

        /// How to present results (table, cards, chart)
        #[arg(long, default_value = "table")]
        view: String,

        /// Mark models as selected (provider/code-name)
        #[arg(long = "select")]
        selected: Vec<String>,
    },

    /// Show catalog-wide statistics
    Stats,

    /// Estimate cost of a token volume across the filtered models
    Calc {
        #[command(flatten)]
        filters: FilterArgs,

        /// Input tokens (invalid values count as 0)
        #[arg(long)]
        input_tokens: Option<String>,

        /// Output tokens (invalid values count as 0)
        #[arg(long)]
        output_tokens: Option<String>,
    },

    /// Recommend the best-value models for a task
    Guide {
        /// Task (text, chat, data, vision)
        #[arg(long)]
        task: Option<String>,

        /// Monthly volume in millions of tokens
        #[arg(long)]
        volume: Option<u64>,
    },

    /// Compare two or more models side by side (provider/code-name)
    Compare {
        keys: Vec<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration (default)
    Show,

    /// Set the catalog location (path or http(s) URL) and save
    SetSource { location: String },
}

/// Filter flags shared by `list` and `calc`
#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive search over provider, model and code name
    #[arg(short, long)]
    search: Option<String>,

    /// Provider to include (repeatable)
    #[arg(long)]
    provider: Vec<String>,

    /// Modality to include (repeatable)
    #[arg(long)]
    modality: Vec<String>,

    /// Availability value to include (repeatable)
    #[arg(long)]
    availability: Vec<String>,

    /// Speed tier to include (repeatable)
    #[arg(long)]
    speed: Vec<String>,

    /// Quality tier to include (repeatable)
    #[arg(long)]
    quality: Vec<String>,

    /// Minimum input price per 1M tokens
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum input price per 1M tokens
    #[arg(long)]
    max_price: Option<f64>,
}

impl FilterArgs {
    /// Criteria for the given flags, or None when no flag was passed
    fn criteria(&self, config: &Config) -> Option<FilterCriteria> {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => {
                let defaults = config.default_price_range();
                Some(PriceRange::new(min.unwrap_or(defaults.min), max.unwrap_or(defaults.max)))
            }
        };

        let criteria = FilterCriteria {
            search: self.search.clone().unwrap_or_default(),
            providers: self.provider.iter().cloned().collect(),
            modalities: self.modality.iter().cloned().collect(),
            availability: self.availability.iter().cloned().collect(),
            speeds: self.speed.iter().cloned().collect(),
            qualities: self.quality.iter().cloned().collect(),
            price_range,
        };

        (!criteria.is_empty()).then_some(criteria)
    }
}

/// Reports load outcomes on the terminal
struct CliObserver {
    verbose: bool,
}

impl CatalogObserver for CliObserver {
    fn on_data_loaded(&mut self, records: &[Record], options: &FilterOptions, _stats: &CatalogStats) {
        if self.verbose {
            eprintln!(
                "{} {} models from {} providers",
                style("Loaded").dim(),
                records.len(),
                options.providers.len()
            );
        }
    }

    fn on_load_failed(&mut self, error: &Error) {
        eprintln!("{}", style(format!("Error: {}", error)).red());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config_manager, config_warning) = match &cli.config {
        Some(path) => (ConfigManager::with_path(path.clone())?, None),
        None => match ConfigManager::new() {
            Ok(manager) => (manager, None),
            Err(e) => (ConfigManager::default(), Some(e)),
        },
    };

    // Setup logging - configured level by default so log lines don't mix with output
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "info,pricelens_core=debug"
        } else {
            config_manager.config().general.log_level.as_str()
        })
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_warning {
        tracing::warn!("Using default config: {}", e);
    }

    let config = config_manager.config().clone();

    match cli.command {
        Commands::List {
            filters,
            preset,
            view: view_name,
            selected,
        } => {
            let mut app = load_app(&cli.data, &config, cli.verbose).await?;
            if let Some(criteria) = filters.criteria(&config) {
                app.on_filter_changed(criteria);
            }
            if let Some(preset) = preset {
                let preset: Preset = preset.parse()?;
                app.on_preset_selected(preset);
            }
            for key in &selected {
                app.on_selection_toggled(key.parse()?, true);
            }
            app.set_view(view_name.parse::<ViewMode>()?);

            let rows = app.table_rows();
            if cli.json {
                print_json(&rows)?;
            } else {
                view::render_results(&app, &rows);
            }
        }

        Commands::Stats => {
            let app = load_app(&cli.data, &config, cli.verbose).await?;
            if cli.json {
                print_json(app.stats())?;
            } else {
                view::render_stats(app.stats(), app.filter_options());
            }
        }

        Commands::Calc {
            filters,
            input_tokens,
            output_tokens,
        } => {
            let mut app = load_app(&cli.data, &config, cli.verbose).await?;
            if let Some(criteria) = filters.criteria(&config) {
                app.on_filter_changed(criteria);
            }
            let input = input_tokens
                .as_deref()
                .map(parse_token_count)
                .unwrap_or(config.calculator.input_tokens);
            let output = output_tokens
                .as_deref()
                .map(parse_token_count)
                .unwrap_or(config.calculator.output_tokens);

            let rows = app.estimate_freeform(input, output);
            if cli.json {
                print_json(&rows)?;
            } else {
                view::render_freeform(&rows, input, output);
            }
        }

        Commands::Guide { task, volume } => {
            let app = load_app(&cli.data, &config, cli.verbose).await?;
            let task = task
                .as_deref()
                .map(Task::from_name)
                .unwrap_or(config.calculator.guided_task);
            let volume = volume.unwrap_or(config.calculator.guided_volume_millions);

            let rows = app.estimate_guided(task, volume)?;
            if cli.json {
                print_json(&rows)?;
            } else {
                view::render_guided(&rows, task, volume);
            }
        }

        Commands::Compare { keys } => {
            let mut app = load_app(&cli.data, &config, cli.verbose).await?;
            for raw in &keys {
                let key: ModelKey = raw.parse()?;
                app.on_selection_toggled(key, true);
            }

            match app.get_comparison() {
                Ok(records) => {
                    if cli.json {
                        print_json(&records)?;
                    } else {
                        view::render_comparison(&records);
                    }
                }
                Err(e) if e.is_user_facing() => {
                    eprintln!("{}", style(e.to_string()).yellow());
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => show_config(&config_manager, cli.json)?,
            Some(ConfigAction::SetSource { location }) => {
                let mut manager = config_manager;
                manager.set_source(&location);
                manager.save().context("Failed to save config")?;
                println!(
                    "{} {} {}",
                    style("Catalog source set to").green(),
                    manager.config().source.catalog_source(),
                    style(format!("({})", manager.path().display())).dim()
                );
            }
        },
    }

    Ok(())
}

/// Load the catalog and hand it to a fresh controller. The spawned load
/// is awaited on its readiness signal.
async fn load_app(data: &Option<String>, config: &Config, verbose: bool) -> anyhow::Result<CatalogApp> {
    let source = data
        .as_deref()
        .map(CatalogSource::parse)
        .unwrap_or_else(|| config.source.catalog_source());

    let mut handle = CatalogLoader::spawn(
        source,
        config.column_map(),
        std::time::Duration::from_secs(config.source.timeout_secs),
    );

    let mut app = CatalogApp::new().with_default_range(config.default_price_range());
    let mut observer = CliObserver { verbose };
    app.apply_load(handle.ready().await, &mut observer);

    if let DataStatus::Unavailable(message) = app.status() {
        bail!("catalog data unavailable: {}", message);
    }
    Ok(app)
}

fn show_config(manager: &ConfigManager, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(manager.config());
    }
    println!("{} {}", style("Config file:").bold(), manager.path().display());
    if !manager.path().exists() {
        println!("{}", style("(not present, showing defaults)").dim());
    }
    println!();
    let content = toml::to_string_pretty(manager.config()).context("Failed to render config")?;
    println!("{}", content);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
