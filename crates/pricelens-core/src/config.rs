//! Configuration management for Pricelens
//!
//! Handles loading, saving, and managing application configuration:
//! where the catalog comes from, extra column labels, filter and
//! calculator defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::calculator::Task;
use crate::error::{Error, Result};
use crate::filter::PriceRange;
use crate::loader::CatalogSource;
use crate::parser::{ColumnMap, Field};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Extra header labels, mapped onto record fields
    #[serde(default)]
    pub columns: HashMap<String, Field>,
    /// Filter defaults
    #[serde(default)]
    pub filters: FilterConfig,
    /// Calculator defaults
    #[serde(default)]
    pub calculator: CalculatorConfig,
    /// Logging settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Column map with the built-in labels plus configured aliases
    pub fn column_map(&self) -> ColumnMap {
        ColumnMap::default().with_aliases(&self.columns)
    }

    /// Price range restored by a filter reset
    pub fn default_price_range(&self) -> PriceRange {
        PriceRange::new(self.filters.price_min, self.filters.price_max)
    }
}

/// Where the catalog text is read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local path or http(s) URL
    pub location: String,
    /// Timeout for remote sources (seconds)
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "models.csv".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.location)
    }
}

/// Filter defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Lower input-price bound after a reset (USD per 1M tokens)
    pub price_min: f64,
    /// Upper input-price bound after a reset (USD per 1M tokens)
    pub price_max: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            price_min: 0.0,
            price_max: 10.0,
        }
    }
}

/// Calculator defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub guided_task: Task,
    pub guided_volume_millions: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            input_tokens: 1_000_000,
            output_tokens: 500_000,
            guided_task: Task::Text,
            guided_volume_millions: 1,
        }
    }
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tracing filter used when not running verbose (e.g. "warn", "info")
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config_path, config })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("pricelens").join("config.toml"))
    }

    /// Load configuration from a file
    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&self.config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Point the catalog source at a new path or URL
    pub fn set_source(&mut self, location: &str) {
        self.config.source.location = location.to_string();
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_path: PathBuf::from("config.toml"),
            config: Config::default(),
        })
    }
}
