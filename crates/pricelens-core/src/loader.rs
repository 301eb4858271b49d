//! Catalog loading
//!
//! The catalog is read exactly once per session, from a local file or an
//! HTTP URL. [`CatalogLoader::spawn`] runs the load in the background and
//! publishes its outcome on a watch channel so that anything depending on
//! the data (the guided calculator in particular) can wait for readiness
//! instead of guessing with a timer.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::parser::{ColumnMap, parse_catalog};
use crate::record::Record;

/// Where catalog text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `http://` / `https://` locations are URLs, anything else a path
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }

    /// Fetch the raw text
    pub async fn read(&self, timeout: Duration) -> Result<String> {
        match self {
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Load(format!("{}: {}", path.display(), e))),
            CatalogSource::Url(url) => {
                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let response = client.get(url).send().await?.error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

/// Parsed catalog snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub records: Vec<Record>,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn from_records(records: Vec<Record>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }
}

/// Read and parse a catalog
pub async fn load_catalog(source: &CatalogSource, columns: &ColumnMap, timeout: Duration) -> Result<Catalog> {
    debug!("Loading catalog from {}", source);
    let text = source.read(timeout).await?;
    let records = parse_catalog(&text, columns);
    info!("Loaded {} models from {}", records.len(), source);
    Ok(Catalog::from_records(records, source.to_string()))
}

/// Outcome of the one-shot catalog load
#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(Arc<Catalog>),
    Failed(String),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }
}

/// Starts catalog loads
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load `source` in the background. Must be called inside a tokio runtime.
    pub fn spawn(source: CatalogSource, columns: ColumnMap, timeout: Duration) -> LoadHandle {
        let (tx, rx) = watch::channel(LoadState::Pending);

        tokio::spawn(async move {
            let state = match load_catalog(&source, &columns, timeout).await {
                Ok(catalog) => LoadState::Ready(Arc::new(catalog)),
                Err(e) => {
                    error!(error = %e, source = %source, "Catalog load failed");
                    LoadState::Failed(e.to_string())
                }
            };
            // Nobody listening is fine; the load simply goes unused
            let _ = tx.send(state);
        });

        LoadHandle { rx }
    }
}

/// Readiness signal for a spawned load
#[derive(Debug, Clone)]
pub struct LoadHandle {
    rx: watch::Receiver<LoadState>,
}

impl LoadHandle {
    /// Current state without waiting
    pub fn state(&self) -> LoadState {
        self.rx.borrow().clone()
    }

    /// Wait until the load has finished
    pub async fn ready(&mut self) -> Result<Arc<Catalog>> {
        let state = self
            .rx
            .wait_for(|state| !state.is_pending())
            .await
            .map_err(|_| Error::Load("catalog loader stopped before finishing".to_string()))?
            .clone();

        match state {
            LoadState::Ready(catalog) => Ok(catalog),
            LoadState::Failed(message) => Err(Error::Load(message)),
            LoadState::Pending => Err(Error::DataNotReady),
        }
    }
}
