//! Error types for Pricelens Core

use thiserror::Error;

/// Result type alias using Pricelens Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pricelens error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog data unavailable: {0}")]
    Load(String),

    #[error("Catalog data is still loading")]
    DataNotReady,

    #[error("Select at least 2 models to compare ({selected} selected)")]
    InsufficientSelection { selected: usize },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Invalid model key '{0}', expected provider/code-name")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether this error should be shown to the user rather than only logged
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Load(_) | Error::InsufficientSelection { .. })
    }
}
