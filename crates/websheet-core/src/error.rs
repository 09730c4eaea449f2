//! Error types for Websheet core.

use thiserror::Error;

/// Errors that can occur while operating on a sheet or its files.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid cell identifier: {0}")]
    InvalidCellId(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
