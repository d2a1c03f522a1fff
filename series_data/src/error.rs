//! Error types for the series_data crate

use crate::config::ConfigError;
use crate::fetch::FetchError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building, storing or exporting series
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Two points of the same series share a date
    #[error("Duplicate date {date} in series '{series}'")]
    DuplicateDate { series: String, date: NaiveDate },

    /// A date string could not be parsed as a calendar day
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// No series with this id is registered
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    /// Error from invalid parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from decoding collaborator payloads
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error from CSV export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a fetch collaborator
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Error from loading or saving configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SeriesError>;
