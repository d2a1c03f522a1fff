//! Error type of the workspace facade

use series_data::{FetchError, SeriesError};
use series_formula::FormulaError;
use thiserror::Error;

/// Errors returned by [`crate::Workspace`] operations
#[derive(Error, Debug)]
pub enum LensError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error("No visible series")]
    NoVisibleSeries,
}

impl From<FetchError> for LensError {
    fn from(err: FetchError) -> Self {
        LensError::Series(SeriesError::Fetch(err))
    }
}

/// Result type for workspace operations
pub type Result<T> = std::result::Result<T, LensError>;
