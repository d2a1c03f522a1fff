//! # Series Math
//!
//! Numeric building blocks for the time-series engine.
//! This crate provides the descriptive statistics used for rescaling series
//! and the trailing-window technical indicators used by formulas.
//!
//! All indicator functions work on a window slice that has already been cut
//! from a series (oldest value first, current value last), so callers decide
//! how a window is assembled and the math stays free of any date handling.

use thiserror::Error;

pub mod moving_averages;
pub mod oscillators;
pub mod stats;
pub mod volatility;

pub use moving_averages::{ema, sma};
pub use oscillators::{roc, rsi, DEFAULT_RSI_PERIOD};
pub use stats::SeriesStats;
pub use volatility::population_std_dev;

/// Errors that can occur in window calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Index range of the trailing window of `len` values ending at `index`,
/// clipped at the start of the series.
///
/// ```
/// use series_math::trailing_range;
///
/// assert_eq!(trailing_range(5, 3), 3..6);
/// assert_eq!(trailing_range(1, 3), 0..2);
/// ```
pub fn trailing_range(index: usize, len: usize) -> std::ops::Range<usize> {
    (index + 1).saturating_sub(len)..index + 1
}

pub(crate) fn check_period(period: usize) -> Result<()> {
    if period == 0 {
        return Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_window(window: &[f64]) -> Result<()> {
    if window.is_empty() {
        return Err(MathError::InsufficientData(
            "Window contains no values".to_string(),
        ));
    }
    Ok(())
}
