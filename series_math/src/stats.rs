//! Descriptive statistics over series values
//!
//! Missing observations are represented as NaN and are skipped here, so the
//! statistics describe only the values that were actually observed.

use serde::{Deserialize, Serialize};

/// Summary of the observed values of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
    /// Arithmetic mean of the observed values
    pub mean: f64,
    /// Number of observed (non-NaN) values
    pub count: usize,
}

impl SeriesStats {
    /// Compute statistics over the non-NaN values, or `None` if there are none.
    ///
    /// ```
    /// use series_math::SeriesStats;
    ///
    /// let stats = SeriesStats::describe([10.0, f64::NAN, 30.0]).unwrap();
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.mean, 20.0);
    /// assert_eq!(stats.range(), 20.0);
    /// ```
    pub fn describe<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for value in values.into_iter().filter(|v| !v.is_nan()) {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            min,
            max,
            mean: sum / count as f64,
            count,
        })
    }

    /// Spread between the largest and smallest value
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Mean of the non-NaN values, NaN when every value is missing.
pub fn mean_ignoring_nan(values: &[f64]) -> f64 {
    SeriesStats::describe(values.iter().copied())
        .map(|stats| stats.mean)
        .unwrap_or(f64::NAN)
}
