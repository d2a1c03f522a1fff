//! Utility functions for building series

use crate::error::{Result, SeriesError};
use crate::model::{DataPoint, Series};
use chrono::{Days, NaiveDate};

/// Build a series from values spaced `step_days` apart, starting at `start`.
///
/// NaN values become missing observations.
pub fn series_from_values(
    id: &str,
    start: NaiveDate,
    step_days: u64,
    values: &[f64],
) -> Result<Series> {
    let points = values
        .iter()
        .enumerate()
        .filter_map(|(i, &value)| {
            start
                .checked_add_days(Days::new(i as u64 * step_days))
                .map(|date| DataPoint::new(date, value))
        })
        .collect();
    Series::new(id, id, points)
}

/// Generate a random-walk daily series for demos and testing
///
/// # Arguments
/// * `id` - Identifier and name of the series
/// * `num_points` - Number of daily points to generate
/// * `starting_value` - Value of the first point
/// * `volatility` - Relative size of each step (0.0-1.0)
pub fn generate_test_series(
    id: &str,
    num_points: usize,
    starting_value: f64,
    volatility: f64,
) -> Result<Series> {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let mut current = starting_value;
    let mut values = Vec::with_capacity(num_points);

    for _ in 0..num_points {
        values.push(current);
        current += current * volatility * (rng.gen::<f64>() - 0.5);
    }

    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .ok_or_else(|| SeriesError::InvalidDate("2020-01-01".to_string()))?;
    series_from_values(id, start, 1, &values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_from_values() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = series_from_values("x", start, 7, &[1.0, f64::NAN, 3.0]).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.points()[2].date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert!(series.points()[1].is_missing());
    }

    #[test]
    fn test_generate_test_series() {
        let series = generate_test_series("walk", 50, 100.0, 0.05).unwrap();
        assert_eq!(series.len(), 50);
        assert_eq!(series.points()[0].value, Some(100.0));

        // Check that dates are sequential
        for pair in series.points().windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
    }
}
