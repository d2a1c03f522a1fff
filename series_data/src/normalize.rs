//! Rescaling of comparison series onto a primary series' range
//!
//! Each comparison value is mapped with
//! `(value - mean_c) / range_c * range_p + mean_p`, and the value it had before
//! is kept in `original_value` so formulas and tooltips can recover it.

use crate::model::{DataPoint, Series};
use series_math::SeriesStats;

/// Statistics of the displayed values of `series`
pub fn displayed_stats(series: &Series) -> Option<SeriesStats> {
    SeriesStats::describe(series.values())
}

/// Statistics of the pre-normalization values of `series`
pub fn true_stats(series: &Series) -> Option<SeriesStats> {
    SeriesStats::describe(series.true_values())
}

/// Rescale `comparison` onto the numeric range of `primary`.
///
/// Returns the comparison unchanged when either series is flat, has a single
/// value or has no observed values at all.
pub fn normalize(primary: &Series, comparison: &Series) -> Series {
    let (Some(target), Some(source)) = (displayed_stats(primary), true_stats(comparison)) else {
        log::warn!(
            "Skipping normalization of '{}' onto '{}': no observed values",
            comparison.id(),
            primary.id()
        );
        return comparison.clone();
    };

    let (range_p, range_c) = (target.range(), source.range());
    if range_p <= 0.0 || range_c <= 0.0 {
        log::warn!(
            "Skipping normalization of '{}' onto '{}': invalid range ({} / {})",
            comparison.id(),
            primary.id(),
            range_p,
            range_c
        );
        return comparison.clone();
    }

    let points = comparison
        .points()
        .iter()
        .map(|point| {
            let original = point.true_value();
            DataPoint {
                date: point.date,
                value: original.map(|v| (v - source.mean) / range_c * range_p + target.mean),
                original_value: original,
            }
        })
        .collect();

    let mut normalized = comparison.with_points(points);
    normalized.normalized = true;
    normalized
}

/// Undo a normalization, putting the original values back on display.
pub fn restore(series: &Series) -> Series {
    if !series.normalized {
        return series.clone();
    }

    let points = series
        .points()
        .iter()
        .map(|point| DataPoint::from_option(point.date, point.true_value()))
        .collect();

    let mut restored = series.with_points(points);
    restored.normalized = false;
    restored
}
