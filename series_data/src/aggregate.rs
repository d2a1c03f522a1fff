//! Aggregation of series into coarser calendar buckets
//!
//! Each bucket is represented by the date of its last observation, so an
//! aggregated point always sits on a date that was actually observed.

use crate::model::{DataPoint, Series};
use crate::timeframe::{bucket_key, Timeframe, TimeframeBucketKey};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Bucket {
    last_date: Option<NaiveDate>,
    sum: f64,
    count: usize,
}

impl Bucket {
    fn push(&mut self, point: &DataPoint) {
        self.last_date = Some(match self.last_date {
            Some(date) => date.max(point.date),
            None => point.date,
        });

        if let Some(value) = point.true_value() {
            self.sum += value;
            self.count += 1;
        }
    }

    fn into_point(self) -> Option<DataPoint> {
        let date = self.last_date?;
        if self.count == 0 {
            return Some(DataPoint::missing(date));
        }
        Some(DataPoint::new(date, self.sum / self.count as f64))
    }
}

/// Average the points of `series` into `timeframe` buckets.
///
/// Missing observations are left out of the mean; a bucket with no observed
/// value becomes a missing point. `Daily` returns the series unchanged.
pub fn aggregate(series: &Series, timeframe: Timeframe) -> Series {
    if timeframe == Timeframe::Daily {
        return series.clone();
    }

    let mut buckets: BTreeMap<TimeframeBucketKey, Bucket> = BTreeMap::new();
    for point in series.points() {
        if let Some(key) = bucket_key(point.date, timeframe) {
            buckets.entry(key).or_default().push(point);
        }
    }

    let mut points: Vec<DataPoint> = buckets.into_values().filter_map(Bucket::into_point).collect();
    points.sort_by_key(|p| p.date);

    log::debug!(
        "Aggregated series '{}' from {} to {} points ({})",
        series.id(),
        series.len(),
        points.len(),
        timeframe
    );

    let mut aggregated = series.with_points(points);
    aggregated.normalized = false;
    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(values: &[(NaiveDate, Option<f64>)]) -> Series {
        Series::from_pairs("s", "S", values.iter().copied()).unwrap()
    }

    #[test]
    fn test_monthly_mean_and_last_date() {
        let series = daily(&[
            (day(2023, 1, 3), Some(10.0)),
            (day(2023, 1, 17), Some(20.0)),
            (day(2023, 1, 30), Some(30.0)),
            (day(2023, 2, 1), Some(5.0)),
        ]);

        let monthly = aggregate(&series, Timeframe::Monthly);
        let points = monthly.points();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, day(2023, 1, 30));
        assert_eq!(points[0].value, Some(20.0));
        assert_eq!(points[1].date, day(2023, 2, 1));
        assert_eq!(points[1].value, Some(5.0));
    }

    #[test]
    fn test_missing_values_excluded_from_mean() {
        let series = daily(&[
            (day(2023, 1, 2), Some(4.0)),
            (day(2023, 1, 3), None),
            (day(2023, 1, 4), Some(8.0)),
        ]);

        let weekly = aggregate(&series, Timeframe::Weekly);
        assert_eq!(weekly.points()[0].value, Some(6.0));
        assert_eq!(weekly.points()[0].date, day(2023, 1, 4));
    }

    #[test]
    fn test_all_missing_bucket_is_missing() {
        let series = daily(&[
            (day(2023, 1, 2), None),
            (day(2023, 1, 3), None),
            (day(2023, 4, 3), Some(1.0)),
        ]);

        let quarterly = aggregate(&series, Timeframe::Quarterly);
        assert_eq!(quarterly.len(), 2);
        assert!(quarterly.points()[0].is_missing());
        assert_eq!(quarterly.points()[0].date, day(2023, 1, 3));
    }

    #[test]
    fn test_daily_is_passthrough() {
        let series = daily(&[(day(2023, 1, 2), Some(1.0)), (day(2023, 1, 3), Some(2.0))]);
        assert_eq!(aggregate(&series, Timeframe::Daily), series);
    }
}
