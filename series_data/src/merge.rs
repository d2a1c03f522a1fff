//! Merged rows handed to the chart renderer
//!
//! One row per date of the primary series. Secondary series contribute
//! `<id>` (true value), `<id>_normalized` and `<id>_change` fields.

use crate::model::Series;
use crate::normalize::{normalize, restore};
use crate::transform::{transform, CalculationType, TransformedPoint};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Suffix of the rescaled value field of a secondary series
pub const NORMALIZED_SUFFIX: &str = "_normalized";
/// Suffix of the change field of a secondary series
pub const CHANGE_SUFFIX: &str = "_change";

/// A merged point keyed by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub change: Option<f64>,
    /// Per-secondary fields, keyed by `<id>`, `<id>_normalized`, `<id>_change`
    #[serde(flatten)]
    pub secondary: BTreeMap<String, Option<f64>>,
}

impl ChartRow {
    /// Look up a secondary field; `None` when the field is absent or missing
    pub fn get(&self, key: &str) -> Option<f64> {
        self.secondary.get(key).copied().flatten()
    }
}

fn change_on(points: &[TransformedPoint], date: NaiveDate) -> Option<f64> {
    points
        .binary_search_by_key(&date, |p| p.date)
        .ok()
        .and_then(|idx| points[idx].change)
}

/// Merge `primary` and `secondaries` into chart rows.
///
/// The calculation type is applied to every series. With `normalize_overlays`
/// each secondary is also rescaled onto the primary's range; series that cannot
/// be normalized (flat, single point) get no `_normalized` field.
pub fn merge_for_chart(
    primary: &Series,
    secondaries: &[&Series],
    calc: CalculationType,
    normalize_overlays: bool,
) -> Vec<ChartRow> {
    struct Overlay<'a> {
        key: String,
        series: &'a Series,
        normalized: Option<Series>,
        transformed: Vec<TransformedPoint>,
    }

    let overlays: Vec<Overlay<'_>> = secondaries
        .iter()
        .map(|series| {
            let normalized = if normalize_overlays {
                Some(normalize(primary, series)).filter(|s| s.normalized)
            } else {
                None
            };
            Overlay {
                key: series.id().to_string(),
                series,
                normalized,
                transformed: if calc.is_change() {
                    transform(&restore(series), calc)
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    transform(primary, calc)
        .into_iter()
        .map(|point| {
            let mut secondary = BTreeMap::new();
            for overlay in &overlays {
                let true_value = overlay
                    .series
                    .point_at(point.date)
                    .and_then(|p| p.true_value());
                secondary.insert(overlay.key.clone(), true_value);

                if let Some(normalized) = &overlay.normalized {
                    let value = normalized.point_at(point.date).and_then(|p| p.value);
                    secondary.insert(format!("{}{}", overlay.key, NORMALIZED_SUFFIX), value);
                }

                if calc.is_change() {
                    secondary.insert(
                        format!("{}{}", overlay.key, CHANGE_SUFFIX),
                        change_on(&overlay.transformed, point.date),
                    );
                }
            }

            ChartRow {
                date: point.date,
                value: point.value,
                change: point.change,
                secondary,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn primary() -> Series {
        Series::from_pairs(
            "gdp",
            "GDP",
            vec![(day(1), Some(0.0)), (day(2), Some(100.0)), (day(3), Some(50.0))],
        )
        .unwrap()
    }

    fn overlay() -> Series {
        Series::from_pairs("cpi", "CPI", vec![(day(1), Some(10.0)), (day(3), Some(30.0))]).unwrap()
    }

    #[test]
    fn test_rows_follow_primary_dates() {
        let rows = merge_for_chart(&primary(), &[&overlay()], CalculationType::Value, false);
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(rows[1].get("cpi"), None);
        assert_eq!(rows[2].get("cpi"), Some(30.0));
        assert!(!rows[0].secondary.contains_key("cpi_normalized"));
        assert!(!rows[0].secondary.contains_key("cpi_change"));
    }

    #[test]
    fn test_normalized_and_change_fields() {
        let rows = merge_for_chart(
            &primary(),
            &[&overlay()],
            CalculationType::PeriodToPeriod,
            true,
        );
        assert_eq!(rows[0].get("cpi_normalized"), Some(0.0));
        assert_eq!(rows[2].get("cpi_normalized"), Some(100.0));
        assert_eq!(rows[0].get("cpi_change"), Some(0.0));
        assert_eq!(rows[2].get("cpi_change"), Some(20.0));
        assert_eq!(rows[2].change, Some(-50.0));
    }

    #[test]
    fn test_row_serializes_flat() {
        let rows = merge_for_chart(&primary(), &[&overlay()], CalculationType::Value, false);
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2023-01-01",
                "value": 0.0,
                "change": 0.0,
                "cpi": 10.0
            })
        );
    }
}
