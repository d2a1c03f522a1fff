//! Change and rate transforms
//!
//! A calculation type turns each point of a series into a displayed value plus
//! a `change` against a reference point. Period-to-period types always compare
//! against the previous point. Offset-based types (day, week, quarter, year)
//! compare against the previous point when it is at least one calendar unit
//! away, and otherwise against the first point in the series that is.

use crate::error::SeriesError;
use crate::model::{DataPoint, Series};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transform applied to a series for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationType {
    #[default]
    Value,
    PeriodToPeriod,
    PeriodToPeriodPercent,
    DayToDay,
    DayToDayPercent,
    WeekToWeek,
    WeekToWeekPercent,
    QuarterToQuarter,
    QuarterToQuarterPercent,
    YearToYear,
    YearToYearPercent,
}

/// Calendar unit used by offset-based calculation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetUnit {
    Day,
    Week,
    Quarter,
    Year,
}

impl CalculationType {
    /// Returns all calculation types.
    pub fn all() -> &'static [CalculationType] {
        use CalculationType::*;
        &[
            Value,
            PeriodToPeriod,
            PeriodToPeriodPercent,
            DayToDay,
            DayToDayPercent,
            WeekToWeek,
            WeekToWeekPercent,
            QuarterToQuarter,
            QuarterToQuarterPercent,
            YearToYear,
            YearToYearPercent,
        ]
    }

    /// Returns the kebab-case name used in configuration and payloads.
    pub fn as_str(&self) -> &'static str {
        use CalculationType::*;
        match self {
            Value => "value",
            PeriodToPeriod => "period-to-period",
            PeriodToPeriodPercent => "period-to-period-percent",
            DayToDay => "day-to-day",
            DayToDayPercent => "day-to-day-percent",
            WeekToWeek => "week-to-week",
            WeekToWeekPercent => "week-to-week-percent",
            QuarterToQuarter => "quarter-to-quarter",
            QuarterToQuarterPercent => "quarter-to-quarter-percent",
            YearToYear => "year-to-year",
            YearToYearPercent => "year-to-year-percent",
        }
    }

    /// Human readable name for legends and menus
    pub fn label(&self) -> &'static str {
        use CalculationType::*;
        match self {
            Value => "Value",
            PeriodToPeriod => "Period-to-Period",
            PeriodToPeriodPercent => "Period-to-Period %",
            DayToDay => "Day-to-Day",
            DayToDayPercent => "Day-to-Day %",
            WeekToWeek => "Week-to-Week",
            WeekToWeekPercent => "Week-to-Week %",
            QuarterToQuarter => "Quarter-to-Quarter",
            QuarterToQuarterPercent => "Quarter-to-Quarter %",
            YearToYear => "Year-to-Year",
            YearToYearPercent => "Year-to-Year %",
        }
    }

    /// Whether the change is expressed in percent of the reference
    pub fn is_percent(&self) -> bool {
        use CalculationType::*;
        matches!(
            self,
            PeriodToPeriodPercent
                | DayToDayPercent
                | WeekToWeekPercent
                | QuarterToQuarterPercent
                | YearToYearPercent
        )
    }

    /// Whether this type computes a change rather than passing values through
    pub fn is_change(&self) -> bool {
        *self != CalculationType::Value
    }

    /// Calendar unit for offset-based types
    pub fn offset_unit(&self) -> Option<OffsetUnit> {
        use CalculationType::*;
        match self {
            DayToDay | DayToDayPercent => Some(OffsetUnit::Day),
            WeekToWeek | WeekToWeekPercent => Some(OffsetUnit::Week),
            QuarterToQuarter | QuarterToQuarterPercent => Some(OffsetUnit::Quarter),
            YearToYear | YearToYearPercent => Some(OffsetUnit::Year),
            Value | PeriodToPeriod | PeriodToPeriodPercent => None,
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationType {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CalculationType::all()
            .iter()
            .copied()
            .find(|calc| calc.as_str() == wanted)
            .ok_or_else(|| SeriesError::InvalidInput(format!("Unsupported calculation type: {}", s)))
    }
}

/// A point as displayed after a transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub change: Option<f64>,
}

/// Whole calendar units elapsed from `from` to `to`.
///
/// Weeks are whole 7-day spans; quarters and years count whole calendar
/// months, so 2023-01-31 to 2023-04-30 is one quarter.
pub fn calendar_offset(from: NaiveDate, to: NaiveDate, unit: OffsetUnit) -> i64 {
    match unit {
        OffsetUnit::Day => (to - from).num_days(),
        OffsetUnit::Week => (to - from).num_days() / 7,
        OffsetUnit::Quarter => whole_months(from, to) / 3,
        OffsetUnit::Year => whole_months(from, to) / 12,
    }
}

fn whole_months(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -whole_months(to, from);
    }

    let months = (to.year() - from.year()) as i64 * 12 + to.month() as i64 - from.month() as i64;
    if months <= 0 {
        return 0;
    }

    match u32::try_from(months)
        .ok()
        .and_then(|m| from.checked_add_months(Months::new(m)))
    {
        Some(shifted) if shifted <= to => months,
        _ => months - 1,
    }
}

/// Apply `calc` to every point of `series`.
///
/// The first point has no reference, so its change is `0` for every change
/// type. Percent changes against a zero reference are `0`. A missing value at
/// the point or at its reference gives a missing change.
pub fn transform(series: &Series, calc: CalculationType) -> Vec<TransformedPoint> {
    let points = series.points();

    points
        .iter()
        .enumerate()
        .map(|(i, point)| TransformedPoint {
            date: point.date,
            value: point.value,
            change: change_at(points, i, calc),
        })
        .collect()
}

fn change_at(points: &[DataPoint], i: usize, calc: CalculationType) -> Option<f64> {
    let current = points[i].value;

    if calc == CalculationType::Value {
        return current;
    }
    if i == 0 {
        return Some(0.0);
    }

    let reference = match calc.offset_unit() {
        None => i - 1,
        Some(unit) => match reference_index(points, i, unit) {
            Some(idx) => idx,
            None => return Some(0.0),
        },
    };

    compare(current, points[reference].value, calc.is_percent())
}

/// Index of the point `i` is compared against for an offset-based type
fn reference_index(points: &[DataPoint], i: usize, unit: OffsetUnit) -> Option<usize> {
    let date = points[i].date;
    if calendar_offset(points[i - 1].date, date, unit) >= 1 {
        return Some(i - 1);
    }

    points[..i]
        .iter()
        .position(|p| calendar_offset(p.date, date, unit) >= 1)
}

fn compare(current: Option<f64>, reference: Option<f64>, percent: bool) -> Option<f64> {
    let (current, reference) = (current?, reference?);
    if !percent {
        return Some(current - reference);
    }
    if reference == 0.0 {
        return Some(0.0);
    }
    Some((current - reference) / reference * 100.0)
}
