//! Series data model
//!
//! A [`Series`] owns its points and guarantees that they are strictly
//! ascending by date with no two points sharing a date. The points are only
//! reachable through a slice accessor, and every constructor or replacement
//! goes through the same ordering check.

use crate::error::{Result, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a series inside a store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    /// Create a new identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SeriesId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single observation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Observed (or displayed, when normalized) value; `None` when missing
    pub value: Option<f64>,
    /// Value before normalization, only set on normalized series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<f64>,
}

impl DataPoint {
    /// Create an observation; a NaN value is recorded as missing
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self::from_option(date, Some(value))
    }

    /// Create a missing observation
    pub fn missing(date: NaiveDate) -> Self {
        Self {
            date,
            value: None,
            original_value: None,
        }
    }

    /// Create an observation from an optional value, folding NaN into `None`
    pub fn from_option(date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            date,
            value: value.filter(|v| !v.is_nan()),
            original_value: None,
        }
    }

    /// The pre-normalization value of this point
    pub fn true_value(&self) -> Option<f64> {
        self.original_value.or(self.value)
    }

    /// Whether the observation is missing
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Y axis a series is drawn against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    #[default]
    Left,
    Right,
}

/// Colour used when a series is created without one
pub const DEFAULT_COLOR: &str = "#1f77b4";

/// A named, date-ordered sequence of observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    id: SeriesId,
    /// Display name
    pub name: String,
    points: Vec<DataPoint>,
    /// Hex colour (`#RRGGBB`)
    pub color: String,
    /// Whether the series is currently shown
    pub visible: bool,
    /// Axis assignment
    pub y_axis: YAxis,
    /// Expression the series was derived from, for formula series
    pub source_formula: Option<String>,
    /// Whether values have been rescaled onto another series' range
    pub normalized: bool,
}

impl Series {
    /// Create a new series, sorting points by date and rejecting duplicate dates
    pub fn new(id: impl Into<SeriesId>, name: impl Into<String>, points: Vec<DataPoint>) -> Result<Self> {
        let id = id.into();
        let points = ordered_points(&id, points)?;

        Ok(Self {
            id,
            name: name.into(),
            points,
            color: DEFAULT_COLOR.to_string(),
            visible: true,
            y_axis: YAxis::Left,
            source_formula: None,
            normalized: false,
        })
    }

    /// Create a series from `(date, value)` pairs
    pub fn from_pairs<I>(id: impl Into<SeriesId>, name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let points = pairs
            .into_iter()
            .map(|(date, value)| DataPoint::from_option(date, value))
            .collect();
        Self::new(id, name, points)
    }

    /// Set the display colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the axis assignment
    pub fn with_y_axis(mut self, y_axis: YAxis) -> Self {
        self.y_axis = y_axis;
        self
    }

    /// Record the formula this series was computed from
    pub fn with_source_formula(mut self, formula: impl Into<String>) -> Self {
        self.source_formula = Some(formula.into());
        self
    }

    /// Get the identifier
    pub fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Get the points, ascending by date
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Replace all points, keeping the ordering invariant
    pub fn replace_points(&mut self, points: Vec<DataPoint>) -> Result<()> {
        self.points = ordered_points(&self.id, points)?;
        Ok(())
    }

    /// Copy of this series' metadata with a new set of points.
    ///
    /// Callers must hand in points that are already strictly ascending.
    pub(crate) fn with_points(&self, points: Vec<DataPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            points,
            color: self.color.clone(),
            visible: self.visible,
            y_axis: self.y_axis,
            source_formula: self.source_formula.clone(),
            normalized: self.normalized,
        }
    }

    /// Check the ordering invariant
    pub fn check_order(&self) -> Result<()> {
        match self.points.windows(2).find(|w| w[0].date >= w[1].date) {
            Some(pair) => Err(SeriesError::DuplicateDate {
                series: self.id.to_string(),
                date: pair[1].date,
            }),
            None => Ok(()),
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Date of the first point
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Date of the last point
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Point observed on `date`, if any
    pub fn point_at(&self, date: NaiveDate) -> Option<&DataPoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// Displayed values with missing observations as NaN
    pub fn values(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.value.unwrap_or(f64::NAN))
            .collect()
    }

    /// Pre-normalization values with missing observations as NaN
    pub fn true_values(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.true_value().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Sort points by date and reject duplicates
fn ordered_points(id: &SeriesId, mut points: Vec<DataPoint>) -> Result<Vec<DataPoint>> {
    points.sort_by_key(|p| p.date);

    if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(SeriesError::DuplicateDate {
            series: id.to_string(),
            date: pair[0].date,
        });
    }

    Ok(points)
}
