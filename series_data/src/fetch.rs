//! Contract with the fetch collaborators
//!
//! Providers deliver `[{ "date": "YYYY-MM-DD", "value": number | null }]`.
//! Fetches run asynchronously outside the engine, so every refetch is tagged
//! with a [`RequestToken`] and only the most recently issued token may be
//! applied.

use crate::error::{Result, SeriesError};
use crate::model::DataPoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a fetch collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Network fetch failed for '{dataset}': {message}")]
    NetworkFetchFailure { dataset: String, message: String },
}

impl FetchError {
    /// Shorthand for a network failure
    pub fn network(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::NetworkFetchFailure {
            dataset: dataset.into(),
            message: message.into(),
        }
    }
}

/// A point as delivered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub date: String,
    pub value: Option<f64>,
}

impl RawPoint {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Parse an ISO-8601 calendar day (`YYYY-MM-DD`).
///
/// A trailing time component (`2024-01-31T00:00:00`) is accepted and dropped.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let day = s.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| SeriesError::InvalidDate(s.to_string()))
}

/// Decode a provider payload
pub fn parse_raw_points(json: &str) -> Result<Vec<RawPoint>> {
    Ok(serde_json::from_str(json)?)
}

/// Convert provider points into data points
pub fn into_points(raw: &[RawPoint]) -> Result<Vec<DataPoint>> {
    raw.iter()
        .map(|point| Ok(DataPoint::from_option(parse_date(&point.date)?, point.value)))
        .collect()
}

/// Tag of one issued refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of request tokens
#[derive(Debug, Default, Clone)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token; every earlier token becomes stale
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Most recently issued token
    pub fn latest(&self) -> Option<RequestToken> {
        (self.latest > 0).then_some(RequestToken(self.latest))
    }

    /// Whether a response tagged with `token` may still be applied
    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}
