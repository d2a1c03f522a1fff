//! # Series Data
//!
//! Time-series model and transformation pipeline for overlaying economic and
//! financial series that differ in units, scale and sampling frequency.
//!
//! ## Pipeline
//!
//! Raw points from a fetch collaborator are stored in a [`SeriesStore`], then
//! flow through:
//!
//! 1. [`aggregate`] - average into weekly, monthly, quarterly or yearly buckets
//! 2. [`transform`] - compute the selected [`CalculationType`]
//! 3. [`normalize`] - rescale overlays onto the primary series' range
//! 4. [`merge_for_chart`] / [`write_csv`] - hand the result to the renderer or export it
//!
//! Every stage returns a new value; only the store is mutated, by the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use series_data::{aggregate, transform, CalculationType, Series, Timeframe};
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2023, m, d).unwrap();
//! let series = Series::from_pairs(
//!     "cpi",
//!     "Consumer prices",
//!     vec![(day(1, 10), Some(100.0)), (day(1, 20), Some(102.0)), (day(2, 10), Some(103.0))],
//! )?;
//!
//! let monthly = aggregate(&series, Timeframe::Monthly);
//! let points = transform(&monthly, CalculationType::PeriodToPeriod);
//! assert_eq!(points[1].change, Some(2.0));
//! # Ok::<(), series_data::SeriesError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod store;
pub mod timeframe;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::aggregate;
pub use crate::config::{ConfigError, EngineConfig};
pub use crate::error::{Result, SeriesError};
pub use crate::export::{write_csv, write_csv_file};
pub use crate::fetch::{FetchError, RawPoint, RequestSequence, RequestToken};
pub use crate::merge::{merge_for_chart, ChartRow};
pub use crate::model::{DataPoint, Series, SeriesId, YAxis};
pub use crate::normalize::normalize;
pub use crate::store::SeriesStore;
pub use crate::timeframe::{Timeframe, TimeframeBucketKey};
pub use crate::transform::{transform, CalculationType, TransformedPoint};
