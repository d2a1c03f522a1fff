//! # Macro Lens
//!
//! `macro_lens` overlays economic and financial time series that differ in
//! units, scale and sampling frequency. A [`Workspace`] holds the active
//! series; each one is aggregated to the chosen [`Timeframe`], shown under a
//! [`CalculationType`], optionally rescaled onto the primary series and
//! combined with others through formulas.
//!
//! ## Example
//!
//! ```
//! use macro_lens::{CalculationType, DataPoint, NaiveDate, Workspace};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let mut workspace = Workspace::default();
//!
//! workspace.add_series("Payrolls", vec![DataPoint::new(day(1), 100.0), DataPoint::new(day(2), 110.0)])?;
//! workspace.add_series("Claims", vec![DataPoint::new(day(1), 50.0), DataPoint::new(day(2), 55.0)])?;
//! let ratio = workspace.create_formula("DIVIDE(A, B)")?;
//!
//! assert_eq!(workspace.series(&ratio).unwrap().points()[1].value, Some(2.0));
//!
//! workspace.set_calculation_type(CalculationType::PeriodToPeriodPercent);
//! let rows = workspace.chart_rows();
//! assert_eq!(rows.len(), 2);
//! # Ok::<(), macro_lens::LensError>(())
//! ```
//!
//! ## Components
//!
//! - [`series_data`]: data model, store, aggregation, transforms, normalization, export
//! - [`series_formula`]: formula parsing, validation and evaluation
//! - [`series_math`]: window statistics and indicators

pub mod error;
pub mod workspace;

pub use chrono::NaiveDate;
pub use series_data::{
    self, CalculationType, ChartRow, DataPoint, EngineConfig, FetchError, RawPoint, RequestToken,
    Series, SeriesError, SeriesId, Timeframe, YAxis,
};
pub use series_formula::{self, FormulaError};
pub use series_math;

pub use crate::error::{LensError, Result};
pub use crate::workspace::{RefetchOutcome, RefetchResponse, Workspace};

/// Version of the macro_lens crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
