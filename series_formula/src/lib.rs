//! # Series Formula
//!
//! A small formula language for deriving new series from the active ones.
//! Active series are bound positionally to the letters `A`, `B`, ... and can
//! be combined with arithmetic, math functions and technical indicators:
//!
//! ```text
//! (A - B) / B * 100
//! DIVIDE(A, SMA(B, 12))
//! RSI(A)
//! STDEV(ROC(A, 1), 12)
//! ```
//!
//! Text is tokenized by [`lexer`], parsed by a recursive-descent [`parser`],
//! checked by the [`validator`] against a closed [`functions`] registry and
//! evaluated by walking the tree in [`evaluator`]. No code is generated.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use series_data::config::FormulaConfig;
//! use series_data::utils::series_from_values;
//! use series_formula::{evaluate, Formula, VariableBinding};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let a = series_from_values("cpi", start, 30, &[100.0, 110.0, 121.0]).unwrap();
//!
//! let binding = VariableBinding::positional(vec![a.id().clone()])?;
//! let formula = Formula::new("ROC(A, 1)", binding)?;
//!
//! let series = BTreeMap::from([('A', &a)]);
//! let points = evaluate(&formula, &series, &FormulaConfig::default())?;
//! assert_eq!(points[0].value, None);
//! assert!((points[2].value.unwrap() - 10.0).abs() < 1e-9);
//! # Ok::<(), series_formula::FormulaError>(())
//! ```

pub mod ast;
pub mod binding;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod validator;

// Re-export commonly used types
pub use crate::ast::Expr;
pub use crate::binding::VariableBinding;
pub use crate::error::{EvalError, FormulaError, Result};
pub use crate::evaluator::{evaluate, evaluate_bound};
pub use crate::functions::Function;
pub use crate::parser::{parse, DEFAULT_MAX_DEPTH};
pub use crate::validator::{validate, Formula};
