//! Error types for formula validation and evaluation

use series_math::MathError;
use thiserror::Error;

/// Errors that reject a formula before any series is created
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Invalid formula syntax at position {position}: {message}")]
    InvalidFormulaSyntax { position: usize, message: String },

    #[error("Unknown variable(s) {}: valid variables are {valid}", .names.join(", "))]
    UnknownVariableReference { names: Vec<String>, valid: String },

    #[error("Unknown function(s): {}", .names.join(", "))]
    UnknownFunctionReference { names: Vec<String> },

    #[error("Invalid arguments for {function}: expected {expected}, got {got}")]
    InvalidFunctionArguments {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("Formula binds no series")]
    EmptyBinding,
}

impl FormulaError {
    /// Shorthand for a syntax error
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        FormulaError::InvalidFormulaSyntax {
            position,
            message: message.into(),
        }
    }
}

/// Failure while evaluating a formula at a single index.
///
/// These never escape the evaluator; the affected point becomes missing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Variable {0} is not bound")]
    UnboundVariable(char),

    #[error("{0} is missing an argument")]
    MissingArgument(&'static str),

    #[error("Invalid period {0}: must be at least 1")]
    InvalidPeriod(f64),

    #[error("Non-finite result {0}")]
    NonFinite(f64),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Result type for formula operations
pub type Result<T> = std::result::Result<T, FormulaError>;
