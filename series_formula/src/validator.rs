//! Formula validation
//!
//! Checks run in a fixed order and the first failing check rejects the whole
//! formula: syntax, variable references, function names, argument counts.

use crate::ast::Expr;
use crate::binding::{index_of, valid_range, VariableBinding};
use crate::error::{FormulaError, Result};
use crate::functions::Function;
use crate::parser::{parse, DEFAULT_MAX_DEPTH};

/// Validate `text` against `series_count` active series
pub fn validate(text: &str, series_count: usize) -> Result<Expr> {
    validate_with_depth(text, series_count, DEFAULT_MAX_DEPTH)
}

/// Validate with an explicit nesting limit
pub fn validate_with_depth(text: &str, series_count: usize, max_depth: usize) -> Result<Expr> {
    let expr = parse(text, max_depth)?;
    check_variables(&expr, series_count)?;
    check_functions(&expr)?;
    check_arguments(&expr)?;
    Ok(expr)
}

fn is_bound(name: &str, series_count: usize) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => index_of(letter).map_or(false, |idx| idx < series_count),
        _ => false,
    }
}

fn check_variables(expr: &Expr, series_count: usize) -> Result<()> {
    let unknown: Vec<String> = expr
        .variables()
        .into_iter()
        .filter(|name| !is_bound(name, series_count))
        .map(str::to_string)
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }
    Err(FormulaError::UnknownVariableReference {
        names: unknown,
        valid: valid_range(series_count),
    })
}

fn check_functions(expr: &Expr) -> Result<()> {
    let mut unknown: Vec<String> = Vec::new();
    expr.visit(&mut |node| {
        if let Expr::Call { name, .. } = node {
            if Function::from_name(name).is_none() && !unknown.contains(name) {
                unknown.push(name.clone());
            }
        }
    });

    if unknown.is_empty() {
        return Ok(());
    }
    Err(FormulaError::UnknownFunctionReference { names: unknown })
}

fn check_arguments(expr: &Expr) -> Result<()> {
    let mut failure = None;
    expr.visit(&mut |node| {
        if failure.is_some() {
            return;
        }
        if let Expr::Call { name, args, .. } = node {
            if let Some(function) = Function::from_name(name) {
                if !function.accepts(args.len()) {
                    failure = Some(FormulaError::InvalidFunctionArguments {
                        function: function.name().to_string(),
                        expected: function.arity_description(),
                        got: args.len(),
                    });
                }
            }
        }
    });

    failure.map_or(Ok(()), Err)
}

/// A validated formula together with the series its letters are bound to
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expression_text: String,
    expr: Expr,
    binding: VariableBinding,
}

impl Formula {
    /// Validate `text` against `binding` and capture both
    pub fn new(text: impl Into<String>, binding: VariableBinding) -> Result<Self> {
        Self::with_max_depth(text, binding, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(
        text: impl Into<String>,
        binding: VariableBinding,
        max_depth: usize,
    ) -> Result<Self> {
        let expression_text = text.into();
        let expr = validate_with_depth(&expression_text, binding.len(), max_depth)?;
        Ok(Self {
            expression_text,
            expr,
            binding,
        })
    }

    pub fn expression_text(&self) -> &str {
        &self.expression_text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn binding(&self) -> &VariableBinding {
        &self.binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_formulas() {
        assert!(validate("A + B", 2).is_ok());
        assert!(validate("-(A) ^ 2 / 1e3", 1).is_ok());
        assert!(validate("RSI(A)", 1).is_ok());
        assert!(validate("average(A, B * 2, 3)", 2).is_ok());
        assert!(validate("ROUND(SQRT(ABS(A)), 2)", 1).is_ok());
    }

    #[test]
    fn test_unknown_variable_lists_names_and_range() {
        match validate("A + C + foo", 2) {
            Err(FormulaError::UnknownVariableReference { names, valid }) => {
                assert_eq!(names, vec!["C".to_string(), "foo".to_string()]);
                assert_eq!(valid, "\"A\" through \"B\"");
            }
            other => panic!("Expected UnknownVariableReference, got {:?}", other),
        }
    }

    #[test]
    fn test_no_active_series() {
        match validate("A * 2", 0) {
            Err(FormulaError::UnknownVariableReference { valid, .. }) => {
                assert!(valid.contains("no series are active"));
            }
            other => panic!("Expected UnknownVariableReference, got {:?}", other),
        }
        assert!(validate("1 + 2", 0).is_ok());
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            validate("MEDIAN(A) + foo(B) + median(A)", 2),
            Err(FormulaError::UnknownFunctionReference {
                names: vec!["MEDIAN".to_string(), "foo".to_string(), "median".to_string()],
            })
        );
    }

    #[test]
    fn test_variables_are_checked_before_functions() {
        assert!(matches!(
            validate("MEDIAN(Q)", 1),
            Err(FormulaError::UnknownVariableReference { .. })
        ));
    }

    #[test]
    fn test_argument_counts() {
        assert_eq!(
            validate("SMA(A)", 1),
            Err(FormulaError::InvalidFunctionArguments {
                function: "SMA".to_string(),
                expected: "2 argument(s)".to_string(),
                got: 1,
            })
        );
        assert!(matches!(
            validate("ADD()", 1),
            Err(FormulaError::InvalidFunctionArguments { got: 0, .. })
        ));
    }

    #[test]
    fn test_formula_captures_text() {
        let binding = VariableBinding::positional(vec!["x".into(), "y".into()]).unwrap();
        let formula = Formula::new("RATIO(A, B)", binding).unwrap();
        assert_eq!(formula.expression_text(), "RATIO(A, B)");
        assert_eq!(formula.binding().len(), 2);

        let binding = VariableBinding::positional(vec!["x".into()]).unwrap();
        assert!(Formula::new("RATIO(A, B)", binding).is_err());
    }
}
