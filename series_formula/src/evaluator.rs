//! Formula evaluation over aligned series
//!
//! Bound series are aligned onto the dates of a reference series (the one
//! that starts earliest). The expression is then evaluated once per
//! reference date. The source argument of each indicator is computed once
//! over every date before evaluation starts, so nested indicators stay
//! linear in the series length.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::binding::valid_range;
use crate::error::{EvalError, FormulaError, Result};
use crate::functions::{Function, FunctionKind};
use crate::validator::Formula;
use chrono::NaiveDate;
use series_data::config::FormulaConfig;
use series_data::{DataPoint, Series};
use series_math::{ema, population_std_dev, roc, rsi, sma, trailing_range};
use std::collections::BTreeMap;

/// Expression with functions and variables resolved
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Const(f64),
    Column(char),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
    /// Precomputed indicator source
    Derived(usize),
}

fn lower(expr: &Expr, bound: usize) -> Result<Node> {
    Ok(match expr {
        Expr::Number(n) => Node::Const(*n),
        Expr::Variable { name, .. } => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_ascii_uppercase() => Node::Column(letter),
                _ => {
                    return Err(FormulaError::UnknownVariableReference {
                        names: vec![name.clone()],
                        valid: valid_range(bound),
                    })
                }
            }
        }
        Expr::Unary { op, operand } => Node::Unary(*op, Box::new(lower(operand, bound)?)),
        Expr::Binary { op, left, right } => Node::Binary(
            *op,
            Box::new(lower(left, bound)?),
            Box::new(lower(right, bound)?),
        ),
        Expr::Call { name, args, .. } => {
            let function = Function::from_name(name).ok_or_else(|| {
                FormulaError::UnknownFunctionReference {
                    names: vec![name.clone()],
                }
            })?;
            let args = args
                .iter()
                .map(|arg| lower(arg, bound))
                .collect::<Result<Vec<_>>>()?;
            Node::Call(function, args)
        }
    })
}

/// Series whose dates the result follows: among the series the expression
/// references, the one with the earliest first date, ties to the lowest
/// letter. An expression without references follows every bound series.
fn reference_series<'a>(
    series_by_letter: &BTreeMap<char, &'a Series>,
    referenced: &[char],
) -> Option<&'a Series> {
    let used = series_by_letter
        .iter()
        .filter(|(letter, _)| referenced.contains(*letter))
        .map(|(_, series)| *series);
    earliest(used).or_else(|| earliest(series_by_letter.values().copied()))
}

fn earliest<'a>(candidates: impl Iterator<Item = &'a Series>) -> Option<&'a Series> {
    candidates
        .filter_map(|series| series.first_date().map(|first| (first, series)))
        .min_by_key(|(first, _)| *first)
        .map(|(_, series)| series)
}

fn referenced_letters(node: &Node, letters: &mut Vec<char>) {
    match node {
        Node::Column(letter) => {
            if !letters.contains(letter) {
                letters.push(*letter);
            }
        }
        Node::Unary(_, operand) => referenced_letters(operand, letters),
        Node::Binary(_, left, right) => {
            referenced_letters(left, letters);
            referenced_letters(right, letters);
        }
        Node::Call(_, args) => args.iter().for_each(|arg| referenced_letters(arg, letters)),
        Node::Const(_) | Node::Derived(_) => {}
    }
}

/// True values of `series` on each of `dates`, NaN where absent or missing
fn align(series: &Series, dates: &[NaiveDate]) -> Vec<f64> {
    dates
        .iter()
        .map(|date| {
            series
                .point_at(*date)
                .and_then(|p| p.true_value())
                .unwrap_or(f64::NAN)
        })
        .collect()
}

type Evaluated = std::result::Result<f64, EvalError>;

struct Frame<'a> {
    columns: &'a BTreeMap<char, Vec<f64>>,
    derived: Vec<Vec<Evaluated>>,
    len: usize,
    rsi_period: usize,
}

impl Frame<'_> {
    /// Replace every indicator source with a precomputed column, innermost
    /// first
    fn materialize(&mut self, node: Node) -> Node {
        match node {
            Node::Call(function, args) => {
                let mut args: Vec<Node> =
                    args.into_iter().map(|arg| self.materialize(arg)).collect();
                if function.kind() == FunctionKind::Indicator {
                    if let Some(source) = args.first_mut() {
                        if matches!(source, Node::Unary(..) | Node::Binary(..) | Node::Call(..)) {
                            let column: Vec<Evaluated> =
                                (0..self.len).map(|j| self.eval(source, j)).collect();
                            self.derived.push(column);
                            *source = Node::Derived(self.derived.len() - 1);
                        }
                    }
                }
                Node::Call(function, args)
            }
            Node::Unary(op, operand) => Node::Unary(op, Box::new(self.materialize(*operand))),
            Node::Binary(op, left, right) => Node::Binary(
                op,
                Box::new(self.materialize(*left)),
                Box::new(self.materialize(*right)),
            ),
            leaf => leaf,
        }
    }

    fn eval(&self, node: &Node, i: usize) -> Evaluated {
        match node {
            Node::Const(n) => Ok(*n),
            Node::Derived(slot) => self.derived[*slot][i].clone(),
            Node::Column(letter) => self
                .columns
                .get(letter)
                .map(|values| values[i])
                .ok_or(EvalError::UnboundVariable(*letter)),
            Node::Unary(op, operand) => {
                let value = self.eval(operand, i)?;
                Ok(match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Neg => -value,
                })
            }
            Node::Binary(op, left, right) => {
                let (a, b) = (self.eval(left, i)?, self.eval(right, i)?);
                Ok(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => divide(a, b),
                    BinaryOp::Pow => a.powf(b),
                })
            }
            Node::Call(function, args) => self.call(*function, args, i),
        }
    }

    fn scalars(&self, args: &[Node], i: usize) -> std::result::Result<Vec<f64>, EvalError> {
        args.iter().map(|arg| self.eval(arg, i)).collect()
    }

    fn window(
        &self,
        node: &Node,
        range: std::ops::Range<usize>,
    ) -> std::result::Result<Vec<f64>, EvalError> {
        range.map(|j| self.eval(node, j)).collect()
    }

    fn period(&self, node: &Node, i: usize) -> std::result::Result<usize, EvalError> {
        let value = self.eval(node, i)?;
        if !value.is_finite() || value.trunc() < 1.0 {
            return Err(EvalError::InvalidPeriod(value));
        }
        Ok(value.trunc() as usize)
    }

    fn call(&self, function: Function, args: &[Node], i: usize) -> std::result::Result<f64, EvalError> {
        use Function::*;

        if function.kind() == FunctionKind::Indicator {
            return self.indicator(function, args, i);
        }

        let values = self.scalars(args, i)?;
        let first = values.first().copied().unwrap_or(f64::NAN);

        Ok(match function {
            Abs => first.abs(),
            Sqrt => first.sqrt(),
            Pow => first.powf(values.get(1).copied().unwrap_or(f64::NAN)),
            Log => first.ln(),
            Log10 => first.log10(),
            Exp => first.exp(),
            Min => fold_strict(&values, f64::min),
            Max => fold_strict(&values, f64::max),
            Round => {
                let digits = values.get(1).copied().unwrap_or(0.0).trunc();
                let scale = 10f64.powf(digits);
                (first * scale).round() / scale
            }
            Floor => first.floor(),
            Ceil => first.ceil(),
            Sign => sign(first),
            Add => values.iter().sum(),
            Subtract => fold_strict(&values, |a, b| a - b),
            Multiply => values.iter().product(),
            Divide | Ratio => fold_strict(&values, divide),
            Average => series_math::stats::mean_ignoring_nan(&values),
            Sma | Ema | Roc | Rsi | Stdev => f64::NAN,
        })
    }

    fn indicator(
        &self,
        function: Function,
        args: &[Node],
        i: usize,
    ) -> std::result::Result<f64, EvalError> {
        let source = args
            .first()
            .ok_or(EvalError::MissingArgument(function.name()))?;
        let period = match args.get(1) {
            Some(node) => self.period(node, i)?,
            None if function == Function::Rsi => self.rsi_period,
            None => return Err(EvalError::MissingArgument(function.name())),
        };

        match function {
            Function::Sma => Ok(sma(&self.window(source, trailing_range(i, period))?)?),
            Function::Ema => Ok(ema(
                &self.window(source, trailing_range(i, period.saturating_add(1)))?,
                period,
            )?),
            Function::Rsi => Ok(rsi(
                &self.window(source, trailing_range(i, period.saturating_add(1)))?,
            )?),
            Function::Stdev => Ok(population_std_dev(
                &self.window(source, trailing_range(i, period))?,
            )?),
            Function::Roc => {
                if i < period {
                    return Ok(f64::NAN);
                }
                Ok(roc(self.eval(source, i)?, self.eval(source, i - period)?))
            }
            _ => Ok(f64::NAN),
        }
    }
}

fn divide(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        f64::NAN
    } else {
        a / b
    }
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        // 0 stays 0, NaN stays NaN
        value
    }
}

/// Left fold that yields NaN as soon as any member is NaN
fn fold_strict(values: &[f64], op: impl Fn(f64, f64) -> f64) -> f64 {
    let Some((first, rest)) = values.split_first() else {
        return f64::NAN;
    };
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    rest.iter().fold(*first, |acc, v| op(acc, *v))
}

/// Evaluate `formula` over the series bound to its letters.
///
/// Returns one point per date of the reference series: the referenced series
/// with the earliest first date. Other series are matched by exact date and
/// are missing where they have no observation. A point whose value cannot be
/// computed, or is not finite, is missing; the rest of the series is
/// unaffected.
pub fn evaluate(
    formula: &Formula,
    series_by_letter: &BTreeMap<char, &Series>,
    config: &FormulaConfig,
) -> Result<Vec<DataPoint>> {
    if series_by_letter.is_empty() {
        return Err(FormulaError::EmptyBinding);
    }

    let node = lower(formula.expr(), series_by_letter.len())?;
    let mut referenced = Vec::new();
    referenced_letters(&node, &mut referenced);

    let Some(reference) = reference_series(series_by_letter, &referenced) else {
        log::debug!("Formula '{}' has no data to evaluate", formula.expression_text());
        return Ok(Vec::new());
    };

    let dates: Vec<NaiveDate> = reference.points().iter().map(|p| p.date).collect();
    let columns: BTreeMap<char, Vec<f64>> = series_by_letter
        .iter()
        .map(|(letter, series)| (*letter, align(series, &dates)))
        .collect();

    let mut frame = Frame {
        columns: &columns,
        derived: Vec::new(),
        len: dates.len(),
        rsi_period: config.rsi_period,
    };
    let node = frame.materialize(node);

    let points = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let value = match frame.eval(&node, i) {
                Ok(value) if value.is_finite() => Some(value),
                Ok(value) => {
                    log::debug!(
                        "Formula '{}' on {}: {}",
                        formula.expression_text(),
                        date,
                        EvalError::NonFinite(value)
                    );
                    None
                }
                Err(e) => {
                    log::debug!("Formula '{}' on {}: {}", formula.expression_text(), date, e);
                    None
                }
            };
            DataPoint::from_option(*date, value)
        })
        .collect();

    Ok(points)
}

/// Resolve the letters of `formula` against `lookup` and evaluate.
///
/// Letters whose series can no longer be found are left out, so references
/// to them evaluate to missing points.
pub fn evaluate_bound<'a, F>(
    formula: &Formula,
    lookup: F,
    config: &FormulaConfig,
) -> Result<Vec<DataPoint>>
where
    F: Fn(&series_data::SeriesId) -> Option<&'a Series>,
{
    let series_by_letter: BTreeMap<char, &Series> = formula
        .binding()
        .iter()
        .filter_map(|(letter, id)| lookup(id).map(|series| (letter, series)))
        .collect();
    evaluate(formula, &series_by_letter, config)
}
