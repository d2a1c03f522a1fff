//! Closed registry of formula functions

use std::fmt;

/// Function families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Scalar math applied point by point
    Math,
    /// Named arithmetic over any number of arguments
    Arithmetic,
    /// Trailing-window technical indicator
    Indicator,
}

/// Supported formula functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // Scalar math
    Abs,
    Sqrt,
    Pow,
    Log,
    Log10,
    Exp,
    Min,
    Max,
    Round,
    Floor,
    Ceil,
    Sign,

    // Named arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Ratio,
    Average,

    // Technical indicators
    Sma,
    Ema,
    Roc,
    Rsi,
    Stdev,
}

impl Function {
    /// Every registered function
    pub fn all() -> &'static [Function] {
        use Function::*;
        &[
            Abs, Sqrt, Pow, Log, Log10, Exp, Min, Max, Round, Floor, Ceil, Sign, Add, Subtract,
            Multiply, Divide, Ratio, Average, Sma, Ema, Roc, Rsi, Stdev,
        ]
    }

    /// Resolve a function name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.to_ascii_uppercase();
        Self::all().iter().copied().find(|f| f.name() == wanted)
    }

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        use Function::*;
        match self {
            Abs => "ABS",
            Sqrt => "SQRT",
            Pow => "POW",
            Log => "LOG",
            Log10 => "LOG10",
            Exp => "EXP",
            Min => "MIN",
            Max => "MAX",
            Round => "ROUND",
            Floor => "FLOOR",
            Ceil => "CEIL",
            Sign => "SIGN",
            Add => "ADD",
            Subtract => "SUBTRACT",
            Multiply => "MULTIPLY",
            Divide => "DIVIDE",
            Ratio => "RATIO",
            Average => "AVERAGE",
            Sma => "SMA",
            Ema => "EMA",
            Roc => "ROC",
            Rsi => "RSI",
            Stdev => "STDEV",
        }
    }

    pub fn kind(&self) -> FunctionKind {
        use Function::*;
        match self {
            Abs | Sqrt | Pow | Log | Log10 | Exp | Min | Max | Round | Floor | Ceil | Sign => {
                FunctionKind::Math
            }
            Add | Subtract | Multiply | Divide | Ratio | Average => FunctionKind::Arithmetic,
            Sma | Ema | Roc | Rsi | Stdev => FunctionKind::Indicator,
        }
    }

    /// Accepted argument counts as `(min, max)`; `None` means unbounded
    pub fn arity(&self) -> (usize, Option<usize>) {
        use Function::*;
        match self {
            Abs | Sqrt | Log | Log10 | Exp | Floor | Ceil | Sign => (1, Some(1)),
            Round => (1, Some(2)),
            Pow => (2, Some(2)),
            Min | Max => (1, None),
            Add | Subtract | Multiply | Divide | Ratio | Average => (1, None),
            Sma | Ema | Roc | Stdev => (2, Some(2)),
            Rsi => (1, Some(2)),
        }
    }

    /// Whether `count` arguments are accepted
    pub fn accepts(&self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min && max.map_or(true, |max| count <= max)
    }

    /// Human readable arity for error messages
    pub fn arity_description(&self) -> String {
        match self.arity() {
            (min, Some(max)) if min == max => format!("{} argument(s)", min),
            (min, Some(max)) => format!("{} to {} arguments", min, max),
            (min, None) => format!("at least {} argument(s)", min),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(Function::from_name("sma"), Some(Function::Sma));
        assert_eq!(Function::from_name("Divide"), Some(Function::Divide));
        assert_eq!(Function::from_name("log10"), Some(Function::Log10));
        assert_eq!(Function::from_name("MEDIAN"), None);
    }

    #[test]
    fn test_every_name_resolves_to_itself() {
        for function in Function::all() {
            assert_eq!(Function::from_name(function.name()), Some(*function));
        }
    }

    #[test]
    fn test_arity() {
        assert!(Function::Rsi.accepts(1));
        assert!(Function::Rsi.accepts(2));
        assert!(!Function::Sma.accepts(1));
        assert!(Function::Average.accepts(7));
        assert!(!Function::Add.accepts(0));
        assert_eq!(Function::Pow.arity_description(), "2 argument(s)");
        assert_eq!(Function::Round.arity_description(), "1 to 2 arguments");
        assert_eq!(Function::Max.arity_description(), "at least 1 argument(s)");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Function::Stdev.kind(), FunctionKind::Indicator);
        assert_eq!(Function::Ratio.kind(), FunctionKind::Arithmetic);
        assert_eq!(Function::Ceil.kind(), FunctionKind::Math);
    }
}
