//! Formula syntax tree

use std::fmt;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }
}

/// A formula expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric constant
    Number(f64),

    /// A bare identifier; valid formulas only use single letters `A`..`Z`
    Variable { name: String, position: usize },

    /// A prefix operator
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// An infix operator
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A function call as written; names are resolved by the validator
    Call {
        name: String,
        args: Vec<Expr>,
        position: usize,
    },
}

impl Expr {
    /// Walk the tree in pre-order
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Number(_) | Expr::Variable { .. } => {}
            Expr::Unary { operand, .. } => operand.visit(f),
            Expr::Binary { left, right, .. } => {
                left.visit(f);
                right.visit(f);
            }
            Expr::Call { args, .. } => args.iter().for_each(|arg| arg.visit(f)),
        }
    }

    /// Names of all bare identifiers, in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        self.visit(&mut |node| {
            if let Expr::Variable { name, .. } = node {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        });
        names
    }

    /// Get the depth of this expression tree
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable { .. } => 1,
            Expr::Unary { operand, .. } => 1 + operand.depth(),
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e10 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Expr::Variable { name, .. } => write!(f, "{}", name),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Plus => write!(f, "+{}", operand),
                UnaryOp::Neg => write!(f, "-{}", operand),
            },
            Expr::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
