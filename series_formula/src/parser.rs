//! Recursive-descent parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | IDENT | IDENT '(' [expr (',' expr)*] ')' | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than a leading minus, so
//! `-A^2` is `-(A^2)`.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::FormulaError;
use crate::lexer::{Lexer, Token, TokenKind};

/// Default maximum nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parse formula text into an expression tree
pub fn parse(input: &str, max_depth: usize) -> Result<Expr, FormulaError> {
    if input.trim().is_empty() {
        return Err(FormulaError::syntax(0, "empty expression"));
    }

    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let expr = parser.parse_expr()?;
    let trailing = parser.peek();
    match trailing.kind {
        TokenKind::Eof => Ok(expr),
        TokenKind::RParen => Err(FormulaError::syntax(
            trailing.position,
            "unbalanced parentheses: unmatched ')'",
        )),
        ref kind => Err(FormulaError::syntax(
            trailing.position,
            format!("unexpected {} after end of expression", kind.describe()),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, and advance() never moves past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FormulaError::syntax(
                self.peek().position,
                format!("expression nested too deeply (max depth: {})", self.max_depth),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.leave_levels(1);
    }

    fn leave_levels(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn parse_expr(&mut self) -> Result<Expr, FormulaError> {
        self.enter()?;
        let mut left = self.parse_term()?;

        // Each operator in a chain nests the tree one level deeper
        let mut chained = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            chained += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.leave_levels(chained + 1);
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.parse_unary()?;

        let mut chained = 0;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            self.enter()?;
            chained += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.leave_levels(chained);
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.advance();

        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.parse_primary()?;
        if self.peek().kind != TokenKind::Caret {
            return Ok(base);
        }
        self.advance();

        self.enter()?;
        let exponent = self.parse_unary()?;
        self.leave();

        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        let token = self.advance();

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::Ident(name) => {
                if self.peek().kind == TokenKind::LParen {
                    let open = self.advance();
                    let args = self.parse_args(open.position)?;
                    Ok(Expr::Call {
                        name,
                        args,
                        position: token.position,
                    })
                } else {
                    Ok(Expr::Variable {
                        name,
                        position: token.position,
                    })
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect_close(token.position)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(FormulaError::syntax(
                token.position,
                "unexpected end of input",
            )),
            TokenKind::RParen => Err(FormulaError::syntax(
                token.position,
                "unbalanced parentheses: unexpected ')'",
            )),
            kind => Err(FormulaError::syntax(
                token.position,
                format!("unexpected {}", kind.describe()),
            )),
        }
    }

    fn parse_args(&mut self, open_position: usize) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                _ => {
                    self.expect_close(open_position)?;
                    return Ok(args);
                }
            }
        }
    }

    fn expect_close(&mut self, open_position: usize) -> Result<(), FormulaError> {
        let token = self.advance();
        match token.kind {
            TokenKind::RParen => Ok(()),
            TokenKind::Eof => Err(FormulaError::syntax(
                open_position,
                "unbalanced parentheses: '(' is never closed",
            )),
            kind => Err(FormulaError::syntax(
                token.position,
                format!("expected ')' but found {}", kind.describe()),
            )),
        }
    }
}
