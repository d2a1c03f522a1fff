//! Formula lexer
//!
//! Tokenizes formula text for parsing. A `-` is always emitted as an operator;
//! negative literals are handled by the parser's unary rule so that `A-1`
//! reads as a subtraction.

use crate::error::FormulaError;

/// Token kinds in formula expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (function name or variable)
    Ident(String),
    /// Numeric literal
    Number(f64),
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Comma separator
    Comma,
    /// Plus operator
    Plus,
    /// Minus operator
    Minus,
    /// Multiply operator
    Star,
    /// Divide operator
    Slash,
    /// Power operator
    Caret,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Short description used in syntax errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Caret => "'^'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize, length: usize) -> Self {
        Self {
            kind,
            position,
            length,
        }
    }
}

/// Lexer for formula expressions
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize the entire input; the last token is always `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, FormulaError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, FormulaError> {
        self.skip_whitespace();

        let Some(&(pos, ch)) = self.chars.peek() else {
            return Ok(Token::new(TokenKind::Eof, self.input.len(), 0));
        };

        let single = match ch {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            _ => None,
        };
        if let Some(kind) = single {
            self.chars.next();
            return Ok(Token::new(kind, pos, 1));
        }

        match ch {
            '0'..='9' | '.' => {
                let (num, len) = self.read_number(pos)?;
                Ok(Token::new(TokenKind::Number(num), pos, len))
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let (ident, len) = self.read_identifier();
                Ok(Token::new(TokenKind::Ident(ident), pos, len))
            }
            _ => Err(FormulaError::syntax(
                pos,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, start_pos: usize) -> Result<(f64, usize), FormulaError> {
        let mut num_str = String::new();
        let mut has_dot = false;

        while let Some(&(_, ch)) = self.chars.peek() {
            match ch {
                '0'..='9' => {
                    num_str.push(ch);
                    self.chars.next();
                }
                '.' if !has_dot => {
                    has_dot = true;
                    num_str.push(ch);
                    self.chars.next();
                }
                'e' | 'E' => {
                    // Scientific notation
                    num_str.push(ch);
                    self.chars.next();
                    if let Some(&(_, sign)) = self.chars.peek() {
                        if sign == '+' || sign == '-' {
                            num_str.push(sign);
                            self.chars.next();
                        }
                    }
                }
                _ => break,
            }
        }

        let len = num_str.len();
        num_str
            .parse::<f64>()
            .map(|n| (n, len))
            .map_err(|_| FormulaError::syntax(start_pos, format!("invalid number '{}'", num_str)))
    }

    fn read_identifier(&mut self) -> (String, usize) {
        let mut ident = String::new();

        while let Some(&(_, ch)) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }

        let len = ident.len();
        (ident, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_call() {
        assert_eq!(
            kinds("SMA(A, 3)"),
            vec![
                TokenKind::Ident("SMA".to_string()),
                TokenKind::LParen,
                TokenKind::Ident("A".to_string()),
                TokenKind::Comma,
                TokenKind::Number(3.0),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_minus_is_always_an_operator() {
        assert_eq!(
            kinds("A-1"),
            vec![
                TokenKind::Ident("A".to_string()),
                TokenKind::Minus,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("  A ^ 2").tokenize().unwrap();
        assert_eq!(tokens[0].position, 2);
        assert_eq!(tokens[1].kind, TokenKind::Caret);
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[3].position, 7);
    }

    #[test]
    fn test_tokenize_scientific_notation() {
        let tokens = Lexer::new("1.5e-3").tokenize().unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Number(n) if (n - 0.0015).abs() < 1e-10));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("A $ B").tokenize().unwrap_err();
        assert!(matches!(err, FormulaError::InvalidFormulaSyntax { position: 2, .. }));
    }
}
