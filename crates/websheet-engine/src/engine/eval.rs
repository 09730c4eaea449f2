//! Arithmetic evaluation of preprocessed formulas.
//!
//! A recursive descent parser with the usual precedence:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Only numeric literals and `+ - * / ( )` are accepted; anything else is an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unexpected token at position {pos}")]
    UnexpectedToken { pos: usize },

    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("Result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, EvalError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LeftParen,
            b')' => Token::RightParen,
            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let literal = &input[start..pos];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| EvalError::InvalidNumber(literal.to_string()))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('\u{FFFD}');
                return Err(EvalError::UnexpectedChar { ch, pos });
            }
        };
        tokens.push((start, token));
        pos += 1;
    }

    Ok(tokens)
}

/// Returns the end offset of the numeric literal starting at `pos`.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
        pos += 1;
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            pos = exp;
        }
    }
    pos
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.index).map(|(_, t)| *t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.index += 1;
        token
    }

    fn position(&self) -> usize {
        self.tokens.get(self.index).map(|(p, _)| *p).unwrap_or(0)
    }

    fn parse_expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.index += 1;
                    value += self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.index += 1;
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.index += 1;
                    value *= self.parse_unary()?;
                }
                Some(Token::Slash) => {
                    self.index += 1;
                    value /= self.parse_unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.index += 1;
                self.parse_unary()
            }
            Some(Token::Minus) => {
                self.index += 1;
                Ok(-self.parse_unary()?)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<f64, EvalError> {
        let pos = self.position();
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LeftParen) => {
                let value = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(value),
                    Some(_) => Err(EvalError::UnexpectedToken {
                        pos: self.tokens[self.index - 1].0,
                    }),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(_) => Err(EvalError::UnexpectedToken { pos }),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression. Non-finite results (e.g. `1/0`) are errors.
pub fn eval_arithmetic(expression: &str) -> Result<f64, EvalError> {
    let mut parser = Parser {
        tokens: tokenize(expression)?,
        index: 0,
    };
    let value = parser.parse_expr()?;
    if parser.index < parser.tokens.len() {
        return Err(EvalError::UnexpectedToken {
            pos: parser.position(),
        });
    }
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_parens() {
        assert_eq!(eval_arithmetic("1+2*3"), Ok(7.0));
        assert_eq!(eval_arithmetic("(1+2)*3"), Ok(9.0));
        assert_eq!(eval_arithmetic("10/4-1"), Ok(1.5));
        assert_eq!(eval_arithmetic("2*(3+(4-1))/3"), Ok(4.0));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval_arithmetic("-3"), Ok(-3.0));
        assert_eq!(eval_arithmetic("2--5"), Ok(7.0));
        assert_eq!(eval_arithmetic("2*-5"), Ok(-10.0));
        assert_eq!(eval_arithmetic("+-+4"), Ok(-4.0));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(eval_arithmetic(".5+5."), Ok(5.5));
        assert_eq!(eval_arithmetic("1e3/2"), Ok(500.0));
        assert_eq!(eval_arithmetic("2.5E-1"), Ok(0.25));
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        assert_eq!(eval_arithmetic("1/0"), Err(EvalError::NonFinite));
        assert_eq!(eval_arithmetic("0/0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(eval_arithmetic(""), Err(EvalError::UnexpectedEnd));
        assert_eq!(eval_arithmetic("1+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(eval_arithmetic("(1+2"), Err(EvalError::UnexpectedEnd));
        assert_eq!(eval_arithmetic("1+2)"), Err(EvalError::UnexpectedToken { pos: 3 }));
        assert_eq!(eval_arithmetic("1 2"), Err(EvalError::UnexpectedToken { pos: 2 }));
        assert_eq!(eval_arithmetic("1..2"), Err(EvalError::InvalidNumber("1..2".into())));
        assert_eq!(
            eval_arithmetic("a1+1"),
            Err(EvalError::UnexpectedChar { ch: 'a', pos: 0 })
        );
        assert!(matches!(eval_arithmetic("2^3"), Err(EvalError::UnexpectedChar { .. })));
    }
}
