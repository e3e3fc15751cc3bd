//! Arithmetic formulas over bracketed column references.
//!
//! A formula like `"([Price] - [Discount]) * 1.2"` is tokenized and parsed
//! once into an expression tree, then evaluated against each row. Operators
//! are `+ - * /` with the usual precedence and left associativity; unary
//! minus and parentheses are supported.

use crate::error::{Result, TabulaError};
use crate::schema::{format_number, parse_number};
use crate::table::Row;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Column(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Column(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
    columns: Vec<String>,
}

impl Formula {
    /// Parse a formula string.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut parser = ExprParser {
            source,
            tokens: &tokens,
            pos: 0,
        };
        let expr = parser.expression()?;
        if parser.pos != tokens.len() {
            return Err(parser.error("unexpected trailing input"));
        }

        let mut columns: Vec<String> = Vec::new();
        for token in &tokens {
            if let Token::Column(name) = token {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            expr,
            columns,
        })
    }

    /// The original formula text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Referenced column names, in order of first appearance.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|s| s.as_str())
    }

    /// Evaluate the formula against a row.
    pub fn evaluate(&self, row: &Row<'_>) -> Result<f64> {
        self.eval(&self.expr, row)
    }

    /// Render a computed value as cell text.
    pub fn render(value: f64, decimal_digits: Option<usize>) -> String {
        match decimal_digits {
            Some(digits) => format!("{:.*}", digits, value),
            None => format_number(value),
        }
    }

    fn eval(&self, expr: &Expr, row: &Row<'_>) -> Result<f64> {
        match expr {
            Expr::Number(n) => Ok(*n),
            Expr::Column(name) => {
                let cell = row
                    .get(name)
                    .ok_or_else(|| TabulaError::unknown_column(name))?;
                parse_number(cell).ok_or_else(|| TabulaError::ValueConversion {
                    column: name.clone(),
                    row: row.index(),
                    value: cell.to_string(),
                })
            }
            Expr::Neg(inner) => Ok(-self.eval(inner, row)?),
            Expr::Binary { op, left, right } => {
                let l = self.eval(left, row)?;
                let r = self.eval(right, row)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => {
                        if r == 0.0 {
                            Err(TabulaError::Argument(format!(
                                "division by zero in formula '{}' at row {}",
                                self.source,
                                row.index()
                            )))
                        } else {
                            Ok(l / r)
                        }
                    }
                }
            }
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            c if c.is_whitespace() => {}
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '[' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed || name.is_empty() {
                    return Err(formula_error(source, pos, "unterminated or empty column reference"));
                }
                tokens.push(Token::Column(name));
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        literal.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| formula_error(source, pos, "malformed number"))?;
                tokens.push(Token::Number(value));
            }
            _ => return Err(formula_error(source, pos, "unexpected character")),
        }
    }

    Ok(tokens)
}

fn formula_error(source: &str, pos: usize, message: &str) -> TabulaError {
    TabulaError::Argument(format!(
        "invalid formula '{}': {} at position {}",
        source, message, pos
    ))
}

struct ExprParser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn error(&self, message: &str) -> TabulaError {
        TabulaError::Argument(format!(
            "invalid formula '{}': {} at token {}",
            self.source, message, self.pos
        ))
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn factor(&mut self) -> Result<Expr> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| self.error("unexpected end of formula"))?;
        self.pos += 1;

        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Column(name) => Ok(Expr::Column(name)),
            Token::Minus => Ok(Expr::Neg(Box::new(self.factor()?))),
            Token::Plus => self.factor(),
            Token::LParen => {
                let inner = self.expression()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(self.error("missing closing parenthesis")),
                }
            }
            Token::Star | Token::Slash | Token::RParen => Err(self.error("expected a value")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn eval_const(source: &str) -> f64 {
        let table = Table::from_columns([("x", vec!["0".to_string()])]).unwrap();
        let row = table.row(0).unwrap();
        Formula::parse(source).unwrap().evaluate(&row).unwrap()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval_const("2 + 3 * 4"), 14.0);
        assert_eq!(eval_const("10 - 4 - 3"), 3.0);
        assert_eq!(eval_const("8 / 4 / 2"), 1.0);
        assert_eq!(eval_const("(2 + 3) * 4"), 20.0);
        assert_eq!(eval_const("-3 + 5"), 2.0);
    }

    #[test]
    fn test_columns_in_first_appearance_order() {
        let formula = Formula::parse("[B] * [A] + [B]").unwrap();
        assert_eq!(formula.columns().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_column_names_with_spaces() {
        let formula = Formula::parse("[Unit Price]*2").unwrap();
        assert_eq!(formula.columns().collect::<Vec<_>>(), vec!["Unit Price"]);
    }

    #[test]
    fn test_malformed_formulas() {
        for bad in ["[A", "[]", "1 +", "(1 + 2", "1 2", "1..2", "3 % 2", "* 2"] {
            assert!(
                matches!(Formula::parse(bad), Err(TabulaError::Argument(_))),
                "expected failure for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_division_by_zero() {
        let table = Table::from_columns([("x", vec!["0".to_string()])]).unwrap();
        let row = table.row(0).unwrap();
        let err = Formula::parse("1 / [x]").unwrap().evaluate(&row).unwrap_err();
        assert!(matches!(err, TabulaError::Argument(_)));
    }

    #[test]
    fn test_render() {
        assert_eq!(Formula::render(7.0, Some(2)), "7.00");
        assert_eq!(Formula::render(7.0, None), "7");
        assert_eq!(Formula::render(2.345, Some(1)), "2.3");
    }
}
