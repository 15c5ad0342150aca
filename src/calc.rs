//! Arithmetic evaluator behind the calculator shell.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! statement := "let" IDENT "=" expr | expr
//! expr      := term (("+" | "-") term)*
//! term      := unary (("*" | "/" | "%") unary)*
//! unary     := "-" unary | power
//! power     := primary ("^" unary)?
//! primary   := NUMBER | IDENT | IDENT "(" expr ")" | "(" expr ")"
//! ```

use std::collections::BTreeMap;
use thiserror::Error;

/// Words the shell completes besides variable names.
pub const KEYWORDS: &[&str] = &["let"];

/// One-argument functions.
pub const FUNCTIONS: &[&str] = &["abs", "cos", "exp", "ln", "sin", "sqrt"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unexpected character '{found}' at column {column}")]
    UnexpectedChar { found: char, column: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("'{0}' is reserved")]
    ReservedName(String),
    #[error("division by zero")]
    DivisionByZero,
}

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Assign,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("'{name}'"),
            Token::Op(op) => format!("'{op}'"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Assign => "'='".to_string(),
            Token::End => "end of input".to_string(),
        }
    }
}

fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(index, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse()
                    .map_err(|_| CalcError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if is_ident_char(d) {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '=' => {
                tokens.push(Token::Assign);
                chars.next();
            }
            other => {
                return Err(CalcError::UnexpectedChar {
                    found: other,
                    column: index + 1,
                })
            }
        }
    }
    tokens.push(Token::End);
    Ok(tokens)
}

/// Whether `c` may appear inside an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parenthesis depth at the end of `input`: positive while groups are open.
pub fn open_depth(input: &str) -> isize {
    input.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    vars: &'a BTreeMap<String, f64>,
}

impl Parser<'_> {
    // `tokens` always ends with `Token::End`, and `pos` never moves past it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn peek_op(&self, ops: &[char]) -> Option<char> {
        match self.peek() {
            Token::Op(op) if ops.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn expect(&mut self, expected: Token) -> CalcResult<()> {
        let found = self.advance();
        if found == expected {
            Ok(())
        } else {
            Err(CalcError::UnexpectedToken {
                expected: expected.describe(),
                found: found.describe(),
            })
        }
    }

    fn expr(&mut self) -> CalcResult<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek_op(&['+', '-']) {
            self.advance();
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> CalcResult<f64> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek_op(&['*', '/', '%']) {
            self.advance();
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err(CalcError::DivisionByZero),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> CalcResult<f64> {
        if self.peek_op(&['-']).is_some() {
            self.advance();
            return Ok(-self.unary()?);
        }
        self.power()
    }

    fn power(&mut self) -> CalcResult<f64> {
        let base = self.primary()?;
        if self.peek_op(&['^']).is_some() {
            self.advance();
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> CalcResult<f64> {
        match self.advance() {
            Token::Number(value) => Ok(value),
            Token::LParen => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Token::Ident(name) if *self.peek() == Token::LParen => {
                self.advance();
                let arg = self.expr()?;
                self.expect(Token::RParen)?;
                apply(&name, arg)
            }
            Token::Ident(name) => self
                .vars
                .get(&name)
                .copied()
                .ok_or(CalcError::UnknownVariable(name)),
            other => Err(CalcError::UnexpectedToken {
                expected: "a value".to_string(),
                found: other.describe(),
            }),
        }
    }
}

fn apply(function: &str, arg: f64) -> CalcResult<f64> {
    let value = match function {
        "abs" => arg.abs(),
        "cos" => arg.cos(),
        "exp" => arg.exp(),
        "ln" => arg.ln(),
        "sin" => arg.sin(),
        "sqrt" => arg.sqrt(),
        _ => return Err(CalcError::UnknownFunction(function.to_string())),
    };
    Ok(value)
}

/// Evaluator state: the variables defined so far.
#[derive(Debug, Clone)]
pub struct Calculator {
    vars: BTreeMap<String, f64>,
}

impl Default for Calculator {
    fn default() -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("pi".to_string(), std::f64::consts::PI);
        vars.insert("e".to_string(), std::f64::consts::E);
        Calculator { vars }
    }
}

impl Calculator {
    /// Names of all defined variables, sorted.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Evaluate one statement. An assignment stores and returns the value.
    pub fn evaluate(&mut self, input: &str) -> CalcResult<f64> {
        let tokens = tokenize(input)?;
        let assignment = match tokens.as_slice() {
            [Token::Ident(kw), Token::Ident(name), Token::Assign, ..] if kw == "let" => {
                Some((name.clone(), 3))
            }
            _ => None,
        };

        let (target, start) = match assignment {
            Some((name, start)) => {
                if KEYWORDS.contains(&name.as_str()) || FUNCTIONS.contains(&name.as_str()) {
                    return Err(CalcError::ReservedName(name));
                }
                (Some(name), start)
            }
            None => (None, 0),
        };

        let mut parser = Parser {
            tokens,
            pos: start,
            vars: &self.vars,
        };
        let value = parser.expr()?;
        parser.expect(Token::End)?;

        if let Some(name) = target {
            self.vars.insert(name, value);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> CalcResult<f64> {
        Calculator::default().evaluate(input)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
        assert_eq!(eval("10-4-3"), Ok(3.0));
        assert_eq!(eval("2^3^2"), Ok(512.0));
        assert_eq!(eval("-2^2"), Ok(-4.0));
        assert_eq!(eval("7 % 4"), Ok(3.0));
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(eval("sqrt(16)"), Ok(4.0));
        assert_eq!(eval("abs(-2.5)"), Ok(2.5));
        assert_eq!(eval("pi"), Ok(std::f64::consts::PI));
        assert_eq!(eval("nope(1)"), Err(CalcError::UnknownFunction("nope".to_string())));
    }

    #[test]
    fn test_assignment() {
        let mut calc = Calculator::default();
        assert_eq!(calc.evaluate("let width = 3"), Ok(3.0));
        assert_eq!(calc.evaluate("let area = width * width"), Ok(9.0));
        assert_eq!(calc.evaluate("area + 1"), Ok(10.0));
        assert!(calc.variables().any(|name| name == "area"));
        assert_eq!(
            calc.evaluate("let sqrt = 1"),
            Err(CalcError::ReservedName("sqrt".to_string()))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval("x"), Err(CalcError::UnknownVariable("x".to_string())));
        assert_eq!(
            eval("1 $ 2"),
            Err(CalcError::UnexpectedChar {
                found: '$',
                column: 3
            })
        );
        assert_eq!(eval("1.2.3"), Err(CalcError::InvalidNumber("1.2.3".to_string())));
        assert!(matches!(eval("(1"), Err(CalcError::UnexpectedToken { .. })));
        assert!(matches!(eval("1)"), Err(CalcError::UnexpectedToken { .. })));
        assert_eq!(
            eval("").unwrap_err().to_string(),
            "expected a value, found end of input"
        );
    }

    #[test]
    fn test_open_depth() {
        assert_eq!(open_depth("(1 + (2"), 2);
        assert_eq!(open_depth("(1)"), 0);
        assert_eq!(open_depth("1)"), -1);
    }
}
