//! Tokenizer and recursive-descent parser for calculator input.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! equation := expr ('=' expr)?
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary | power)*     // juxtaposition multiplies
//! unary    := ('-' | '+') unary | power
//! power    := primary ('^' exponent)?
//! exponent := ('-' | '+') exponent | power           // right-associative
//! primary  := number | var | const | '(' expr ')' | func ('^' exponent)? primary
//! ```
//!
//! `-x^2` therefore parses as `-(x^2)`, and `sin^2(x)` as `(sin(x))^2`.

use std::fmt;

use num_rational::BigRational;

use super::expr::{Constant, Expr, Func};
use crate::arith::parse_rational;
use crate::provider::ComputationError;

/// How letter runs are split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Every letter is its own variable (`xy` is `x·y`).
    Polynomial,
    /// Letter runs are function and constant names; no variables.
    Trigonometric,
}

/// Parse failures. Display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unbalanced parentheses")]
    Unbalanced,

    #[error("more than one '=' in equation")]
    MultipleEquals,
}

impl From<ParseError> for ComputationError {
    fn from(err: ParseError) -> Self {
        ComputationError::InvalidInput(format!("Invalid expression: {err}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(BigRational),
    Var(String),
    Const(Constant),
    Func(Func),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Equals,
}

impl Token {
    fn starts_primary(&self) -> bool {
        matches!(
            self,
            Token::Num(_) | Token::Var(_) | Token::Const(_) | Token::Func(_) | Token::LParen
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::Var(v) => f.write_str(v),
            Token::Const(Constant::Pi) => f.write_str("pi"),
            Token::Const(Constant::E) => f.write_str("e"),
            Token::Func(func) => f.write_str(func.name()),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Equals => f.write_str("="),
        }
    }
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        '⁻' => '-',
        _ => return None,
    })
}

/// Rewrite typographic operators and superscripts into plain ASCII syntax.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_superscript = false;
    for c in input.chars() {
        if let Some(d) = superscript(c) {
            if !in_superscript {
                out.push('^');
                in_superscript = true;
            }
            out.push(d);
            continue;
        }
        in_superscript = false;
        match c {
            '−' | '–' | '—' => out.push('-'),
            '×' | '·' | '⋅' => out.push('*'),
            '÷' => out.push('/'),
            '[' | '{' => out.push('('),
            ']' | '}' => out.push(')'),
            _ => out.push(c),
        }
    }
    out.replace("**", "^")
}

fn split_names(run: &str, out: &mut Vec<Token>) -> Result<(), ParseError> {
    let mut rest = run;
    while !rest.is_empty() {
        if let Some((name, func)) = Func::NAMES.iter().find(|(n, _)| rest.starts_with(n)) {
            out.push(Token::Func(*func));
            rest = &rest[name.len()..];
        } else if let Some(tail) = rest.strip_prefix("pi") {
            out.push(Token::Const(Constant::Pi));
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('e') {
            out.push(Token::Const(Constant::E));
            rest = tail;
        } else {
            return Err(ParseError::UnknownName(run.to_string()));
        }
    }
    Ok(())
}

fn tokenize(input: &str, dialect: Dialect) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut literal = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || (d == '.' && !literal.contains('.')) {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let value =
                parse_rational(&literal).ok_or_else(|| ParseError::InvalidNumber(literal))?;
            tokens.push(Token::Num(value));
        } else if c == 'π' {
            chars.next();
            tokens.push(Token::Const(Constant::Pi));
        } else if c == '√' {
            chars.next();
            tokens.push(Token::Func(Func::Sqrt));
        } else if c.is_alphabetic() {
            let mut run = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphabetic() && d != 'π' {
                    run.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            match dialect {
                Dialect::Polynomial => {
                    tokens.extend(run.chars().map(|v| Token::Var(v.to_string())));
                }
                Dialect::Trigonometric => split_names(&run.to_lowercase(), &mut tokens)?,
            }
        } else {
            chars.next();
            tokens.push(match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '=' => Token::Equals,
                other => return Err(ParseError::UnexpectedChar(other)),
            });
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn equation(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.expr()?;
        if self.eat(&Token::Equals) {
            let rhs = self.expr()?;
            if self.peek() == Some(&Token::Equals) {
                return Err(ParseError::MultipleEquals);
            }
            return Ok(Expr::Sub(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
            } else if self.eat(&Token::Minus) {
                lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
            } else if self.eat(&Token::Slash) {
                lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
            } else if self.peek().is_some_and(Token::starts_primary) {
                lhs = Expr::Mul(Box::new(lhs), Box::new(self.power()?));
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.exponent()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn exponent(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.exponent()?)));
        }
        if self.eat(&Token::Plus) {
            return self.exponent();
        }
        self.power()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::Var(v)) => Ok(Expr::Var(v)),
            Some(Token::Const(c)) => Ok(Expr::Const(c)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    Err(ParseError::Unbalanced)
                }
            }
            Some(Token::Func(func)) => {
                let power = if self.eat(&Token::Caret) {
                    Some(self.exponent()?)
                } else {
                    None
                };
                let arg = if self.eat(&Token::Minus) {
                    Expr::Neg(Box::new(self.primary()?))
                } else {
                    self.primary()?
                };
                let call = Expr::Call(func, Box::new(arg));
                Ok(match power {
                    Some(p) => Expr::Pow(Box::new(call), Box::new(p)),
                    None => call,
                })
            }
            Some(Token::RParen) => Err(ParseError::Unbalanced),
            Some(other) => Err(ParseError::UnexpectedToken(other.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(Token::RParen) => Err(ParseError::Unbalanced),
            Some(Token::Equals) => Err(ParseError::UnexpectedToken("=".into())),
            Some(other) => Err(ParseError::UnexpectedToken(other.to_string())),
        }
    }
}

fn run(
    input: &str,
    dialect: Dialect,
    rule: fn(&mut Parser) -> Result<Expr, ParseError>,
) -> Result<Expr, ParseError> {
    let tokens = tokenize(&normalize(input), dialect)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = rule(&mut parser)?;
    parser.finish()?;
    Ok(expr)
}

/// Parse a single expression.
pub fn parse(input: &str, dialect: Dialect) -> Result<Expr, ParseError> {
    run(input, dialect, Parser::expr)
}

/// Parse `lhs = rhs` as `lhs - rhs`; a bare expression is returned unchanged.
pub fn parse_equation(input: &str, dialect: Dialect) -> Result<Expr, ParseError> {
    run(input, dialect, Parser::equation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn poly(s: &str) -> Expr {
        parse(s, Dialect::Polynomial).unwrap()
    }

    fn num(n: i64) -> Box<Expr> {
        Box::new(Expr::Num(BigRational::from_integer(BigInt::from(n))))
    }

    fn var(v: &str) -> Box<Expr> {
        Box::new(Expr::Var(v.into()))
    }

    #[test]
    fn normalize_rewrites_typography() {
        assert_eq!(normalize("x² − 5x × 2"), "x^2 - 5x * 2");
        assert_eq!(normalize("x**3 ÷ y"), "x^3 / y");
        assert_eq!(normalize("x⁻¹"), "x^-1");
        assert_eq!(normalize("x¹²"), "x^12");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(poly("2x"), Expr::Mul(num(2), var("x")));
        assert_eq!(poly("xy"), Expr::Mul(var("x"), var("y")));
        assert_eq!(
            poly("2(x)"),
            Expr::Mul(num(2), var("x")),
        );
    }

    #[test]
    fn unary_minus_binds_weaker_than_power() {
        assert_eq!(
            poly("-x^2"),
            Expr::Neg(Box::new(Expr::Pow(var("x"), num(2))))
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            poly("x^2^3"),
            Expr::Pow(var("x"), Box::new(Expr::Pow(num(2), num(3))))
        );
        assert_eq!(
            poly("x^-1"),
            Expr::Pow(var("x"), Box::new(Expr::Neg(num(1))))
        );
    }

    #[test]
    fn coefficient_times_power() {
        assert_eq!(
            poly("3x^2"),
            Expr::Mul(num(3), Box::new(Expr::Pow(var("x"), num(2))))
        );
    }

    #[test]
    fn equation_subtracts_sides() {
        let e = parse_equation("x = 1", Dialect::Polynomial).unwrap();
        assert_eq!(e, Expr::Sub(var("x"), num(1)));
        assert_eq!(
            parse_equation("x = 1 = 2", Dialect::Polynomial),
            Err(ParseError::MultipleEquals)
        );
        assert!(parse("x = 1", Dialect::Polynomial).is_err());
    }

    #[test]
    fn trig_names_split_greedily() {
        let e = parse("sin(pi/6)", Dialect::Trigonometric).unwrap();
        assert_eq!(
            e,
            Expr::Call(
                Func::Sin,
                Box::new(Expr::Div(Box::new(Expr::Const(Constant::Pi)), num(6)))
            )
        );
        assert!(matches!(
            parse("4pi", Dialect::Trigonometric).unwrap(),
            Expr::Mul(_, _)
        ));
        assert!(parse("asin(1)", Dialect::Trigonometric)
            .unwrap()
            .contains_inverse_trig());
    }

    #[test]
    fn trig_power_of_function() {
        let e = parse("sin^2(pi)", Dialect::Trigonometric).unwrap();
        assert!(matches!(e, Expr::Pow(ref base, _) if matches!(**base, Expr::Call(Func::Sin, _))));
    }

    #[test]
    fn trig_rejects_unknown_names() {
        assert_eq!(
            parse("foo(1)", Dialect::Trigonometric),
            Err(ParseError::UnknownName("foo".into()))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse("", Dialect::Polynomial), Err(ParseError::Empty));
        assert_eq!(parse("(x + 1", Dialect::Polynomial), Err(ParseError::Unbalanced));
        assert_eq!(parse("x + 1)", Dialect::Polynomial), Err(ParseError::Unbalanced));
        assert_eq!(parse("x +", Dialect::Polynomial), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            parse("x $ 1", Dialect::Polynomial),
            Err(ParseError::UnexpectedChar('$'))
        );
    }

    #[test]
    fn parse_error_converts_to_invalid_input() {
        let err: ComputationError = ParseError::Empty.into();
        assert_eq!(err.to_string(), "Invalid expression: empty expression");
    }
}
