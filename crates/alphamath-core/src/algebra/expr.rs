//! Expression tree and floating-point evaluation.

use std::f64::consts::{E, PI};

use num_rational::BigRational;

use crate::arith::rational_to_f64;

/// Elementary functions understood by the trigonometric dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Csc,
    Sec,
    Cot,
    Acsc,
    Asec,
    Acot,
    Sqrt,
}

impl Func {
    /// Names in longest-match order.
    pub(crate) const NAMES: [(&'static str, Func); 13] = [
        ("asin", Func::Asin),
        ("acos", Func::Acos),
        ("atan", Func::Atan),
        ("acsc", Func::Acsc),
        ("asec", Func::Asec),
        ("acot", Func::Acot),
        ("sqrt", Func::Sqrt),
        ("sin", Func::Sin),
        ("cos", Func::Cos),
        ("tan", Func::Tan),
        ("csc", Func::Csc),
        ("sec", Func::Sec),
        ("cot", Func::Cot),
    ];

    /// Whether the function returns an angle.
    #[must_use]
    pub const fn is_inverse(self) -> bool {
        matches!(
            self,
            Func::Asin | Func::Acos | Func::Atan | Func::Acsc | Func::Asec | Func::Acot
        )
    }

    /// Source name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, f)| *f == self)
            .map_or("?", |(n, _)| *n)
    }

    fn apply(self, x: f64) -> Result<f64, EvalError> {
        let recip = |v: f64| {
            if v == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(1.0 / v)
            }
        };
        let value = match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Asin => x.asin(),
            Func::Acos => x.acos(),
            Func::Atan => x.atan(),
            Func::Csc => recip(x.sin())?,
            Func::Sec => recip(x.cos())?,
            Func::Cot => recip(x.tan())?,
            Func::Acsc => recip(x)?.asin(),
            Func::Asec => recip(x)?.acos(),
            Func::Acot => recip(x)?.atan(),
            Func::Sqrt => x.sqrt(),
        };
        if value.is_nan() {
            Err(EvalError::Domain)
        } else {
            Ok(value)
        }
    }
}

/// Named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

/// Parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(BigRational),
    Var(String),
    Const(Constant),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

/// Errors raised by floating-point evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error")]
    Domain,

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
}

impl Expr {
    /// Evaluate numerically; variables are rejected.
    pub fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Expr::Num(n) => Ok(rational_to_f64(n)),
            Expr::Var(v) => Err(EvalError::UnknownVariable(v.clone())),
            Expr::Const(Constant::Pi) => Ok(PI),
            Expr::Const(Constant::E) => Ok(E),
            Expr::Neg(e) => Ok(-e.eval()?),
            Expr::Add(a, b) => Ok(a.eval()? + b.eval()?),
            Expr::Sub(a, b) => Ok(a.eval()? - b.eval()?),
            Expr::Mul(a, b) => Ok(a.eval()? * b.eval()?),
            Expr::Div(a, b) => {
                let (a, b) = (a.eval()?, b.eval()?);
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }
            Expr::Pow(a, b) => {
                let (a, b) = (a.eval()?, b.eval()?);
                if a == 0.0 && b < 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                let value = a.powf(b);
                if value.is_nan() {
                    Err(EvalError::Domain)
                } else {
                    Ok(value)
                }
            }
            Expr::Call(f, arg) => f.apply(arg.eval()?),
        }
    }

    /// Whether any inverse trigonometric function appears in the tree.
    #[must_use]
    pub fn contains_inverse_trig(&self) -> bool {
        match self {
            Expr::Num(_) | Expr::Var(_) | Expr::Const(_) => false,
            Expr::Neg(e) => e.contains_inverse_trig(),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.contains_inverse_trig() || b.contains_inverse_trig(),
            Expr::Call(f, arg) => f.is_inverse() || arg.contains_inverse_trig(),
        }
    }
}
