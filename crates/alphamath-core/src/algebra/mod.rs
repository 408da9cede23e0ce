//! Polynomial and expression engine used by the algebraic providers.

pub mod expr;
pub mod factor;
pub mod format;
pub mod parser;
pub mod poly;
pub mod radical;
pub mod univariate;

pub use expr::{Constant, EvalError, Expr, Func};
pub use factor::{factor, Factorization};
pub use parser::{parse, parse_equation, Dialect, ParseError};
pub use poly::Polynomial;
pub use radical::{solve_quadratic, QuadraticRoots, QuadraticSolution};
pub use univariate::UniPoly;
