//! Built-in computation providers, one per module.

pub mod congruence;
pub mod crt;
pub mod cubic;
pub mod multiplier;
pub mod polydiv;
pub mod project;
pub mod quadratic;
pub mod sturm;
pub mod trig;

use crate::algebra::{parse_equation, Dialect, Polynomial, UniPoly};
use crate::progress::CancellationToken;
use crate::provider::ComputationError;

/// Parse an equation in one variable, returning the variable name and polynomial.
///
/// A constant equation yields `None` as the variable.
pub(crate) fn parse_single_variable(
    input: &str,
    cancel: &CancellationToken,
) -> Result<(Option<String>, UniPoly), ComputationError> {
    let poly = Polynomial::from_expr(&parse_equation(input, Dialect::Polynomial)?, cancel)?;
    let mut vars = poly.variables().into_iter();
    match (vars.next(), vars.next()) {
        (None, _) => Ok((None, poly.to_univariate("x").unwrap_or_default())),
        (Some(var), None) => {
            let uni = poly.to_univariate(&var).unwrap_or_default();
            Ok((Some(var), uni))
        }
        (Some(_), Some(_)) => Err(ComputationError::Unsupported(format!(
            "Expected a polynomial in a single variable, found {}.",
            poly.variables().into_iter().collect::<Vec<_>>().join(", ")
        ))),
    }
}
