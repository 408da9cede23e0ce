//! Algebra workspace: expand, simplify, factor and substitute polynomials.

use std::collections::BTreeMap;

use num_rational::BigRational;

use crate::algebra::format::{fixed, rational};
use crate::algebra::{factor, parse, Dialect, Polynomial};
use crate::arith::rational_to_f64;
use crate::constants::DEFAULT_ALGEBRA_MODE;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, ComputationProvider};

/// Backend of the algebra workspace, reached through the `proj` id.
pub struct AlgebraProvider;

/// Menu entry that opens the algebra workspace. It has no `main`.
pub struct ActivityEntry;

/// Supported modes, as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Expand,
    Simplify,
    Factor,
    Substitute,
}

impl Mode {
    fn parse(text: &str) -> Result<Self, ComputationError> {
        match text.trim().to_lowercase().as_str() {
            "expand" => Ok(Self::Expand),
            "simplify" => Ok(Self::Simplify),
            "factor" => Ok(Self::Factor),
            "substitute" => Ok(Self::Substitute),
            other => Err(ComputationError::invalid(format!(
                "Unknown mode '{other}'. Valid modes: expand, simplify, factor, substitute."
            ))),
        }
    }
}

fn parse_polynomial(
    text: &str,
    cancel: &CancellationToken,
) -> Result<Polynomial, ComputationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ComputationError::invalid("Expression cannot be empty."));
    }
    Polynomial::from_expr(&parse(text, Dialect::Polynomial)?, cancel)
}

/// `x=1, y=-2/3` into a value map.
fn parse_assignments(
    text: &str,
    cancel: &CancellationToken,
) -> Result<BTreeMap<String, BigRational>, ComputationError> {
    let mut values = BTreeMap::new();
    for assignment in text.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        cancel.check_cancelled()?;
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(ComputationError::invalid(format!(
                "Invalid variable assignment format: '{assignment}'. Expected 'var=value'."
            )));
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            return Err(ComputationError::invalid(format!(
                "Variable name cannot be empty in '{assignment}'."
            )));
        }
        if value.is_empty() {
            return Err(ComputationError::invalid(format!(
                "Value cannot be empty for variable '{name}'."
            )));
        }
        let constant = parse(value, Dialect::Polynomial)
            .ok()
            .and_then(|expr| Polynomial::from_expr(&expr, cancel).ok())
            .and_then(|p| p.constant_value())
            .ok_or_else(|| {
                ComputationError::invalid(format!(
                    "Could not parse value '{value}' for variable '{name}'."
                ))
            })?;
        values.insert(name.to_string(), constant);
    }
    Ok(values)
}

fn substitute(input: &str, cancel: &CancellationToken) -> Result<String, ComputationError> {
    let (expression, assignments) = input.split_once(';').unwrap_or((input, ""));
    if expression.trim().is_empty() {
        return Err(ComputationError::invalid(
            "Expression part cannot be empty for substitution.",
        ));
    }
    let poly = parse_polynomial(expression, cancel)?;
    let values = parse_assignments(assignments, cancel)?;
    if values.is_empty() && !poly.variables().is_empty() {
        return Err(ComputationError::invalid(
            "Expression has variables but no values provided for substitution. \
             Format: expr; var1=val1, var2=val2",
        ));
    }
    let result = poly.substitute(&values);
    Ok(match result.constant_value() {
        Some(value) if value.is_integer() => value.numer().to_string(),
        Some(value) => format!("{} ≈ {}", rational(&value), fixed(rational_to_f64(&value), 6)),
        None => result.to_string(),
    })
}

fn run(input: &str, mode: Mode, cancel: &CancellationToken) -> Result<String, ComputationError> {
    match mode {
        // Exact quotients cancel while expanding, so the canonical form is
        // already the simplified one.
        Mode::Expand | Mode::Simplify => Ok(parse_polynomial(input, cancel)?.to_string()),
        Mode::Factor => Ok(factor(&parse_polynomial(input, cancel)?, cancel)?.to_string()),
        Mode::Substitute => substitute(input, cancel),
    }
}

impl ComputationProvider for AlgebraProvider {
    fn name(&self) -> &str {
        "proj"
    }

    fn call_main(
        &self,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let (input, mode) = match args {
            [input] => (*input, DEFAULT_ALGEBRA_MODE),
            [input, mode] => (*input, *mode),
            [] => {
                return Err(ComputationError::invalid(
                    "main() missing required argument: 'argument_string'",
                ))
            }
            _ => {
                return Err(ComputationError::invalid(format!(
                    "main() takes from 1 to 2 arguments ({} given)",
                    args.len()
                )))
            }
        };
        cancel.check_cancelled()?;
        let mode = Mode::parse(mode)?;
        tracing::debug!(?mode, "algebra workspace");
        run(input, mode, cancel)
    }
}

impl ComputationProvider for ActivityEntry {
    fn name(&self) -> &str {
        "PROJ_ACTIVITY"
    }

    fn has_main(&self) -> bool {
        false
    }

    fn call_main(
        &self,
        _args: &[&str],
        _cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        Err(ComputationError::Unsupported(
            "PROJ_ACTIVITY has no computation entry point".into(),
        ))
    }
}
