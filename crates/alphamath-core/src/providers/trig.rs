//! Trigonometric expression calculator.
//!
//! Results close to common exact values are shown symbolically; results of
//! expressions with inverse functions are shown as multiples of π.

use std::f64::consts::{PI, SQRT_2};

use crate::algebra::format::fixed;
use crate::algebra::{parse, Dialect, EvalError};
use crate::constants::DEFAULT_TRIG_EXPRESSION;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct TrigCalculator;

const TOLERANCE: f64 = 1e-6;

/// Multiples of π recognised by name.
const PI_MULTIPLES: [(f64, &str); 16] = [
    (1.0 / 6.0, "π/6"),
    (1.0 / 4.0, "π/4"),
    (1.0 / 3.0, "π/3"),
    (1.0 / 2.0, "π/2"),
    (2.0 / 3.0, "2π/3"),
    (3.0 / 4.0, "3π/4"),
    (5.0 / 6.0, "5π/6"),
    (1.0, "π"),
    (7.0 / 6.0, "7π/6"),
    (5.0 / 4.0, "5π/4"),
    (4.0 / 3.0, "4π/3"),
    (3.0 / 2.0, "3π/2"),
    (5.0 / 3.0, "5π/3"),
    (7.0 / 4.0, "7π/4"),
    (11.0 / 6.0, "11π/6"),
    (2.0, "2π"),
];

fn known_values() -> [(f64, &'static str); 10] {
    let sqrt3 = 3f64.sqrt();
    [
        (sqrt3 / 2.0, "√3/2"),
        (SQRT_2 / 2.0, "√2/2"),
        (sqrt3 / 3.0, "√3/3"),
        (0.5, "1/2"),
        (1.0, "1"),
        (sqrt3, "√3"),
        (SQRT_2, "√2"),
        (5f64.sqrt(), "√5"),
        (6f64.sqrt(), "√6"),
        (7f64.sqrt(), "√7"),
    ]
}

/// `x` as a multiple of π: named fraction, else the closest fraction with denominator ≤ 12.
fn as_pi_multiple(x: f64) -> String {
    if x.abs() < TOLERANCE {
        return "0".into();
    }
    let coeff = x / PI;
    let sign = if coeff < 0.0 { "-" } else { "" };
    let magnitude = coeff.abs();
    if let Some((_, label)) = PI_MULTIPLES
        .iter()
        .find(|(v, _)| (magnitude - v).abs() < TOLERANCE)
    {
        return format!("{sign}{label}");
    }
    let (numer, denom) = (1..=12_u32)
        .map(|d| ((magnitude * f64::from(d)).round(), d))
        .min_by(|a, b| {
            let err = |(n, d): (f64, u32)| (magnitude - n / f64::from(d)).abs();
            err(*a).total_cmp(&err(*b))
        })
        .unwrap_or((magnitude.round(), 1));
    match (numer, denom) {
        (n, _) if n == 0.0 => "0".into(),
        (n, 1) => format!("{sign}{n}π"),
        (n, d) => format!("{sign}{n}π/{d}"),
    }
}

fn as_known_value(x: f64) -> String {
    if x.abs() < TOLERANCE {
        return "0".into();
    }
    let sign = if x < 0.0 { "-" } else { "" };
    known_values()
        .iter()
        .find(|(v, _)| (x.abs() - v).abs() < TOLERANCE)
        .map_or_else(|| fixed(x, 6), |(_, label)| format!("{sign}{label}"))
}

impl Solver for TrigCalculator {
    fn solve(
        &self,
        input: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let text = match input.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_TRIG_EXPRESSION,
        };
        let expr = parse(text, Dialect::Trigonometric)
            .map_err(|_| ComputationError::invalid("Invalid mathematical expression"))?;
        let value = expr.eval().map_err(|err| match err {
            EvalError::DivisionByZero => {
                ComputationError::Undefined("Result: undefined (division by zero)".into())
            }
            EvalError::Domain => {
                ComputationError::Undefined("Result: undefined (math domain error)".into())
            }
            EvalError::UnknownVariable(_) => {
                ComputationError::invalid("Invalid mathematical expression")
            }
        })?;
        if !value.is_finite() {
            return Err(ComputationError::Undefined(
                "Result: undefined (overflow)".into(),
            ));
        }
        let shown = if expr.contains_inverse_trig() {
            as_pi_multiple(value)
        } else {
            as_known_value(value)
        };
        Ok(format!("Evaluating: {text}\nResult: {shown}"))
    }

    fn name(&self) -> &'static str {
        "trig_calc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(input: &str) -> String {
        let out = TrigCalculator
            .solve(Some(input), &CancellationToken::new())
            .unwrap();
        out.lines()
            .last()
            .and_then(|l| l.strip_prefix("Result: "))
            .unwrap()
            .to_string()
    }

    #[test]
    fn default_expression() {
        let out = TrigCalculator
            .solve(None, &CancellationToken::new())
            .unwrap();
        assert_eq!(out, "Evaluating: sin(4pi) + cos(pi/3)\nResult: 1/2");
        let out = TrigCalculator
            .solve(Some("  "), &CancellationToken::new())
            .unwrap();
        assert!(out.ends_with("Result: 1/2"));
    }

    #[test]
    fn known_values() {
        assert_eq!(result("sin(pi/3)"), "√3/2");
        assert_eq!(result("cos(π/4)"), "√2/2");
        assert_eq!(result("-sin(pi/6)"), "-1/2");
        assert_eq!(result("tan(pi/3)"), "√3");
        assert_eq!(result("sin^2(pi/4) + cos^2(pi/4)"), "1");
        assert_eq!(result("sin(pi)"), "0");
    }

    #[test]
    fn decimal_fallback() {
        assert_eq!(result("sin(1)"), "0.841471");
        assert_eq!(result("2e"), "5.436564");
    }

    #[test]
    fn inverse_functions_as_pi_multiples() {
        assert_eq!(result("asin(1)"), "π/2");
        assert_eq!(result("acos(-1/2)"), "2π/3");
        assert_eq!(result("atan(-1)"), "-π/4");
        assert_eq!(result("acot(1)"), "π/4");
        assert_eq!(result("asin(0)"), "0");
    }

    #[test]
    fn approximate_pi_fraction() {
        // 3π/8 is not named; closest denominator ≤ 12 is 3/8.
        assert_eq!(result("asin(sin(3pi/8))"), "3π/8");
    }

    #[test]
    fn errors() {
        let cancel = CancellationToken::new();
        assert_eq!(
            TrigCalculator.solve(Some("1/0"), &cancel),
            Err(ComputationError::Undefined(
                "Result: undefined (division by zero)".into()
            ))
        );
        assert!(matches!(
            TrigCalculator.solve(Some("csc(0)"), &cancel),
            Err(ComputationError::Undefined(_))
        ));
        assert!(matches!(
            TrigCalculator.solve(Some("asin(2)"), &cancel),
            Err(ComputationError::Undefined(_))
        ));
        assert_eq!(
            TrigCalculator.solve(Some("foo(1)"), &cancel),
            Err(ComputationError::invalid("Invalid mathematical expression"))
        );
        assert!(TrigCalculator.solve(Some("sin("), &cancel).is_err());
    }
}
