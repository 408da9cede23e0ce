//! Fraction-free polynomial long division.
//!
//! The dividend is scaled by `lcm(lc(d), lc(n)) / lc(n)` so the leading
//! term divides evenly, divided over ℚ, and the remainder's denominators
//! are cleared again.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;

use crate::algebra::{parse, Dialect, Polynomial, UniPoly};
use crate::arith::denominator_lcm;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct PolyDivSolver;

const USAGE: &str = "Invalid input format. Use: <numerator>, <denominator>";

#[derive(Debug)]
struct Step {
    multiplier: BigInt,
    scaled: UniPoly,
    quotient: UniPoly,
    remainder: UniPoly,
}

fn leading_integer(p: &UniPoly) -> BigInt {
    p.leading().map(BigRational::to_integer).unwrap_or_default()
}

fn division_chain(
    dividend: &UniPoly,
    divisor: &UniPoly,
    cancel: &CancellationToken,
) -> Result<Vec<Step>, ComputationError> {
    let mut steps = Vec::new();
    let Some(d_deg) = divisor.degree() else {
        return Ok(steps);
    };
    let mut current = dividend.clone();
    while current.degree().is_some_and(|n| n >= d_deg) {
        cancel.check_cancelled()?;
        let lc1 = leading_integer(&current);
        let lc2 = leading_integer(divisor);
        let multiplier = lc2.lcm(&lc1).div_floor(&lc1);
        let scaled = current.scale(&BigRational::from_integer(multiplier.clone()));
        let (quotient, remainder) = scaled
            .div_rem(divisor)
            .ok_or_else(|| ComputationError::Undefined("Division by zero polynomial.".into()))?;
        let remainder =
            remainder.scale(&BigRational::from_integer(denominator_lcm(remainder.coeffs())));
        current = remainder.clone();
        steps.push(Step {
            multiplier,
            scaled,
            quotient,
            remainder,
        });
    }
    Ok(steps)
}

fn parse_integral(
    text: &str,
    cancel: &CancellationToken,
) -> Result<Polynomial, ComputationError> {
    let poly = Polynomial::from_expr(&parse(text, Dialect::Polynomial)?, cancel)?;
    if poly.coefficients().any(|c| !c.is_integer()) {
        return Err(ComputationError::Unsupported(
            "Polynomial coefficients must be integers.".into(),
        ));
    }
    Ok(poly)
}

impl Solver for PolyDivSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let (num_text, den_text) = input
            .and_then(|s| s.split_once(','))
            .ok_or_else(|| ComputationError::invalid(USAGE))?;
        let numerator = parse_integral(num_text.trim(), cancel)?;
        let denominator = parse_integral(den_text.trim(), cancel)?;

        let vars = &numerator.variables() | &denominator.variables();
        let var = match vars.len() {
            0 => {
                return Err(ComputationError::invalid(
                    "No variables found in expressions.",
                ))
            }
            1 => vars.into_iter().next().unwrap_or_default(),
            _ => {
                return Err(ComputationError::Unsupported(
                    "Only univariate polynomials are supported.".into(),
                ))
            }
        };
        let (Some(f1), Some(f2)) = (numerator.to_univariate(&var), denominator.to_univariate(&var))
        else {
            return Err(ComputationError::invalid(USAGE));
        };
        if f2.is_zero() {
            return Err(ComputationError::Undefined(
                "Division by zero polynomial.".into(),
            ));
        }

        let show = |p: &UniPoly| p.display(&var);
        let mut lines = vec![
            "=== Polynomial Long Division ===".to_string(),
            String::new(),
            "Performing polynomial long division:".into(),
            format!("Numerator: {}", show(&f1)),
            format!("Denominator: {}", show(&f2)),
        ];

        let steps = division_chain(&f1, &f2, cancel)?;
        let Some(last) = steps.last() else {
            lines.push(String::new());
            lines.push(
                "No division steps to show: the numerator's degree is below the denominator's."
                    .into(),
            );
            lines.push("Quotient: 0".into());
            lines.push(format!("Remainder: {}", show(&f1)));
            return Ok(lines.join("\n"));
        };

        lines.push(String::new());
        lines.push("--- Division Steps ---".into());
        for (i, step) in steps.iter().enumerate() {
            lines.push(format!("Step {}:", i + 1));
            lines.push(format!("  Multiplier used: {}", step.multiplier));
            lines.push(format!("  Scaled dividend: {}", show(&step.scaled)));
            lines.push(format!("  Quotient at this step: {}", show(&step.quotient)));
            lines.push(format!("  Remainder: {}", show(&step.remainder)));
            lines.push(String::new());
        }
        lines.push("--- Final Result ---".into());
        lines.push(format!("  Scaled dividend: {}", show(&last.scaled)));
        lines.push(format!("  Quotient: {}", show(&last.quotient)));
        lines.push(format!("  Remainder: {}", show(&last.remainder)));
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "Poly_long_div"
    }
}
