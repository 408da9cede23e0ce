//! Sturm sequences: count distinct real roots between evaluation points.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::parse_single_variable;
use crate::algebra::format::{rational, sign_glyph};
use crate::algebra::UniPoly;
use crate::arith::parse_rational;
use crate::constants::DEFAULT_STURM_POINTS;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct SturmSolver;

const TITLE: &str = "=== Sturm's Theorem Evaluation ===";

/// `lcm(|lc(divisor)|, |lc(dividend)|) / |lc(dividend)|`.
fn leading_multiplier(dividend: &UniPoly, divisor: &UniPoly) -> BigInt {
    let lead = |p: &UniPoly| p.leading().map(|c| c.numer().abs()).unwrap_or_default();
    let (lc1, lc2) = (lead(dividend), lead(divisor));
    if lc1.is_zero() || lc2.is_zero() {
        return BigInt::from(1);
    }
    lc2.lcm(&lc1) / lc1
}

/// `f, f', -rem(f, f'), …` with every member kept integral.
fn sturm_sequence(
    f: &UniPoly,
    cancel: &CancellationToken,
) -> Result<Vec<UniPoly>, ComputationError> {
    let f0 = f.clear_denominators();
    let f1 = f0.derivative();
    let mut sequence = vec![f0, f1];
    loop {
        cancel.check_cancelled()?;
        let [.., dividend, divisor] = sequence.as_slice() else {
            break;
        };
        if divisor.is_zero() {
            break;
        }
        let multiplier = BigRational::from_integer(leading_multiplier(dividend, divisor));
        let Some((_, remainder)) = dividend.scale(&multiplier).div_rem(divisor) else {
            break;
        };
        let next = -&remainder.clear_denominators();
        if next.is_zero() {
            break;
        }
        sequence.push(next);
    }
    Ok(sequence)
}

/// Sign changes in a column, ignoring zeros.
fn sign_changes(signs: &[&str]) -> usize {
    let nonzero: Vec<&&str> = signs.iter().filter(|s| **s != "0").collect();
    nonzero.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Sign of `p` as `x → +∞` (or `-∞`).
fn sign_at_infinity(p: &UniPoly, negative: bool) -> &'static str {
    let Some(lead) = p.leading() else {
        return "0";
    };
    let odd = p.degree().is_some_and(|d| d % 2 == 1);
    match (lead.is_positive(), negative && odd) {
        (true, false) | (false, true) => "+",
        _ => "-",
    }
}

fn parse_points(parts: &[&str]) -> Result<Vec<BigRational>, ComputationError> {
    if parts.is_empty() {
        return Ok(DEFAULT_STURM_POINTS
            .iter()
            .map(|&p| BigRational::from_integer(p.into()))
            .collect());
    }
    parts
        .iter()
        .map(|p| {
            parse_rational(p)
                .ok_or_else(|| ComputationError::invalid(format!("Invalid evaluation point '{p}'.")))
        })
        .collect()
}

impl Solver for SturmSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(format!(
                "{TITLE}\nNo input provided. Expected format: polynomial, x1, x2, ..."
            ));
        };
        let parts: Vec<&str> = input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let Some((expression, point_parts)) = parts.split_first() else {
            return Err(ComputationError::invalid("Input too short."));
        };
        let (var, f) = parse_single_variable(expression, cancel)?;
        if f.degree().unwrap_or(0) == 0 {
            return Err(ComputationError::invalid(
                "Sturm's theorem requires a non-constant polynomial.",
            ));
        }
        let var = var.as_deref().unwrap_or("x");
        let points = parse_points(point_parts)?;
        let sequence = sturm_sequence(&f, cancel)?;
        tracing::debug!(length = sequence.len(), "sturm sequence built");

        let labels: Vec<String> = points.iter().map(rational).collect();
        let mut lines = vec![
            TITLE.to_string(),
            format!("Parsed polynomial: f({var}) = {}", f.display(var)),
            format!("Derivative: f'({var}) = {}", f.derivative().display(var)),
            format!("Using evaluation points: [{}]", labels.join(", ")),
            "--- Final Sturm Sequence ---".into(),
        ];
        lines.extend(
            sequence
                .iter()
                .enumerate()
                .map(|(i, p)| format!("f{i}({var}) = {}", p.display(var))),
        );

        let table: Vec<Vec<&str>> = sequence
            .iter()
            .map(|p| points.iter().map(|x| sign_glyph(&p.eval(x))).collect())
            .collect();
        let changes: Vec<usize> = (0..points.len())
            .map(|col| sign_changes(&table.iter().map(|row| row[col]).collect::<Vec<_>>()))
            .collect();

        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(3) + 2;
        let row = |label: String, cells: Vec<String>| {
            let cells: Vec<String> = cells.iter().map(|c| format!("{c:^width$} |")).collect();
            format!("{label:<6}| {}", cells.join(" "))
        };
        let header = row(var.to_string(), labels.clone());
        let rule = "-".repeat(header.chars().count());
        lines.push(String::new());
        lines.push(header);
        lines.push(rule.clone());
        for (i, signs) in table.iter().enumerate() {
            lines.push(row(
                format!("f{i}({var})"),
                signs.iter().map(ToString::to_string).collect(),
            ));
        }
        lines.push(rule);
        lines.push(row(
            format!("V({var})"),
            changes.iter().map(ToString::to_string).collect(),
        ));

        lines.push(String::new());
        lines.push("=== Intervals Containing Roots ===".into());
        let intervals: Vec<String> = changes
            .windows(2)
            .zip(labels.windows(2))
            .filter(|(v, _)| v[0] != v[1])
            .map(|(v, x)| {
                let count = v[0].abs_diff(v[1]);
                let plural = if count > 1 { "s" } else { "" };
                format!(" - {count} real root{plural} in interval ({}, {})", x[0], x[1])
            })
            .collect();
        if intervals.is_empty() {
            lines.push(" - No real roots detected in the evaluated range.".into());
        } else {
            lines.extend(intervals);
        }

        let at = |negative: bool| {
            let signs: Vec<&str> = sequence.iter().map(|p| sign_at_infinity(p, negative)).collect();
            sign_changes(&signs)
        };
        lines.push(String::new());
        lines.push(format!(
            "Total distinct real roots: {}",
            at(true).saturating_sub(at(false))
        ));
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "sturm_final"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: Option<&str>) -> Result<String, ComputationError> {
        SturmSolver.solve(input, &CancellationToken::new())
    }

    #[test]
    fn no_argument_returns_usage() {
        let out = run(None).unwrap();
        assert_eq!(
            out,
            "=== Sturm's Theorem Evaluation ===\nNo input provided. Expected format: polynomial, x1, x2, ..."
        );
        assert_eq!(run(Some("   ")).unwrap(), out);
    }

    #[test]
    fn sequence_for_difference_of_squares() {
        let seq = sturm_sequence(&UniPoly::from_integers(&[-1, 0, 1]), &CancellationToken::new())
            .unwrap();
        assert_eq!(
            seq,
            vec![
                UniPoly::from_integers(&[-1, 0, 1]),
                UniPoly::from_integers(&[0, 2]),
                UniPoly::from_integers(&[2]),
            ]
        );
    }

    #[test]
    fn default_points_locate_roots() {
        let out = run(Some("x^2 - 1")).unwrap();
        assert!(out.contains("Parsed polynomial: f(x) = x² - 1"));
        assert!(out.contains("Derivative: f'(x) = 2x"));
        assert!(out.contains("Using evaluation points: [-4, -3, -2, -1, 0, 1, 2, 3, 4]"));
        assert!(out.contains("f2(x) = 2"));
        assert!(out.contains(" - 1 real root in interval (-2, -1)"));
        assert!(out.contains(" - 1 real root in interval (0, 1)"));
        assert!(out.ends_with("Total distinct real roots: 2"));
    }

    #[test]
    fn sign_table_layout() {
        let out = run(Some("x^2 - 1, -2, 2")).unwrap();
        assert!(out.contains("x     |  -2   |   2   |"));
        assert!(out.contains("f0(x) |   +   |   +   |"));
        assert!(out.contains("f1(x) |   -   |   +   |"));
        assert!(out.contains("V(x)  |   2   |   0   |"));
        assert!(out.contains(" - 2 real roots in interval (-2, 2)"));
    }

    #[test]
    fn no_real_roots() {
        let out = run(Some("x^2 + 1")).unwrap();
        assert!(out.contains(" - No real roots detected in the evaluated range."));
        assert!(out.ends_with("Total distinct real roots: 0"));
    }

    #[test]
    fn fractional_points_and_repeated_roots() {
        let out = run(Some("(x - 1)^2 (x + 2), 1/2, 3/2")).unwrap();
        assert!(out.contains("Using evaluation points: [1/2, 3/2]"));
        assert!(out.contains(" - 1 real root in interval (1/2, 3/2)"));
        assert!(out.ends_with("Total distinct real roots: 2"));
    }

    #[test]
    fn errors() {
        assert!(run(Some("5")).is_err());
        assert!(run(Some("x^2 - 1, a")).unwrap_err().to_string().contains("'a'"));
        assert!(run(Some("x + y")).is_err());
    }

    #[test]
    fn cancellation_is_observed() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(
            SturmSolver.solve(Some("x^3 - x"), &cancel),
            Err(ComputationError::Cancelled)
        );
    }
}
