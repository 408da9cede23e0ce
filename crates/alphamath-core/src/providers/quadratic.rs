//! Quadratic equations solved with Sridharacharya's formula.

use num_bigint::BigInt;
use num_rational::BigRational;

use super::parse_single_variable;
use crate::algebra::format::rational;
use crate::algebra::{solve_quadratic, QuadraticRoots};
use crate::arith::denominator_lcm;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct QuadraticSolver;

const NOT_QUADRATIC: &str = "Not a quadratic equation. Coefficient 'a' must not be zero.";

impl Solver for QuadraticSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let input = input.ok_or_else(|| {
            ComputationError::invalid("Invalid input. Could not parse the equation: no equation given")
        })?;
        let (var, poly) = parse_single_variable(input, cancel)?;
        let Some(var) = var else {
            return Err(ComputationError::invalid(NOT_QUADRATIC));
        };
        match poly.degree() {
            Some(2) => {}
            Some(d) if d > 2 => {
                return Err(ComputationError::Unsupported(format!(
                    "The equation is degree {d}, not a quadratic."
                )))
            }
            _ => return Err(ComputationError::invalid(NOT_QUADRATIC)),
        }

        let scale = BigRational::from_integer(denominator_lcm(poly.coeffs()));
        let [c, b, a]: [BigInt; 3] = [0, 1, 2].map(|i| (&poly.coeffs()[i] * &scale).to_integer());
        let solution = solve_quadratic(&a, &b, &c)?;
        let d = &solution.discriminant;
        let (coeff, inner) = (solution.sqrt_coeff, solution.sqrt_inner);

        let mut lines = vec![
            format!("Given quadratic equation: {a}{var}² + ({b}){var} + ({c}) = 0"),
            String::new(),
            "Using Sridharacharya's formula:".into(),
            format!("{var} = (-b ± √(b² - 4ac)) / 2a"),
            String::new(),
            format!("Step 1: Discriminant D = ({b})² - 4×({a})×({c}) = {d}"),
        ];

        match &solution.roots {
            QuadraticRoots::Complex { exact, .. } => {
                let radical = if inner == 1 {
                    format!("{coeff}i")
                } else {
                    format!("{coeff}√{inner}i (simplified)")
                };
                lines.push(format!("Step 2: √D = √({d}) = {radical}"));
                lines.push(String::new());
                lines.push("Roots in simplified radical form (complex):".into());
                lines.extend(exact.iter().map(|root| format!("{var} = {root}")));
            }
            QuadraticRoots::Double(root) => {
                lines.push(format!("Step 2: √D = √{d} = 0"));
                lines.push(String::new());
                lines.push("Only one root:".into());
                lines.push(format!("{var} = {}", rational(root)));
            }
            QuadraticRoots::Real(pair) => {
                lines.push(if inner == 1 {
                    format!("Step 2: √D = √{d} = {coeff}")
                } else {
                    format!("Step 2: √D = √{d} = {coeff}√{inner} (simplified)")
                });
                lines.push(String::new());
                lines.push("Roots in simplified radical form:".into());
                lines.extend(pair.iter().map(|(text, _)| format!("{var} = {text}")));
                lines.push(String::new());
                lines.push("Approximate decimal values (rounded to 4 decimal places):".into());
                lines.extend(pair.iter().map(|(_, value)| format!("{var} ≈ {value:.4}")));
            }
        }
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "Quad"
    }
}
