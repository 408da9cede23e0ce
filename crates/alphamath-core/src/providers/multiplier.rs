//! Smallest multiplier making `n·c` divisible by `d`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct MultiplierSolver;

impl Solver for MultiplierSolver {
    fn solve(
        &self,
        input: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let input = input.ok_or_else(|| ComputationError::invalid("No input provided."))?;
        let parts: Vec<&str> = input.split_whitespace().collect();
        let [n, d] = parts.as_slice() else {
            return Err(ComputationError::invalid(
                "Please provide two numbers separated by space.",
            ));
        };
        let (Ok(n), Ok(d)) = (n.parse::<BigInt>(), d.parse::<BigInt>()) else {
            return Err(ComputationError::invalid(
                "Invalid input. Please enter two integers separated by space.",
            ));
        };
        if d.is_zero() {
            return Err(ComputationError::Undefined("Cannot divide by zero.".into()));
        }

        let mut lines = vec![format!(
            "Finding smallest multiplier so that {n} × multiplier is divisible by {d}:"
        )];
        if (&n % &d).is_zero() {
            lines.push(format!("{n} is already divisible by {d}."));
            lines.push(format!("No multiplier needed. {n} / {d} = {}", n.div_floor(&d)));
            return Ok(lines.join("\n"));
        }

        let c = &d / n.gcd(&d);
        let product = &n * &c;
        lines.push(format!("Multiply {n} by {c} to make it divisible by {d}"));
        lines.push(format!("{n} × {c} = {product}"));
        lines.push(format!("{product} / {d} = {}", &product / &d));
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "multiplier"
    }
}
