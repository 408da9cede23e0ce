//! Chinese remainder theorem for pairwise co-prime moduli.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::arith::{extended_gcd, parse_integer_list};
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

/// Solves `x ≡ aᵢ (mod mᵢ)` for every pair in the input.
pub struct CrtSolver;

/// Smallest `x` with `a·x ≡ b (mod m)`, if one exists.
fn solve_linear(a: &BigInt, b: &BigInt, m: &BigInt) -> Option<BigInt> {
    let (d, p, _) = extended_gcd(a, m);
    if !b.mod_floor(&d).is_zero() {
        return None;
    }
    Some((b * p).div_floor(&d).mod_floor(m))
}

impl Solver for CrtSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let input = input.ok_or_else(|| {
            ComputationError::invalid("No input provided. Format: a1 m1 a2 m2 ... an mn")
        })?;
        let values = parse_integer_list(input)?;
        if values.len() % 2 != 0 {
            return Err(ComputationError::invalid(
                "Invalid input. Expected pairs of 'a m' values.",
            ));
        }
        if values.is_empty() {
            return Err(ComputationError::invalid(
                "At least one congruence 'a m' is required.",
            ));
        }
        let pairs: Vec<(BigInt, BigInt)> = values
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();
        if pairs.iter().any(|(_, m)| m.is_zero()) {
            return Err(ComputationError::invalid("Modulus 'm' cannot be zero."));
        }
        for (i, (_, mi)) in pairs.iter().enumerate() {
            for (_, mj) in &pairs[i + 1..] {
                if !mi.gcd(mj).is_one() {
                    return Err(ComputationError::Unsupported(
                        "Moduli are not pairwise co-prime. CRT may not be applicable".into(),
                    ));
                }
            }
        }

        let mut lines = vec![
            "Chinese Remainder Theorem Solver".to_string(),
            "for the system: x ≡ a1 (mod m1), x ≡ a2 (mod m2), ..., x ≡ an (mod mn),".into(),
            String::new(),
        ];
        lines.extend(pairs.iter().map(|(a, m)| format!("x ≡ {a} (mod {m})")));

        let big_m = pairs.iter().fold(BigInt::one(), |acc, (_, m)| acc * m);
        lines.push(String::new());
        lines.push(format!("M = m1 * m2 * ... * mn = {big_m}"));
        lines.push(String::new());
        lines.push("Solving the required congruences:".into());

        let partials: Vec<BigInt> = pairs.iter().map(|(_, m)| &big_m / m).collect();
        for (i, ((_, m), partial)) in pairs.iter().zip(&partials).enumerate() {
            lines.push(format!(
                "(M/m{n})*x ≡ 1 mod m{n}: {partial}*x ≡ 1 mod {m}",
                n = i + 1
            ));
        }

        let mut inverses = Vec::with_capacity(pairs.len());
        for ((_, m), partial) in pairs.iter().zip(&partials) {
            cancel.check_cancelled()?;
            let Some(b) = solve_linear(partial, &BigInt::one(), m) else {
                lines.push(format!("No solution exists for {partial}*x ≡ 1 mod {m}"));
                return Ok(lines.join("\n"));
            };
            lines.push(format!("Solution: x ≡ {b} mod {m}"));
            inverses.push(b);
        }

        let x0: BigInt = pairs
            .iter()
            .zip(&partials)
            .zip(&inverses)
            .map(|(((a, _), partial), b)| a * partial * b)
            .sum();
        let x = x0.mod_floor(&big_m);
        let expression = (1..=pairs.len())
            .map(|i| format!("a{i}*(M/m{i})*b{i}"))
            .collect::<Vec<_>>()
            .join(" + ");

        lines.push(String::new());
        lines.push("Calculating x0:".into());
        lines.push(format!("x0 = {expression}"));
        lines.push(format!("x0 = {x0}"));
        lines.push(String::new());
        lines.push(format!("x ≡ {x0} mod {big_m}"));
        lines.push(String::new());
        lines.push(format!("Final solution: x ≡ {x} mod {big_m}"));
        lines.push(String::new());
        lines.push(format!("The smallest positive solution is: {x}"));
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "CRT"
    }
}
