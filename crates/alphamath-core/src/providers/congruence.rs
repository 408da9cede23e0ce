//! Linear congruence `ax ≡ b (mod m)`.

use std::fmt::Write;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::arith::{extended_gcd, parse_integers};
use crate::constants::MAX_LISTED_SOLUTIONS;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

/// Solves a single linear congruence and lists every solution modulo `m`.
pub struct CongruenceSolver;

impl Solver for CongruenceSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let input = input.ok_or_else(|| ComputationError::invalid("No input provided. Format: a b m"))?;
        let [a, b, m] = parse_integers::<3>(input, "Invalid input. Please enter: a b m")?;
        if m.is_zero() {
            return Err(ComputationError::invalid("Modulus 'm' cannot be zero."));
        }

        let mut out = String::new();
        let _ = writeln!(out, "Solving linear congruence: {a}x ≡ {b} (mod {m})");
        let (d, p, q) = extended_gcd(&a, &m);
        let _ = writeln!(out, "GCD({a}, {m}) = {d}");
        let _ = writeln!(out, "Coefficients: p = {p}, q = {q}");
        let _ = writeln!(out, "Verification: {a} * {p} + {m} * {q} = {}", &a * &p + &m * &q);

        if !b.mod_floor(&d).is_zero() {
            out.push_str("No solution exists since b is not divisible by GCD(a, m)\n");
            return Ok(out);
        }

        let x0 = (&b * &p).div_floor(&d).mod_floor(&m);
        let _ = writeln!(out, "x(0) = {x0}");
        out.push_str("All solutions:\n");

        let count = if d > BigInt::zero() { d.clone() } else { BigInt::zero() };
        let listed = count.to_usize().map_or(MAX_LISTED_SOLUTIONS, |c| c.min(MAX_LISTED_SOLUTIONS));
        for j in 0..listed {
            cancel.check_cancelled()?;
            let xj = (&x0 + (&m * BigInt::from(j)).div_floor(&d)).mod_floor(&m);
            let _ = writeln!(out, "x({j}) = {xj} (mod {m})");
        }
        if count > BigInt::from(listed) {
            let _ = writeln!(out, "... {} more solutions omitted", count - listed);
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "congruence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> Result<String, ComputationError> {
        CongruenceSolver.solve(Some(input), &CancellationToken::new())
    }

    #[test]
    fn unique_solution() {
        let out = run("3 5 7").unwrap();
        assert!(out.starts_with("Solving linear congruence: 3x ≡ 5 (mod 7)\n"));
        assert!(out.contains("GCD(3, 7) = 1"));
        assert!(out.contains("Coefficients: p = -2, q = 1"));
        assert!(out.contains("Verification: 3 * -2 + 7 * 1 = 1"));
        // 3·4 = 12 ≡ 5 (mod 7)
        assert!(out.contains("x(0) = 4\n"));
        assert!(out.contains("x(0) = 4 (mod 7)"));
    }

    #[test]
    fn several_solutions() {
        let out = run("6 9 15").unwrap();
        assert!(out.contains("GCD(6, 15) = 3"));
        assert_eq!(out.matches("(mod 15)\n").count(), 4);
        for x in ["x(0) = 9 (mod 15)", "x(1) = 14 (mod 15)", "x(2) = 4 (mod 15)"] {
            assert!(out.contains(x), "{out}");
        }
    }

    #[test]
    fn no_solution() {
        let out = run("2 3 4").unwrap();
        assert!(out.contains("No solution exists"));
        assert!(!out.contains("All solutions"));
    }

    #[test]
    fn listing_is_capped() {
        let out = run("0 0 5000").unwrap();
        assert!(out.contains(&format!("x({}) =", MAX_LISTED_SOLUTIONS - 1)));
        assert!(out.contains("... 4000 more solutions omitted"));
    }

    #[test]
    fn input_errors() {
        assert_eq!(
            run("1 2"),
            Err(ComputationError::invalid("Invalid input. Please enter: a b m"))
        );
        assert_eq!(
            run("1 2 0"),
            Err(ComputationError::invalid("Modulus 'm' cannot be zero."))
        );
        assert!(run("a b c").is_err());
        assert!(CongruenceSolver
            .solve(None, &CancellationToken::new())
            .is_err());
    }
}
