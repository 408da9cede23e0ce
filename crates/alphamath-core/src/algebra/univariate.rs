//! Dense univariate polynomials over ℚ.

use std::ops::{Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::poly::Polynomial;
use crate::arith::{denominator_lcm, divisors, rational_to_f64};
use crate::constants::{MAX_ROOT_CANDIDATES, MAX_ROOT_SEARCH};
use crate::progress::CancellationToken;
use crate::provider::ComputationError;

/// Coefficients in ascending order of degree, without trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniPoly {
    coeffs: Vec<BigRational>,
}

impl UniPoly {
    #[must_use]
    pub fn new(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Build from integer coefficients, lowest degree first.
    #[must_use]
    pub fn from_integers(coeffs: &[i64]) -> Self {
        Self::new(
            coeffs
                .iter()
                .map(|&c| BigRational::from_integer(BigInt::from(c)))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    #[must_use]
    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    #[must_use]
    pub fn leading(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    #[must_use]
    pub fn scale(&self, factor: &BigRational) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    /// Quotient and remainder over ℚ; `None` when dividing by zero.
    #[must_use]
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let d_deg = divisor.degree()?;
        let d_lead = divisor.leading()?;
        let mut rem = self.coeffs.clone();
        let Some(n_deg) = self.degree().filter(|&n| n >= d_deg) else {
            return Some((Self::default(), self.clone()));
        };
        let mut quot = vec![BigRational::zero(); n_deg - d_deg + 1];
        for shift in (0..=n_deg - d_deg).rev() {
            let factor = &rem[shift + d_deg] / d_lead;
            if !factor.is_zero() {
                for (i, c) in divisor.coeffs.iter().enumerate() {
                    rem[shift + i] -= &factor * c;
                }
            }
            quot[shift] = factor;
        }
        Some((Self::new(quot), Self::new(rem)))
    }

    #[must_use]
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * BigRational::from_integer(BigInt::from(i)))
                .collect(),
        )
    }

    /// Exact evaluation (Horner).
    #[must_use]
    pub fn eval(&self, x: &BigRational) -> BigRational {
        self.coeffs
            .iter()
            .rev()
            .fold(BigRational::zero(), |acc, c| acc * x + c)
    }

    #[must_use]
    pub fn eval_f64(&self, x: f64) -> f64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + rational_to_f64(c))
    }

    /// Every coefficient is an integer.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.coeffs.iter().all(BigRational::is_integer)
    }

    /// Scale by the least common denominator so every coefficient is an integer.
    #[must_use]
    pub fn clear_denominators(&self) -> Self {
        self.scale(&BigRational::from_integer(denominator_lcm(&self.coeffs)))
    }

    /// Integer coefficients with unit content and a positive leading coefficient.
    #[must_use]
    pub fn primitive(&self) -> Self {
        let integral = self.clear_denominators();
        let mut content = integral
            .coeffs
            .iter()
            .fold(BigInt::zero(), |acc, c| acc.gcd(c.numer()));
        if content.is_zero() {
            return Self::default();
        }
        if integral.leading().is_some_and(Signed::is_negative) {
            content = -content;
        }
        integral.scale(&BigRational::from_integer(content).recip())
    }

    /// Divide by `(x - root)`, discarding the remainder.
    #[must_use]
    pub fn deflate(&self, root: &BigRational) -> Self {
        let divisor = Self::new(vec![-root.clone(), BigRational::from_integer(BigInt::from(1))]);
        self.div_rem(&divisor).map(|(q, _)| q).unwrap_or_default()
    }

    /// Distinct rational roots in ascending order (rational root theorem).
    ///
    /// Candidates are only enumerated while the constant and leading
    /// coefficients stay small enough; larger inputs may return a partial list.
    pub fn rational_roots(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<BigRational>, ComputationError> {
        let prim = self.primitive();
        let mut roots = Vec::new();
        let zeros = prim.coeffs.iter().take_while(|c| c.is_zero()).count();
        if zeros > 0 {
            roots.push(BigRational::zero());
        }
        let reduced = Self::new(prim.coeffs[zeros.min(prim.coeffs.len())..].to_vec());
        if reduced.degree().unwrap_or(0) == 0 {
            return Ok(roots);
        }
        let (Some(constant), Some(lead)) = (reduced.coeffs.first(), reduced.leading()) else {
            return Ok(roots);
        };
        let (Some(ps), Some(qs)) = (
            divisors(constant.numer(), MAX_ROOT_SEARCH),
            divisors(lead.numer(), MAX_ROOT_SEARCH),
        ) else {
            tracing::debug!("rational root search skipped: coefficients too large");
            return Ok(roots);
        };
        if ps.len().saturating_mul(qs.len()) > MAX_ROOT_CANDIDATES {
            tracing::debug!(candidates = ps.len() * qs.len(), "rational root search skipped");
            return Ok(roots);
        }
        for p in &ps {
            cancel.check_cancelled()?;
            for q in &qs {
                if p.gcd(q) != 1 {
                    continue;
                }
                let candidate = BigRational::new(BigInt::from(*p), BigInt::from(*q));
                for value in [candidate.clone(), -candidate] {
                    if reduced.eval(&value).is_zero() {
                        roots.push(value);
                    }
                }
            }
        }
        roots.sort();
        Ok(roots)
    }

    /// Render with the given variable name, e.g. `x³ - 2x + 1`.
    #[must_use]
    pub fn display(&self, var: &str) -> String {
        Polynomial::from_univariate(self, var).to_string()
    }
}

impl Neg for &UniPoly {
    type Output = UniPoly;

    fn neg(self) -> UniPoly {
        UniPoly::new(self.coeffs.iter().map(|c| -c).collect())
    }
}

impl Sub for &UniPoly {
    type Output = UniPoly;

    fn sub(self, other: &UniPoly) -> UniPoly {
        let len = self.coeffs.len().max(other.coeffs.len());
        let zero = BigRational::zero();
        UniPoly::new(
            (0..len)
                .map(|i| {
                    self.coeffs.get(i).unwrap_or(&zero) - other.coeffs.get(i).unwrap_or(&zero)
                })
                .collect(),
        )
    }
}

impl Mul for &UniPoly {
    type Output = UniPoly;

    fn mul(self, other: &UniPoly) -> UniPoly {
        if self.is_zero() || other.is_zero() {
            return UniPoly::default();
        }
        let mut out = vec![BigRational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        UniPoly::new(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn degree_and_trim() {
        assert_eq!(UniPoly::from_integers(&[1, 2, 0, 0]).degree(), Some(1));
        assert_eq!(UniPoly::from_integers(&[0]).degree(), None);
    }

    #[test]
    fn long_division() {
        // (x³ - 6x² + 11x - 6) / (x - 1) = x² - 5x + 6
        let n = UniPoly::from_integers(&[-6, 11, -6, 1]);
        let d = UniPoly::from_integers(&[-1, 1]);
        let (q, rem) = n.div_rem(&d).unwrap();
        assert_eq!(q, UniPoly::from_integers(&[6, -5, 1]));
        assert!(rem.is_zero());
        assert!(n.div_rem(&UniPoly::default()).is_none());
    }

    #[test]
    fn division_with_remainder_over_rationals() {
        let n = UniPoly::from_integers(&[1, 0, 1]);
        let d = UniPoly::from_integers(&[1, 2]);
        let (q, rem) = n.div_rem(&d).unwrap();
        assert_eq!(q, UniPoly::new(vec![r(-1, 4), r(1, 2)]));
        assert_eq!(rem, UniPoly::new(vec![r(5, 4)]));
    }

    #[test]
    fn lower_degree_dividend_is_remainder() {
        let n = UniPoly::from_integers(&[1, 1]);
        let d = UniPoly::from_integers(&[0, 0, 1]);
        let (q, rem) = n.div_rem(&d).unwrap();
        assert!(q.is_zero());
        assert_eq!(rem, n);
    }

    #[test]
    fn derivative_and_eval() {
        let p = UniPoly::from_integers(&[1, -3, 0, 1]);
        assert_eq!(p.derivative(), UniPoly::from_integers(&[-3, 0, 3]));
        assert_eq!(p.eval(&r(2, 1)), r(3, 1));
        assert!((p.eval_f64(2.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn primitive_part() {
        let p = UniPoly::new(vec![r(-1, 2), r(0, 1), r(-3, 2)]);
        assert_eq!(p.primitive(), UniPoly::from_integers(&[1, 0, 3]));
    }

    #[test]
    fn finds_rational_roots() {
        let p = UniPoly::from_integers(&[-6, 11, -6, 1]);
        let roots = p.rational_roots(&CancellationToken::new()).unwrap();
        assert_eq!(roots, vec![r(1, 1), r(2, 1), r(3, 1)]);

        let p = &UniPoly::from_integers(&[-1, 0, 2, 0]) * &UniPoly::from_integers(&[0, 1]);
        let roots = p.rational_roots(&CancellationToken::new()).unwrap();
        assert_eq!(roots, vec![r(0, 1)]);

        let p = UniPoly::from_integers(&[-1, 2]);
        assert_eq!(
            p.rational_roots(&CancellationToken::new()).unwrap(),
            vec![r(1, 2)]
        );
    }

    #[test]
    fn deflation() {
        let p = UniPoly::from_integers(&[-6, 11, -6, 1]);
        assert_eq!(p.deflate(&r(3, 1)), UniPoly::from_integers(&[2, -3, 1]));
    }

    #[test]
    fn display_uses_variable() {
        assert_eq!(UniPoly::from_integers(&[6, -5, 1]).display("t"), "t² - 5t + 6");
    }
}
