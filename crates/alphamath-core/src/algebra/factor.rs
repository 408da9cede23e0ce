//! Factorization of polynomials over ℚ into linear factors where possible.
//!
//! Handles content and common monomials, rational linear factors of
//! univariate polynomials (with multiplicity) and homogeneous bivariate
//! polynomials through dehomogenization. Whatever does not split into
//! linear factors is kept as a single factor.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::format::rational;
use super::poly::{Monomial, Polynomial};
use super::univariate::UniPoly;
use crate::arith::denominator_lcm;
use crate::progress::CancellationToken;
use crate::provider::ComputationError;

/// `unit · Π factorᵉ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    pub unit: BigRational,
    pub factors: Vec<(Polynomial, u32)>,
}

impl Factorization {
    /// Multiply the factors back together.
    #[must_use]
    pub fn expand(&self) -> Polynomial {
        self.factors
            .iter()
            .fold(Polynomial::constant(self.unit.clone()), |acc, (f, e)| {
                &acc * &f.pow(*e)
            })
    }
}

fn is_single_variable(p: &Polynomial) -> bool {
    let mut terms = p.terms();
    matches!(
        (terms.next(), terms.next()),
        (Some((m, c)), None) if c.is_one() && m.len() == 1 && m.values().all(|&e| e == 1)
    )
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return f.write_str(&rational(&self.unit));
        }
        if let [(only, 1)] = self.factors.as_slice() {
            if self.unit.is_one() {
                return write!(f, "{only}");
            }
        }
        if self.unit == -BigRational::one() {
            f.write_str("-")?;
        } else if !self.unit.is_one() {
            if self.unit.is_integer() {
                write!(f, "{}", self.unit)?;
            } else {
                write!(f, "({})", rational(&self.unit))?;
            }
        }
        for (factor, exp) in &self.factors {
            if is_single_variable(factor) {
                write!(f, "{factor}")?;
            } else {
                write!(f, "({factor})")?;
            }
            if *exp > 1 {
                f.write_str(&super::format::superscript(*exp))?;
            }
        }
        Ok(())
    }
}

/// Split `p` into rational content and an integer primitive part whose
/// displayed leading coefficient is positive.
fn content(p: &Polynomial) -> (BigRational, Polynomial) {
    let lcm = denominator_lcm(p.coefficients());
    let gcd = p
        .coefficients()
        .fold(BigInt::zero(), |acc, c| acc.gcd(&(c.numer() * (&lcm / c.denom()))));
    let mut unit = BigRational::new(gcd, lcm);
    if p.display_leading().is_some_and(|(_, c)| c.is_negative()) {
        unit = -unit;
    }
    (unit.clone(), p.scale(&unit.recip()))
}

fn common_monomial(p: &Polynomial) -> Monomial {
    let mut terms = p.terms().map(|(m, _)| m);
    let Some(first) = terms.next() else {
        return Monomial::new();
    };
    let mut common = first.clone();
    for m in terms {
        common.retain(|var, exp| {
            let other = m.get(var).copied().unwrap_or(0);
            *exp = (*exp).min(other);
            *exp > 0
        });
    }
    common
}

/// Rational roots of `g` with multiplicity, largest first.
fn linear_roots(
    g: &UniPoly,
    cancel: &CancellationToken,
) -> Result<Vec<(BigRational, u32)>, ComputationError> {
    let mut remaining = g.clone();
    let mut out = Vec::new();
    for root in g.rational_roots(cancel)?.into_iter().rev() {
        let mut multiplicity = 0;
        while !remaining.is_zero() && remaining.eval(&root).is_zero() {
            cancel.check_cancelled()?;
            remaining = remaining.deflate(&root);
            multiplicity += 1;
        }
        if multiplicity > 0 {
            out.push((root, multiplicity));
        }
    }
    Ok(out)
}

/// `q·x - p·y` (or `q·x - p` without a homogenizing variable).
fn linear_factor(root: &BigRational, x: &str, y: Option<&str>) -> Polynomial {
    let q = Polynomial::constant(BigRational::from_integer(root.denom().clone()));
    let p = Polynomial::constant(BigRational::from_integer(root.numer().clone()));
    let tail = match y {
        Some(y) => &p * &Polynomial::var(y),
        None => p,
    };
    &(&q * &Polynomial::var(x)) - &tail
}

fn split_linear(
    p: &Polynomial,
    cancel: &CancellationToken,
) -> Result<Vec<(Polynomial, u32)>, ComputationError> {
    let vars: Vec<String> = p.variables().into_iter().collect();
    let (x, y, univariate) = match vars.as_slice() {
        [x] => (x.as_str(), None, p.to_univariate(x)),
        [x, y] if p.is_homogeneous() => {
            let one = BTreeMap::from([(y.clone(), BigRational::one())]);
            (x.as_str(), Some(y.as_str()), p.substitute(&one).to_univariate(x))
        }
        _ => return Ok(vec![(p.clone(), 1)]),
    };
    let Some(univariate) = univariate else {
        return Ok(vec![(p.clone(), 1)]);
    };

    let mut factors = Vec::new();
    let mut rest = p.clone();
    for (root, multiplicity) in linear_roots(&univariate, cancel)? {
        let factor = linear_factor(&root, x, y);
        for _ in 0..multiplicity {
            rest = rest.div_exact(&factor).ok_or_else(|| {
                ComputationError::Unsupported(format!("could not divide out {factor}"))
            })?;
        }
        factors.push((factor, multiplicity));
    }
    if rest.constant_value().is_none() {
        factors.push((rest, 1));
    } else if let Some(c) = rest.constant_value().filter(|c| !c.is_one()) {
        factors.push((Polynomial::constant(c), 1));
    }
    Ok(factors)
}

/// Factor a polynomial over ℚ.
pub fn factor(p: &Polynomial, cancel: &CancellationToken) -> Result<Factorization, ComputationError> {
    if let Some(value) = p.constant_value() {
        return Ok(Factorization {
            unit: value,
            factors: Vec::new(),
        });
    }
    let (unit, primitive) = content(p);
    let common = common_monomial(&primitive);
    let mut factors: Vec<(Polynomial, u32)> = common
        .iter()
        .map(|(var, &exp)| (Polynomial::var(var), exp))
        .collect();
    let divisor = Polynomial::monomial(common, BigRational::one());
    let rest = primitive.div_exact(&divisor).ok_or_else(|| {
        ComputationError::Unsupported("could not extract the common monomial".into())
    })?;
    if rest.constant_value().is_none() {
        factors.extend(split_linear(&rest, cancel)?);
    }
    tracing::debug!(factors = factors.len(), "polynomial factored");
    Ok(Factorization { unit, factors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::parser::{parse, Dialect};

    fn p(s: &str) -> Polynomial {
        let expr = parse(s, Dialect::Polynomial).unwrap();
        Polynomial::from_expr(&expr, &CancellationToken::new()).unwrap()
    }

    fn factored(s: &str) -> String {
        factor(&p(s), &CancellationToken::new()).unwrap().to_string()
    }

    #[test]
    fn difference_of_squares() {
        assert_eq!(factored("x^2 - 1"), "(x - 1)(x + 1)");
    }

    #[test]
    fn repeated_roots_and_content() {
        assert_eq!(factored("2x^2 - 4x + 2"), "2(x - 1)²");
    }

    #[test]
    fn common_monomial_and_rational_root() {
        assert_eq!(factored("2x^3 - x^2"), "x²(2x - 1)");
    }

    #[test]
    fn negative_leading_coefficient() {
        assert_eq!(factored("-x^2 + 1"), "-(x - 1)(x + 1)");
    }

    #[test]
    fn homogeneous_bivariate() {
        assert_eq!(factored("x^2 - y^2"), "(x - y)(x + y)");
        assert_eq!(factored("x^2 + 2xy + y^2"), "(x + y)²");
    }

    #[test]
    fn irreducible_is_kept() {
        assert_eq!(factored("x^2 + 1"), "x² + 1");
        assert_eq!(factored("x^3 - 2"), "x³ - 2");
    }

    #[test]
    fn partial_split() {
        assert_eq!(factored("x^3 + x"), "x(x² + 1)");
        assert_eq!(factored("x^3 - x^2 + x - 1"), "(x - 1)(x² + 1)");
    }

    #[test]
    fn rational_content() {
        assert_eq!(factored("x^2/2 - 1/2"), "(1/2)(x - 1)(x + 1)");
    }

    #[test]
    fn constants() {
        assert_eq!(factored("6"), "6");
        assert_eq!(factored("0"), "0");
    }

    #[test]
    fn expand_inverts_factor() {
        let poly = p("3x^4 - 3x^2");
        let f = factor(&poly, &CancellationToken::new()).unwrap();
        assert_eq!(f.expand(), poly);
    }
}
