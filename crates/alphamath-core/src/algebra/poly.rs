//! Sparse multivariate polynomials over ℚ.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::expr::Expr;
use super::format::{coefficient_prefix, join_signed, superscript};
use super::univariate::UniPoly;
use crate::constants::{MAX_COEFFICIENT_BITS, MAX_EXPONENT};
use crate::progress::CancellationToken;
use crate::provider::ComputationError;

/// Variable name → exponent; exponents are never zero.
pub type Monomial = BTreeMap<String, u32>;

fn total_degree(m: &Monomial) -> u32 {
    m.values().sum()
}

/// Lexicographic order with alphabetically earlier variables ranking higher.
#[must_use]
pub fn lex_cmp(a: &Monomial, b: &Monomial) -> Ordering {
    let vars: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    for var in vars {
        let ea = a.get(var).copied().unwrap_or(0);
        let eb = b.get(var).copied().unwrap_or(0);
        match ea.cmp(&eb) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Total degree first, lexicographic as tie-break.
#[must_use]
pub fn graded_cmp(a: &Monomial, b: &Monomial) -> Ordering {
    total_degree(a)
        .cmp(&total_degree(b))
        .then_with(|| lex_cmp(a, b))
}

fn monomial_mul(a: &Monomial, b: &Monomial) -> Monomial {
    let mut out = a.clone();
    for (var, exp) in b {
        *out.entry(var.clone()).or_insert(0) += exp;
    }
    out
}

fn monomial_div(a: &Monomial, b: &Monomial) -> Option<Monomial> {
    let mut out = a.clone();
    for (var, exp) in b {
        let remaining = {
            let ea = out.get_mut(var)?;
            if *ea < *exp {
                return None;
            }
            *ea -= exp;
            *ea
        };
        if remaining == 0 {
            out.remove(var);
        }
    }
    Some(out)
}

fn monomial_body(m: &Monomial) -> String {
    m.iter()
        .map(|(var, &exp)| {
            if exp == 1 {
                var.clone()
            } else {
                format!("{var}{}", superscript(exp))
            }
        })
        .collect()
}

/// Polynomial in any number of variables with exact rational coefficients.
///
/// The zero polynomial has no terms; no stored coefficient is zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Polynomial {
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn constant(value: BigRational) -> Self {
        Self::monomial(Monomial::new(), value)
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(value)))
    }

    #[must_use]
    pub fn var(name: &str) -> Self {
        Self::monomial(
            Monomial::from([(name.to_string(), 1)]),
            BigRational::one(),
        )
    }

    #[must_use]
    pub fn monomial(m: Monomial, coefficient: BigRational) -> Self {
        let mut p = Self::zero();
        p.add_term(m, coefficient);
        p
    }

    fn add_term(&mut self, m: Monomial, coefficient: BigRational) {
        if coefficient.is_zero() {
            return;
        }
        match self.terms.entry(m) {
            Entry::Occupied(mut entry) => {
                let sum = entry.get() + &coefficient;
                if sum.is_zero() {
                    entry.remove();
                } else {
                    *entry.get_mut() = sum;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(coefficient);
            }
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn coefficients(&self) -> impl Iterator<Item = &BigRational> {
        self.terms.values()
    }

    /// Value of a constant polynomial (zero included).
    #[must_use]
    pub fn constant_value(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self
                .terms
                .get(&Monomial::new())
                .cloned(),
            _ => None,
        }
    }

    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms.keys().map(total_degree).max().unwrap_or(0)
    }

    #[must_use]
    pub fn degree_in(&self, var: &str) -> u32 {
        self.terms
            .keys()
            .filter_map(|m| m.get(var).copied())
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        self.terms.keys().flat_map(|m| m.keys().cloned()).collect()
    }

    /// All terms share the same total degree.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        let mut degrees = self.terms.keys().map(total_degree);
        match degrees.next() {
            Some(first) => degrees.all(|d| d == first),
            None => true,
        }
    }

    /// Largest term under the lexicographic order.
    #[must_use]
    pub fn leading_term(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().max_by(|a, b| lex_cmp(a.0, b.0))
    }

    /// Largest term under the graded order (the first term displayed).
    #[must_use]
    pub fn display_leading(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().max_by(|a, b| graded_cmp(a.0, b.0))
    }

    #[must_use]
    pub fn scale(&self, factor: &BigRational) -> Self {
        if factor.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * factor))
                .collect(),
        }
    }

    /// Rough upper bound on the bits of any coefficient of `self^exp`.
    fn power_bits(&self, exp: u32) -> u64 {
        let coefficient = self
            .terms
            .values()
            .map(|c| c.numer().bits() + c.denom().bits())
            .max()
            .unwrap_or(0);
        let spread = u64::from(usize::BITS - self.terms.len().leading_zeros());
        (coefficient + spread).saturating_mul(u64::from(exp))
    }

    fn accumulate_product(&mut self, lhs: &Self, m: &Monomial, coefficient: &BigRational) {
        for (mono, c) in &lhs.terms {
            self.add_term(monomial_mul(mono, m), c * coefficient);
        }
    }

    /// Product that polls `cancel` once per term of `rhs`.
    pub fn mul_cancellable(
        &self,
        rhs: &Self,
        cancel: &CancellationToken,
    ) -> Result<Self, ComputationError> {
        let mut out = Self::zero();
        for (m, c) in &rhs.terms {
            cancel.check_cancelled()?;
            out.accumulate_product(self, m, c);
        }
        Ok(out)
    }

    fn mul_monomial(&self, m: &Monomial, coefficient: &BigRational) -> Self {
        let mut out = Self::zero();
        for (mono, c) in &self.terms {
            out.add_term(monomial_mul(mono, m), c * coefficient);
        }
        out
    }

    #[must_use]
    pub fn pow(&self, mut exp: u32) -> Self {
        let mut result = Self::integer(1);
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// [`Polynomial::pow`] that polls `cancel` between multiplications.
    pub fn pow_cancellable(
        &self,
        mut exp: u32,
        cancel: &CancellationToken,
    ) -> Result<Self, ComputationError> {
        let mut result = Self::integer(1);
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul_cancellable(&base, cancel)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul_cancellable(&base, cancel)?;
            }
        }
        Ok(result)
    }

    /// Quotient when `divisor` divides `self` exactly.
    #[must_use]
    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (lead_m, lead_c) = divisor.leading_term()?;
        let mut remainder = self.clone();
        let mut quotient = Self::zero();
        while let Some((m, c)) = remainder.leading_term() {
            let factor_m = monomial_div(m, lead_m)?;
            let factor_c = c / lead_c;
            remainder = &remainder - &divisor.mul_monomial(&factor_m, &factor_c);
            quotient.add_term(factor_m, factor_c);
        }
        Some(quotient)
    }

    /// Replace the given variables with values.
    #[must_use]
    pub fn substitute(&self, values: &BTreeMap<String, BigRational>) -> Self {
        let mut out = Self::zero();
        for (m, c) in &self.terms {
            let mut coefficient = c.clone();
            let mut rest = Monomial::new();
            for (var, &exp) in m {
                match values.get(var) {
                    Some(v) => coefficient *= num_traits::pow(v.clone(), exp as usize),
                    None => {
                        rest.insert(var.clone(), exp);
                    }
                }
            }
            out.add_term(rest, coefficient);
        }
        out
    }

    /// Expand an expression tree into canonical form.
    ///
    /// Total degree is capped at [`MAX_EXPONENT`] and coefficient growth of
    /// powers at [`MAX_COEFFICIENT_BITS`]; `cancel` is polled while
    /// multiplying.
    pub fn from_expr(expr: &Expr, cancel: &CancellationToken) -> Result<Self, ComputationError> {
        match expr {
            Expr::Num(n) => Ok(Self::constant(n.clone())),
            Expr::Var(v) => Ok(Self::var(v)),
            Expr::Const(_) => Err(ComputationError::Unsupported(
                "constants such as pi or e are not polynomial".into(),
            )),
            Expr::Call(func, _) => Err(ComputationError::Unsupported(format!(
                "{} is not a polynomial operation",
                func.name()
            ))),
            Expr::Neg(e) => Ok(-&Self::from_expr(e, cancel)?),
            Expr::Add(a, b) => Ok(&Self::from_expr(a, cancel)? + &Self::from_expr(b, cancel)?),
            Expr::Sub(a, b) => Ok(&Self::from_expr(a, cancel)? - &Self::from_expr(b, cancel)?),
            Expr::Mul(a, b) => {
                let lhs = Self::from_expr(a, cancel)?;
                let rhs = Self::from_expr(b, cancel)?;
                check_degree(u64::from(lhs.total_degree()) + u64::from(rhs.total_degree()))?;
                lhs.mul_cancellable(&rhs, cancel)
            }
            Expr::Div(a, b) => {
                let numerator = Self::from_expr(a, cancel)?;
                let divisor = Self::from_expr(b, cancel)?;
                match divisor.constant_value() {
                    Some(c) if c.is_zero() => {
                        Err(ComputationError::Undefined("division by zero".into()))
                    }
                    Some(c) => Ok(numerator.scale(&c.recip())),
                    None => {
                        cancel.check_cancelled()?;
                        numerator.div_exact(&divisor).ok_or_else(|| {
                            ComputationError::Unsupported(format!(
                                "{divisor} does not divide {numerator} exactly"
                            ))
                        })
                    }
                }
            }
            Expr::Pow(base, exp) => {
                let base = Self::from_expr(base, cancel)?;
                let exp = Self::from_expr(exp, cancel)?
                    .constant_value()
                    .filter(BigRational::is_integer)
                    .ok_or_else(|| {
                        ComputationError::Unsupported("exponents must be integers".into())
                    })?;
                let magnitude = exp
                    .numer()
                    .abs()
                    .to_u32()
                    .filter(|&e| e <= MAX_EXPONENT)
                    .ok_or_else(|| {
                        ComputationError::Unsupported(format!(
                            "exponent {exp} is larger than {MAX_EXPONENT}"
                        ))
                    })?;
                check_degree(u64::from(base.total_degree()) * u64::from(magnitude))?;
                if base.power_bits(magnitude) > MAX_COEFFICIENT_BITS {
                    return Err(ComputationError::Unsupported(format!(
                        "coefficients would be too large after raising to the power {magnitude}"
                    )));
                }
                if !exp.is_negative() {
                    return base.pow_cancellable(magnitude, cancel);
                }
                match base.constant_value() {
                    Some(c) if c.is_zero() => {
                        Err(ComputationError::Undefined("division by zero".into()))
                    }
                    Some(c) => Ok(Self::constant(num_traits::pow(c.recip(), magnitude as usize))),
                    None => Err(ComputationError::Unsupported(
                        "negative powers of variables are not polynomial".into(),
                    )),
                }
            }
        }
    }

    /// View as a polynomial in `var` alone; `None` if another variable appears.
    #[must_use]
    pub fn to_univariate(&self, var: &str) -> Option<UniPoly> {
        let degree = self.degree_in(var) as usize;
        let mut coeffs = vec![BigRational::zero(); degree + 1];
        for (m, c) in &self.terms {
            if m.keys().any(|v| v != var) {
                return None;
            }
            let exp = m.get(var).copied().unwrap_or(0) as usize;
            coeffs[exp] = c.clone();
        }
        Some(UniPoly::new(coeffs))
    }

    #[must_use]
    pub fn from_univariate(p: &UniPoly, var: &str) -> Self {
        let mut out = Self::zero();
        for (exp, c) in p.coeffs().iter().enumerate() {
            let mut m = Monomial::new();
            if exp > 0 {
                m.insert(var.to_string(), u32::try_from(exp).unwrap_or(u32::MAX));
            }
            out.add_term(m, c.clone());
        }
        out
    }
}

fn check_degree(degree: u64) -> Result<(), ComputationError> {
    if degree > u64::from(MAX_EXPONENT) {
        return Err(ComputationError::Unsupported(format!(
            "degree {degree} is larger than {MAX_EXPONENT}"
        )));
    }
    Ok(())
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<_> = self.terms.iter().collect();
        terms.sort_by(|a, b| graded_cmp(b.0, a.0));
        let rendered = terms.into_iter().map(|(m, c)| {
            let body = monomial_body(m);
            let prefix = coefficient_prefix(&c.abs(), !body.is_empty());
            (c.is_negative(), format!("{prefix}{body}"))
        });
        f.write_str(&join_signed(rendered))
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c);
        }
        out
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut out = Polynomial::zero();
        for (m, c) in &rhs.terms {
            out.accumulate_product(self, m, c);
        }
        out
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}
