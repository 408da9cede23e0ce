//! Exact roots of integer quadratics in simplified radical form.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use super::format::rational;
use crate::arith::simplify_sqrt;
use crate::provider::ComputationError;

/// Root pair of `ax² + bx + c`.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadraticRoots {
    /// `D = 0`.
    Double(BigRational),
    /// `D > 0`: exact text and value for `+` and `-` branches.
    Real([(String, f64); 2]),
    /// `D < 0`: exact text for both branches, plus real and imaginary parts of the `+` branch.
    Complex {
        exact: [String; 2],
        re: f64,
        im: f64,
    },
}

/// Discriminant, `√|D| = coeff·√inner`, and the roots.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticSolution {
    pub discriminant: BigInt,
    pub sqrt_coeff: u128,
    pub sqrt_inner: u128,
    pub roots: QuadraticRoots,
}

/// `(num ± coeff·√inner [i]) / den`, reduced and with a positive denominator.
fn radical_quotient(num: &BigInt, coeff: &BigInt, inner: u128, den: &BigInt, imaginary: bool) -> String {
    let g = num.gcd(coeff).gcd(den);
    let (mut num, mut coeff, mut den) = (num / &g, coeff / &g, den / &g);
    if den.is_negative() {
        num = -num;
        coeff = -coeff;
        den = -den;
    }
    let unit = if imaginary { "i" } else { "" };
    let radical = if inner == 1 {
        if coeff.abs() == BigInt::from(1) && imaginary {
            String::new()
        } else {
            coeff.abs().to_string()
        }
    } else if coeff.abs() == BigInt::from(1) {
        format!("√{inner}")
    } else {
        format!("{}√{inner}", coeff.abs())
    };
    let radical = format!("{radical}{unit}");
    let numerator = if num.is_zero() {
        if coeff.is_negative() {
            format!("-{radical}")
        } else {
            radical
        }
    } else {
        let sign = if coeff.is_negative() { '-' } else { '+' };
        format!("{num} {sign} {radical}")
    };
    if den == BigInt::from(1) {
        numerator
    } else if num.is_zero() {
        format!("{numerator}/{den}")
    } else {
        format!("({numerator}) / {den}")
    }
}

/// Solve `ax² + bx + c = 0` for integer coefficients with `a ≠ 0`.
pub fn solve_quadratic(a: &BigInt, b: &BigInt, c: &BigInt) -> Result<QuadraticSolution, ComputationError> {
    if a.is_zero() {
        return Err(ComputationError::invalid(
            "Not a quadratic equation. Coefficient 'a' must not be zero.",
        ));
    }
    let discriminant = b * b - BigInt::from(4) * a * c;
    let magnitude = discriminant.abs().to_u128().ok_or_else(|| {
        ComputationError::Unsupported("coefficients are too large to simplify the discriminant".into())
    })?;
    let (sqrt_coeff, sqrt_inner) = simplify_sqrt(magnitude);
    let two_a = BigInt::from(2) * a;
    let neg_b = -b;
    let to_f64 = |v: &BigInt| v.to_f64().unwrap_or(f64::NAN);

    let roots = if discriminant.is_zero() {
        QuadraticRoots::Double(BigRational::new(neg_b, two_a))
    } else if discriminant.is_positive() {
        let coeff = BigInt::from(sqrt_coeff);
        let sqrt_d = to_f64(&discriminant).sqrt();
        let branch = |sign: i32| {
            let signed = &coeff * sign;
            let text = if sqrt_inner == 1 {
                rational(&BigRational::new(&neg_b + &signed, two_a.clone()))
            } else {
                radical_quotient(&neg_b, &signed, sqrt_inner, &two_a, false)
            };
            let value = (to_f64(&neg_b) + f64::from(sign) * sqrt_d) / to_f64(&two_a);
            (text, value)
        };
        QuadraticRoots::Real([branch(1), branch(-1)])
    } else {
        let coeff = BigInt::from(sqrt_coeff);
        QuadraticRoots::Complex {
            exact: [
                radical_quotient(&neg_b, &coeff, sqrt_inner, &two_a, true),
                radical_quotient(&neg_b, &-&coeff, sqrt_inner, &two_a, true),
            ],
            re: to_f64(&neg_b) / to_f64(&two_a),
            im: (to_f64(&discriminant.abs())).sqrt() / to_f64(&two_a).abs(),
        }
    };
    Ok(QuadraticSolution {
        discriminant,
        sqrt_coeff,
        sqrt_inner,
        roots,
    })
}
