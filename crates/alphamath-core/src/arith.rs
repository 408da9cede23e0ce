//! Integer and rational helpers shared by the providers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::provider::ComputationError;

/// Extended Euclid with floor division: returns `(g, p, q)` with `a·p + m·q = g`.
///
/// Signs follow floor semantics, so `g` takes the sign of the last non-zero
/// remainder (negative moduli yield a negative `g`).
#[must_use]
pub fn extended_gcd(a: &BigInt, m: &BigInt) -> (BigInt, BigInt, BigInt) {
    if m.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }
    let (g, p_prime, q_prime) = extended_gcd(m, &a.mod_floor(m));
    let q = &p_prime - a.div_floor(m) * &q_prime;
    (g, q_prime, q)
}

/// Parse whitespace-separated integers, requiring exactly `N` of them.
pub fn parse_integers<const N: usize>(
    input: &str,
    usage: &str,
) -> Result<[BigInt; N], ComputationError> {
    let values = parse_integer_list(input)?;
    values
        .try_into()
        .map_err(|_| ComputationError::invalid(usage))
}

/// Parse any number of whitespace-separated integers.
pub fn parse_integer_list(input: &str) -> Result<Vec<BigInt>, ComputationError> {
    input
        .split_whitespace()
        .map(|tok| {
            tok.parse::<BigInt>().map_err(|_| {
                ComputationError::invalid(format!("invalid integer literal: '{tok}'"))
            })
        })
        .collect()
}

/// Parse a decimal (`-1.25`), fraction (`3/4`) or integer literal exactly.
pub fn parse_rational(text: &str) -> Option<BigRational> {
    let text = text.trim().replace('−', "-");
    if let Some((n, d)) = text.split_once('/') {
        let n = parse_rational(n)?;
        let d = parse_rational(d)?;
        return if d.is_zero() { None } else { Some(n / d) };
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let numer: BigInt = format!("{int_part}{frac_part}0").parse().ok()?;
    let denom = BigInt::from(10u32).pow(u32::try_from(frac_part.len()).ok()? + 1);
    let value = BigRational::new(numer, denom);
    Some(if negative { -value } else { value })
}

/// Lossy conversion of an exact rational to `f64`.
#[must_use]
pub fn rational_to_f64(value: &BigRational) -> f64 {
    match (value.numer().to_f64(), value.denom().to_f64()) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
        _ => {
            // Both sides overflow: scale down before dividing.
            let shift = value.numer().bits().max(value.denom().bits()).saturating_sub(1000);
            let n = (value.numer() >> shift).to_f64().unwrap_or(f64::NAN);
            let d = (value.denom() >> shift).to_f64().unwrap_or(f64::NAN);
            n / d
        }
    }
}

/// Least common multiple of the denominators of `values` (1 for none).
pub fn denominator_lcm<'a>(values: impl IntoIterator<Item = &'a BigRational>) -> BigInt {
    values
        .into_iter()
        .fold(BigInt::one(), |acc, v| acc.lcm(v.denom()))
}

/// Positive divisors of `n` (which must fit in `u64` and not exceed `limit`).
#[must_use]
pub fn divisors(n: &BigInt, limit: u64) -> Option<Vec<u64>> {
    let n = n.abs().to_u64()?;
    if n == 0 || n > limit {
        return None;
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1u64;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i != n / i {
                large.push(n / i);
            }
        }
        i += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Split `n` into `(outside, inside)` with `n = outside² · inside`, `inside` square-free.
#[must_use]
pub fn simplify_sqrt(n: u128) -> (u128, u128) {
    if n == 0 {
        return (0, 1);
    }
    let mut rem = n;
    let mut outside = 1u128;
    let mut inside = 1u128;
    let mut p = 2u128;
    while p.checked_mul(p).is_some_and(|sq| sq <= rem) {
        let mut exp = 0u32;
        while rem % p == 0 {
            rem /= p;
            exp += 1;
        }
        outside *= p.pow(exp / 2);
        if exp % 2 == 1 {
            inside *= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    (outside, inside * rem)
}

/// Integer square root when `n` is a perfect square.
#[must_use]
pub fn exact_sqrt(n: u128) -> Option<u128> {
    let (outside, inside) = simplify_sqrt(n);
    (inside == 1).then_some(outside)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn extended_gcd_matches_bezout() {
        let (g, p, q) = extended_gcd(&big(3), &big(7));
        assert_eq!(g, big(1));
        assert_eq!((p.clone(), q.clone()), (big(-2), big(1)));
        assert_eq!(big(3) * p + big(7) * q, g);
    }

    #[test]
    fn extended_gcd_with_common_factor() {
        let (g, p, q) = extended_gcd(&big(6), &big(9));
        assert_eq!(g, big(3));
        assert_eq!(big(6) * p + big(9) * q, big(3));
    }

    #[test]
    fn parse_integers_requires_exact_count() {
        let [a, b] = parse_integers::<2>("12 8", "usage").unwrap();
        assert_eq!((a, b), (big(12), big(8)));
        assert_eq!(
            parse_integers::<2>("1 2 3", "usage"),
            Err(ComputationError::invalid("usage"))
        );
        assert!(parse_integers::<1>("x", "usage").is_err());
    }

    #[test]
    fn parse_rational_forms() {
        let half = BigRational::new(big(1), big(2));
        assert_eq!(parse_rational("0.5"), Some(half.clone()));
        assert_eq!(parse_rational("1/2"), Some(half.clone()));
        assert_eq!(parse_rational("-1.5"), Some(BigRational::new(big(-3), big(2))));
        assert_eq!(parse_rational("4"), Some(BigRational::from_integer(big(4))));
        assert_eq!(parse_rational(".25"), Some(BigRational::new(big(1), big(4))));
        assert_eq!(parse_rational("abc"), None);
        assert_eq!(parse_rational("1/0"), None);
        assert_eq!(parse_rational(""), None);
    }

    #[test]
    fn simplify_sqrt_extracts_squares() {
        assert_eq!(simplify_sqrt(12), (2, 3));
        assert_eq!(simplify_sqrt(72), (6, 2));
        assert_eq!(simplify_sqrt(49), (7, 1));
        assert_eq!(simplify_sqrt(7), (1, 7));
        assert_eq!(simplify_sqrt(0), (0, 1));
        assert_eq!(exact_sqrt(144), Some(12));
        assert_eq!(exact_sqrt(8), None);
    }

    #[test]
    fn divisors_of_small_numbers() {
        assert_eq!(divisors(&big(12), 100), Some(vec![1, 2, 3, 4, 6, 12]));
        assert_eq!(divisors(&big(-9), 100), Some(vec![1, 3, 9]));
        assert_eq!(divisors(&big(0), 100), None);
        assert_eq!(divisors(&big(1000), 100), None);
    }

    #[test]
    fn rational_to_f64_close() {
        let r = BigRational::new(big(1), big(3));
        assert!((rational_to_f64(&r) - 1.0 / 3.0).abs() < 1e-12);
    }
}
