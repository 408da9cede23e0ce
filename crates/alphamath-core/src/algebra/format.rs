//! Display helpers shared by the algebra engine and the providers.

use num_rational::BigRational;
use num_traits::{One, Signed};

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Render `n` with Unicode superscript digits.
#[must_use]
pub fn superscript(n: u32) -> String {
    n.to_string()
        .bytes()
        .map(|b| SUPERSCRIPT_DIGITS[usize::from(b - b'0')])
        .collect()
}

/// `3`, `-3/2`.
#[must_use]
pub fn rational(value: &BigRational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

/// Coefficient prefix for a term whose magnitude is `abs`; empty for 1.
pub(crate) fn coefficient_prefix(abs: &BigRational, has_body: bool) -> String {
    if !has_body {
        rational(abs)
    } else if abs.is_one() {
        String::new()
    } else if abs.is_integer() {
        abs.numer().to_string()
    } else {
        format!("({})", rational(abs))
    }
}

/// Join `(negative, body)` pairs into `a - b + c`.
pub(crate) fn join_signed(terms: impl IntoIterator<Item = (bool, String)>) -> String {
    let mut out = String::new();
    for (i, (negative, body)) in terms.into_iter().enumerate() {
        match (i, negative) {
            (0, true) => out.push('-'),
            (0, false) => {}
            (_, true) => out.push_str(" - "),
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&body);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

/// Fixed-point rendering that never prints a negative zero.
#[must_use]
pub fn fixed(value: f64, places: usize) -> String {
    let text = format!("{value:.places$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Complex number as `a + bi` with the given precision.
#[must_use]
pub fn complex(re: f64, im: f64, places: usize) -> String {
    if im.abs() < 0.5 * 10f64.powi(-i32::try_from(places).unwrap_or(i32::MAX)) {
        return fixed(re, places);
    }
    let sign = if im < 0.0 { '-' } else { '+' };
    format!("{} {sign} {}i", fixed(re, places), fixed(im.abs(), places))
}

/// Sign glyph for a rational value.
pub(crate) fn sign_glyph(value: &BigRational) -> &'static str {
    if value.is_positive() {
        "+"
    } else if value.is_negative() {
        "-"
    } else {
        "0"
    }
}
