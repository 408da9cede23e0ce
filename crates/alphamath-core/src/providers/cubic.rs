//! Cubic root finder: exact where the roots are rational or quadratic
//! radicals, Cardano's formulas otherwise.

use std::f64::consts::PI;

use num_rational::BigRational;
use num_traits::Zero;

use super::parse_single_variable;
use crate::algebra::format::{complex, rational};
use crate::algebra::{solve_quadratic, QuadraticRoots, UniPoly};
use crate::arith::rational_to_f64;
use crate::progress::CancellationToken;
use crate::provider::{ComputationError, Solver};

pub struct CubicSolver;

#[derive(Debug, Clone, PartialEq)]
struct Root {
    exact: Option<String>,
    re: f64,
    im: f64,
}

impl Root {
    fn rational(value: &BigRational) -> Self {
        Self {
            exact: Some(rational(value)),
            re: rational_to_f64(value),
            im: 0.0,
        }
    }
}

/// Roots of `a·t³ + b·t² + c·t + d` by Cardano (one real root) or the
/// trigonometric method (three real roots).
fn cardano(a: f64, b: f64, c: f64, d: f64) -> Vec<(f64, f64)> {
    let (b, c, d) = (b / a, c / a, d / a);
    let shift = -b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b.powi(3) / 27.0 - b * c / 3.0 + d;
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    if disc > 0.0 {
        let s = disc.sqrt();
        let u = (-q / 2.0 + s).cbrt();
        let v = (-q / 2.0 - s).cbrt();
        let re = -(u + v) / 2.0 + shift;
        let im = (u - v) * 3f64.sqrt() / 2.0;
        vec![(u + v + shift, 0.0), (re, im), (re, -im)]
    } else if p.abs() < f64::EPSILON {
        vec![(shift, 0.0)]
    } else {
        let r = 2.0 * (-p / 3.0).sqrt();
        let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        let mut roots: Vec<(f64, f64)> = (0..3_u8)
            .map(|k| (r * (phi - 2.0 * PI * f64::from(k) / 3.0).cos() + shift, 0.0))
            .collect();
        roots.sort_by(|x, y| x.0.total_cmp(&y.0));
        roots
    }
}

fn cubic_roots(poly: &UniPoly, cancel: &CancellationToken) -> Result<Vec<Root>, ComputationError> {
    let prim = poly.primitive();
    let mut roots = Vec::new();
    let mut rest = prim.clone();
    for r in prim.rational_roots(cancel)? {
        roots.push(Root::rational(&r));
        while !rest.is_zero() && rest.eval(&r).is_zero() {
            rest = rest.deflate(&r);
        }
    }

    match rest.degree() {
        Some(1) => {
            let c = rest.coeffs();
            roots.push(Root::rational(&(-&c[0] / &c[1])));
        }
        Some(2) => {
            let q = rest.primitive();
            let [c, b, a] = [0, 1, 2].map(|i| q.coeffs()[i].to_integer());
            match solve_quadratic(&a, &b, &c)?.roots {
                QuadraticRoots::Double(r) => roots.push(Root::rational(&r)),
                QuadraticRoots::Real(pair) => {
                    roots.extend(pair.into_iter().map(|(text, value)| Root {
                        exact: Some(text),
                        re: value,
                        im: 0.0,
                    }));
                }
                QuadraticRoots::Complex { exact, re, im } => {
                    let [plus, minus] = exact;
                    roots.push(Root { exact: Some(plus), re, im });
                    roots.push(Root { exact: Some(minus), re, im: -im });
                }
            }
        }
        Some(3) => {
            let c: Vec<f64> = rest.coeffs().iter().map(rational_to_f64).collect();
            roots.extend(cardano(c[3], c[2], c[1], c[0]).into_iter().map(|(re, im)| Root {
                exact: None,
                re,
                im,
            }));
        }
        _ => {}
    }
    Ok(roots)
}

impl Solver for CubicSolver {
    fn solve(
        &self,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        let input = input.ok_or_else(|| {
            ComputationError::invalid("Enter a cubic polynomial like: x^3 - 6x^2 + 11x - 6")
        })?;
        let (var, poly) = parse_single_variable(input, cancel)?;
        let degree = poly.degree().unwrap_or(0);
        if degree != 3 {
            return Err(ComputationError::Unsupported(format!(
                "The equation is degree {degree}, not a cubic."
            )));
        }
        let var = var.as_deref().unwrap_or("x");

        let mut lines = vec![format!("Parsed Expression: {}", poly.display(var))];
        let roots = cubic_roots(&poly, cancel)?;
        if roots.is_empty() {
            lines.push("No roots found.".into());
            return Ok(lines.join("\n"));
        }
        lines.push(String::new());
        lines.push("Roots of the equation:".into());
        for (i, root) in roots.iter().enumerate() {
            let approx = complex(root.re, root.im, 6);
            lines.push(match &root.exact {
                Some(exact) => format!("Root {}: {exact} ≈ {approx}", i + 1),
                None => format!("Root {}: {approx}", i + 1),
            });
        }
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "cubic"
    }
}
