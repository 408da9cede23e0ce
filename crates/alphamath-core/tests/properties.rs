//! Property-based tests for the polynomial engine and the number-theory
//! providers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::Zero;
use proptest::prelude::*;

use alphamath_core::algebra::{factor, parse, Dialect, Polynomial, UniPoly};
use alphamath_core::arith::{extended_gcd, simplify_sqrt};
use alphamath_core::progress::CancellationToken;
use alphamath_core::providers::congruence::CongruenceSolver;
use alphamath_core::Solver;

fn poly(text: &str) -> Polynomial {
    let expr = parse(text, Dialect::Polynomial).unwrap();
    Polynomial::from_expr(&expr, &CancellationToken::new()).unwrap()
}

/// `Π (x - rᵢ)` rendered as text.
fn product_text(roots: &[i64]) -> String {
    roots.iter().map(|r| format!("(x - ({r}))")).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Factoring then expanding gives back the polynomial.
    #[test]
    fn factor_expand_round_trip(roots in prop::collection::vec(-6i64..6, 1..5), scale in 1i64..5) {
        let p = poly(&format!("{scale}{}", product_text(&roots)));
        let f = factor(&p, &CancellationToken::new()).unwrap();
        prop_assert_eq!(f.expand(), p);
    }

    /// Every rational root found actually is a root, and every integer root is found.
    #[test]
    fn rational_roots_are_exact(roots in prop::collection::vec(-9i64..9, 1..4)) {
        let p = poly(&product_text(&roots)).to_univariate("x").unwrap();
        let found = p.rational_roots(&CancellationToken::new()).unwrap();
        for r in &found {
            prop_assert!(p.eval(r).is_zero());
        }
        for r in &roots {
            prop_assert!(found.contains(&BigRational::from_integer(BigInt::from(*r))));
        }
    }

    /// `div_rem` satisfies `n = q·d + r` with `deg r < deg d`.
    #[test]
    fn division_identity(
        n in prop::collection::vec(-20i64..20, 1..6),
        d in prop::collection::vec(-20i64..20, 1..4),
    ) {
        let n = UniPoly::from_integers(&n);
        let d = UniPoly::from_integers(&d);
        prop_assume!(!d.is_zero());
        let (q, r) = n.div_rem(&d).unwrap();
        let rebuilt = &(&q * &d) - &(-&r);
        prop_assert_eq!(rebuilt, n);
        prop_assert!(r.degree().map_or(true, |rd| Some(rd) < d.degree()));
    }

    /// `a·p + m·q = gcd(a, m)`.
    #[test]
    fn bezout_identity(a in -10_000i64..10_000, m in 1i64..10_000) {
        let (a, m) = (BigInt::from(a), BigInt::from(m));
        let (g, p, q) = extended_gcd(&a, &m);
        prop_assert_eq!(&a * p + &m * q, g.clone());
        prop_assert_eq!(g, a.gcd(&m));
    }

    /// `outside² · inside = n`.
    #[test]
    fn sqrt_simplification(n in 1u128..1_000_000) {
        let (outside, inside) = simplify_sqrt(n);
        prop_assert_eq!(outside * outside * inside, n);
    }

    /// Every listed congruence solution satisfies `a·x ≡ b (mod m)`.
    #[test]
    fn congruence_solutions_verify(a in 1i64..60, b in 0i64..60, m in 1i64..60) {
        let out = CongruenceSolver
            .solve(Some(&format!("{a} {b} {m}")), &CancellationToken::new())
            .unwrap();
        for line in out.lines().filter(|l| l.starts_with("x(") && l.ends_with(&format!("(mod {m})"))) {
            let value: i64 = line
                .split(" = ")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .unwrap()
                .parse()
                .unwrap();
            prop_assert_eq!((a * value - b).rem_euclid(m), 0);
        }
    }
}
