use proptest::prelude::*;
use ricis_engine::{
    classic_projection, evaluate, simplify, Expr, InfinityKind, Rational, Root, Simplifier,
    SimplifyOptions,
};
use ricis_math::poly_coeffs::{multiply, to_expr};
use ricis_math::{collect_coefficients, Coefficients};
use std::rc::Rc;

mod strategies;

use strategies::{linear_factor, nonzero, small_root, x};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn simplify_is_idempotent(e in strategies::arb_family_expr()) {
        let once = simplify(&e);
        let twice = simplify(&once);
        prop_assert_eq!(twice, once, "input: {}", e);
    }

    #[test]
    fn shared_factor_cancels(a in small_root(), b in small_root(), c in nonzero()) {
        // c (x - a)(x - b) / (x - a) = c (x - b)
        let num = Expr::mul(Expr::num(c), Expr::mul(linear_factor(a), linear_factor(b)));
        let out = simplify(&Expr::div(num, linear_factor(a)));
        prop_assert!(!out.is_infinity());
        for t in [-2.5, 0.5, 7.25] {
            let v = evaluate(&out, "x", t).unwrap();
            prop_assert!((v - c as f64 * (t - b as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn quotient_remultiplies_to_dividend(
        r in small_root(),
        lower in prop::collection::vec(-5i64..=5, 0..4),
        lead in nonzero(),
    ) {
        // p = (x - r) q, with q of degree lower.len()
        let mut q: Coefficients = lower
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(|(d, &c)| (d as u32, Rational::from_integer(c)))
            .collect();
        q.insert(lower.len() as u32, Rational::from_integer(lead));
        let divisor = collect_coefficients(&linear_factor(r), "x").unwrap();
        let p = multiply(&q, &divisor, "x").unwrap();

        let out = simplify(&Expr::div(to_expr(&p, "x"), linear_factor(r)));
        let quotient = collect_coefficients(&out, "x").unwrap();
        prop_assert_eq!(multiply(&quotient, &divisor, "x").unwrap(), p);
    }

    #[test]
    fn constant_over_linear_pole_sign(a in small_root(), c in nonzero()) {
        let out = simplify(&Expr::div(Expr::num(c), linear_factor(a)));
        let inf = out.as_infinity().expect("pole");
        prop_assert!(matches!(inf.kind(), InfinityKind::Pole { .. }), "kind: {:?}", inf.kind());
        prop_assert_eq!(inf.roots(), &[Root::exact("x", Rational::from_integer(a))][..]);
        let expected = if c > 0 { f64::INFINITY } else { f64::NEG_INFINITY };
        prop_assert_eq!(classic_projection(inf), Ok(expected));
    }

    #[test]
    fn scaled_sine_limit(k in 1i64..=6) {
        let e = Expr::div(Expr::sin(Expr::mul(Expr::num(k), x())), x());
        prop_assert_eq!(simplify(&e), Expr::num(k));
    }

    #[test]
    fn removable_point_without_limits_is_identity(a in small_root()) {
        // sin(x - a) / (x - a) is 0/0 at a
        let arg = linear_factor(a);
        let e = Expr::div(Expr::sin(Rc::clone(&arg)), arg);
        let out = Simplifier::with_options(SimplifyOptions::without_limits()).simplify(&e);
        let inf = out.as_infinity().expect("identity");
        prop_assert_eq!(inf.kind(), &InfinityKind::Identity);
        prop_assert_eq!(classic_projection(inf), Ok(1.0));
    }
}
