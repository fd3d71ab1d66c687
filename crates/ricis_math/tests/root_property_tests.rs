use proptest::prelude::*;
use ricis_ast::{Expr, Rational, Root};
use ricis_math::long_division::try_divide;
use ricis_math::poly_coeffs::collect_coefficients;
use ricis_math::find_roots;
use std::rc::Rc;

fn x() -> Rc<Expr> {
    Expr::var("x")
}

fn linear(root: i64) -> Rc<Expr> {
    Expr::sub(x(), Expr::num(root))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// k (x - r1)(x - r2) has exactly the integer roots r1 and r2.
    #[test]
    fn factored_quadratics_have_exact_roots(k in 1i64..5, r1 in -8i64..8, r2 in -8i64..8) {
        let e = Expr::mul(Expr::num(k), Expr::mul(linear(r1), linear(r2)));
        let mut expected: Vec<Root> = vec![
            Root::exact("x", Rational::from(r1.min(r2))),
            Root::exact("x", Rational::from(r1.max(r2))),
        ];
        expected.dedup();
        prop_assert_eq!(find_roots(&e, "x"), expected);
    }

    /// A linear factor divides out of any product exactly.
    #[test]
    fn linear_factor_divides_out(r in -6i64..6, a in -5i64..5, b in -5i64..5) {
        prop_assume!(a != 0);
        // (a x + b)(x - r) / (x - r) = a x + b
        let other = Expr::add(Expr::mul(Expr::num(a), x()), Expr::num(b));
        let product = Expr::mul(other.clone(), linear(r));
        let quotient = try_divide(&product, &linear(r), "x").unwrap();
        prop_assert_eq!(
            collect_coefficients(&quotient, "x").unwrap(),
            collect_coefficients(&other, "x").unwrap()
        );
    }

    /// Roots of k x + b are exact and unique.
    #[test]
    fn linear_roots_are_exact(k in 1i64..20, b in -50i64..50) {
        let e = Expr::add(Expr::mul(Expr::num(k), x()), Expr::num(b));
        let expected = Rational::from_ratio(-b, k).unwrap();
        prop_assert_eq!(find_roots(&e, "x"), vec![Root::exact("x", expected)]);
    }
}
