use proptest::prelude::*;
use ricis_engine::Expr;
use std::rc::Rc;

pub fn x() -> Rc<Expr> {
    Expr::var("x")
}

/// Small integer root locations.
pub fn small_root() -> impl Strategy<Value = i64> {
    -6i64..=6
}

/// Nonzero small integers.
pub fn nonzero() -> impl Strategy<Value = i64> {
    prop_oneof![-9i64..=-1, 1i64..=9]
}

/// `(x - a)`
pub fn linear_factor(a: i64) -> Rc<Expr> {
    Expr::sub(x(), Expr::num(a))
}

/// `(x - r1)(x - r2)...`
pub fn product_of_factors(roots: &[i64]) -> Rc<Expr> {
    let mut factors = roots.iter().map(|&r| linear_factor(r));
    let first = factors.next().unwrap_or_else(|| Expr::num(1));
    factors.fold(first, Expr::mul)
}

/// Quotients of products of linear factors, possibly sharing roots.
pub fn arb_rational_quotient() -> impl Strategy<Value = Rc<Expr>> {
    (
        nonzero(),
        prop::collection::vec(small_root(), 0..3),
        prop::collection::vec(small_root(), 1..3),
    )
        .prop_map(|(c, num_roots, den_roots)| {
            let num = Expr::mul(Expr::num(c), product_of_factors(&num_roots));
            Expr::div(num, product_of_factors(&den_roots))
        })
}

/// Expressions drawn from the families the pipeline is built around:
/// rational quotients, `sin(kx)/x`, and sums and products of those.
pub fn arb_family_expr() -> impl Strategy<Value = Rc<Expr>> {
    let leaf = prop_oneof![
        arb_rational_quotient(),
        (1i64..=5).prop_map(|k| Expr::div(Expr::sin(Expr::mul(Expr::num(k), x())), x())),
        (-5i64..=5).prop_map(Expr::num),
        Just(x()),
    ];

    leaf.prop_recursive(
        2,  // levels deep
        12, // max size
        2,  // items per collection
        |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::add(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::mul(l, r)),
                inner.clone().prop_map(Expr::neg),
            ]
        },
    )
}
