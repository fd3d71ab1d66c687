//! Derivative-ratio limits for removable `0/0` singularities.

use crate::options::SimplifyOptions;
use crate::singularity::{evaluate_at_root, PointValue};
use ricis_ast::{Expr, Root};
use ricis_math::differentiate;
use std::rc::Rc;

/// Limit of `num / den` at `root` by repeated differentiation, assuming both
/// vanish there.
///
/// Each round replaces the pair by its derivatives. The first round whose
/// denominator is nonzero at the root yields the limit. Returns `None` when
/// the numerator stays nonzero over a vanishing denominator (divergent), when
/// differentiation or evaluation fails, or after `max_limit_rounds` rounds.
pub fn derivative_ratio_limit(
    num: &Rc<Expr>,
    den: &Rc<Expr>,
    root: &Root,
    opts: &SimplifyOptions,
) -> Option<PointValue> {
    let var = root.var.as_str();
    let mut num = Rc::clone(num);
    let mut den = Rc::clone(den);

    for round in 1..=opts.max_limit_rounds {
        num = differentiate(&num, var)?;
        den = differentiate(&den, var)?;
        let n = evaluate_at_root(&num, root)?;
        let d = evaluate_at_root(&den, root)?;

        if !d.is_zero_within(opts.zero_tolerance) {
            let limit = ratio(&n, &d)?;
            tracing::debug!(target: "limits", root = %root, round, exact = limit.is_exact(), "limit_found");
            return Some(limit);
        }
        if !n.is_zero_within(opts.zero_tolerance) {
            tracing::debug!(target: "limits", root = %root, round, "limit_diverges");
            return None;
        }
    }
    tracing::debug!(target: "limits", root = %root, rounds = opts.max_limit_rounds, "limit_undetermined");
    None
}

fn ratio(n: &PointValue, d: &PointValue) -> Option<PointValue> {
    match (n, d) {
        (PointValue::Exact(a), PointValue::Exact(b)) => a.checked_div(b).ok().map(PointValue::Exact),
        _ => {
            let v = n.to_f64() / d.to_f64();
            v.is_finite().then_some(PointValue::Approx(v))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricis_ast::Rational;

    fn origin() -> Root {
        Root::exact("x", Rational::zero())
    }

    #[test]
    fn sine_over_identity() {
        let num = Expr::sin(Expr::var("x"));
        let limit = derivative_ratio_limit(&num, &Expr::var("x"), &origin(), &SimplifyOptions::default());
        assert_eq!(limit, Some(PointValue::Exact(Rational::one())));
    }

    #[test]
    fn two_rounds() {
        // (1 - cos x) / x^2 -> 1/2
        let num = Expr::sub(Expr::num(1), Expr::cos(Expr::var("x")));
        let den = Expr::mul(Expr::var("x"), Expr::var("x"));
        let limit = derivative_ratio_limit(&num, &den, &origin(), &SimplifyOptions::default());
        assert_eq!(limit, Some(PointValue::Exact(Rational::from_ratio(1, 2).unwrap())));
    }

    #[test]
    fn divergent_ratio_has_no_limit() {
        // x / x^3: after one round, 1 over 3x^2
        let num = Expr::var("x");
        let den = Expr::pow(Expr::var("x"), Expr::num(3));
        assert_eq!(
            derivative_ratio_limit(&num, &den, &origin(), &SimplifyOptions::default()),
            None
        );
    }

    #[test]
    fn round_budget_is_respected() {
        // x^4 / x^4 needs four rounds
        let e = Expr::pow(Expr::var("x"), Expr::num(4));
        let opts = SimplifyOptions::default();
        assert_eq!(derivative_ratio_limit(&e, &e, &origin(), &opts), None);

        let generous = SimplifyOptions {
            max_limit_rounds: 4,
            ..SimplifyOptions::default()
        };
        assert_eq!(
            derivative_ratio_limit(&e, &e, &origin(), &generous),
            Some(PointValue::Exact(Rational::one()))
        );
    }
}
