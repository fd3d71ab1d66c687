//! Symbolic differentiation.
//!
//! Implements the constant, sum, product, quotient, power and chain rules for
//! every builtin. Results are built with the folding constructors from
//! [`crate::build`], so `d/dx sin(x)` is `cos(x)` rather than `cos(x) * 1`.

use crate::build::{add_folded, div_folded, mul_folded, neg_folded, sub_folded};
use crate::exact_eval::evaluate_constant;
use ricis_ast::traversal::{contains_infinity, contains_var};
use ricis_ast::{BinOp, BuiltinFn, Expr};
use std::rc::Rc;

/// Derivative of `expr` with respect to `var`.
///
/// Returns `None` for trees containing singularity nodes or malformed calls.
pub fn differentiate(expr: &Rc<Expr>, var: &str) -> Option<Rc<Expr>> {
    if contains_infinity(expr) {
        return None;
    }
    derive(expr, var)
}

fn derive(expr: &Rc<Expr>, var: &str) -> Option<Rc<Expr>> {
    // Constant rule: d/dx c = 0
    if !contains_var(expr, var) {
        return Some(Expr::num(0));
    }

    match expr.as_ref() {
        Expr::Variable(_) => Some(Expr::num(1)),
        Expr::Binary(BinOp::Add, u, v) => Some(add_folded(derive(u, var)?, derive(v, var)?)),
        Expr::Binary(BinOp::Sub, u, v) => Some(sub_folded(derive(u, var)?, derive(v, var)?)),
        Expr::Binary(BinOp::Mul, u, v) => {
            // (uv)' = u'v + uv'
            let du = derive(u, var)?;
            let dv = derive(v, var)?;
            Some(add_folded(
                mul_folded(du, Rc::clone(v)),
                mul_folded(Rc::clone(u), dv),
            ))
        }
        Expr::Binary(BinOp::Div, u, v) => {
            // (u/v)' = (u'v - uv') / v^2
            let du = derive(u, var)?;
            let dv = derive(v, var)?;
            let num = sub_folded(mul_folded(du, Rc::clone(v)), mul_folded(Rc::clone(u), dv));
            Some(div_folded(num, Expr::pow(Rc::clone(v), Expr::num(2))))
        }
        Expr::Neg(u) => Some(neg_folded(derive(u, var)?)),
        Expr::Call(BuiltinFn::Pow, args) => {
            let [base, exp] = args.as_slice() else {
                return None;
            };
            derive_pow(expr, base, exp, var)
        }
        Expr::Call(func, args) => {
            let [u] = args.as_slice() else {
                return None;
            };
            let du = derive(u, var)?;
            let outer = match func {
                BuiltinFn::Sin => Expr::cos(Rc::clone(u)),
                BuiltinFn::Cos => neg_folded(Expr::sin(Rc::clone(u))),
                BuiltinFn::Tan => {
                    // 1 / cos(u)^2
                    div_folded(Expr::num(1), Expr::pow(Expr::cos(Rc::clone(u)), Expr::num(2)))
                }
                BuiltinFn::Sinh => Expr::cosh(Rc::clone(u)),
                BuiltinFn::Cosh => Expr::sinh(Rc::clone(u)),
                BuiltinFn::Exp => Rc::clone(expr),
                BuiltinFn::Log => return Some(div_folded(du, Rc::clone(u))),
                BuiltinFn::Sqrt => {
                    // u' / (2 sqrt(u))
                    return Some(div_folded(du, mul_folded(Expr::num(2), Rc::clone(expr))));
                }
                BuiltinFn::Pow => return None,
            };
            Some(mul_folded(outer, du))
        }
        Expr::Constant(_) | Expr::Infinity(_) => Some(Expr::num(0)),
    }
}

fn derive_pow(expr: &Rc<Expr>, base: &Rc<Expr>, exp: &Rc<Expr>, var: &str) -> Option<Rc<Expr>> {
    let db = derive(base, var)?;

    if !contains_var(exp, var) {
        // n * u^(n-1) * u'
        let n_minus_one = match evaluate_constant(exp) {
            Some(n) => Expr::rational(n - ricis_ast::Rational::one()),
            None => sub_folded(Rc::clone(exp), Expr::num(1)),
        };
        let pow_term = if n_minus_one.is_constant_one() {
            Rc::clone(base)
        } else {
            Expr::pow(Rc::clone(base), n_minus_one)
        };
        return Some(mul_folded(mul_folded(Rc::clone(exp), pow_term), db));
    }

    let de = derive(exp, var)?;
    if !contains_var(base, var) {
        // a^u * ln(a) * u'
        let term = mul_folded(Rc::clone(expr), Expr::log(Rc::clone(base)));
        return Some(mul_folded(term, de));
    }

    // u^v * (v' ln(u) + v u' / u)
    let term1 = mul_folded(de, Expr::log(Rc::clone(base)));
    let term2 = div_folded(mul_folded(Rc::clone(exp), db), Rc::clone(base));
    Some(mul_folded(Rc::clone(expr), add_folded(term1, term2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::evaluate;
    use ricis_ast::{Infinity, Rational};

    fn x() -> Rc<Expr> {
        Expr::var("x")
    }

    #[test]
    fn chain_rule_folds_unit_factors() {
        assert_eq!(differentiate(&Expr::sin(x()), "x").unwrap(), Expr::cos(x()));
        assert_eq!(differentiate(&x(), "x").unwrap(), Expr::num(1));
        assert_eq!(differentiate(&Expr::num(5), "x").unwrap(), Expr::num(0));
    }

    #[test]
    fn power_rule_with_constant_exponent() {
        // d/dx x^3 = 3 * x^2
        let d = differentiate(&Expr::pow(x(), Expr::num(3)), "x").unwrap();
        assert_eq!(d, Expr::mul(Expr::num(3), Expr::pow(x(), Expr::num(2))));
        // d/dx x^2 = 2 * x
        let d = differentiate(&Expr::pow(x(), Expr::num(2)), "x").unwrap();
        assert_eq!(d, Expr::mul(Expr::num(2), x()));
    }

    #[test]
    fn product_and_quotient_rules_evaluate_correctly() {
        // d/dx (x * exp(x)) = exp(x) + x exp(x)
        let e = Expr::mul(x(), Expr::exp(x()));
        let d = differentiate(&e, "x").unwrap();
        let v = evaluate(&d, "x", 0.5).unwrap();
        assert!((v - 1.5 * 0.5f64.exp()).abs() < 1e-12);

        // d/dx (sin(x) / x) at 1 = cos(1) - sin(1)
        let e = Expr::div(Expr::sin(x()), x());
        let d = differentiate(&e, "x").unwrap();
        let v = evaluate(&d, "x", 1.0).unwrap();
        assert!((v - (1f64.cos() - 1f64.sin())).abs() < 1e-12);
    }

    #[test]
    fn builtin_derivatives_match_finite_differences() {
        let h = 1e-6;
        for e in [
            Expr::tan(x()),
            Expr::sinh(Expr::mul(Expr::num(2), x())),
            Expr::cosh(x()),
            Expr::log(Expr::add(x(), Expr::num(3))),
            Expr::sqrt(Expr::add(x(), Expr::num(2))),
            Expr::cos(Expr::mul(x(), x())),
            Expr::pow(Expr::num(2), x()),
            Expr::pow(Expr::add(x(), Expr::num(2)), x()),
        ] {
            let d = differentiate(&e, "x").unwrap();
            let at = 0.3;
            let numeric = (evaluate(&e, "x", at + h).unwrap() - evaluate(&e, "x", at - h).unwrap()) / (2.0 * h);
            let symbolic = evaluate(&d, "x", at).unwrap();
            assert!((numeric - symbolic).abs() < 1e-5, "{e}: {symbolic} vs {numeric}");
        }
    }

    #[test]
    fn singularities_are_not_differentiable() {
        let inf = Expr::infinity(Infinity::identity(vec![ricis_ast::Root::exact("x", Rational::zero())]));
        assert_eq!(differentiate(&Expr::add(x(), inf), "x"), None);
    }
}
