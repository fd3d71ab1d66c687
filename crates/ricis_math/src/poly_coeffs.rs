//! Exact polynomial coefficient collection.
//!
//! Walks a tree once, carrying the current `(power, multiplier)` down into
//! each subtree, and accumulates `multiplier * c * var^power` for every leaf.
//! Products of two non-constant factors are expanded by convolution and
//! integer powers by repeated multiplication, so `(x - 1)^2 * (x + 2)` is
//! collected without any symbolic expansion pass.

use crate::error::MathError;
use crate::exact_eval::evaluate_constant;
use ricis_ast::{BinOp, BuiltinFn, Expr, Rational};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Map from degree to nonzero coefficient.
pub type Coefficients = BTreeMap<u32, Rational>;

/// Highest degree the collector will produce.
pub const MAX_DEGREE: u32 = 128;

/// Running position in the tree: everything below is multiplied by
/// `multiplier * var^power`.
#[derive(Debug, Clone)]
struct TermContext {
    power: u32,
    multiplier: Rational,
}

impl TermContext {
    fn root() -> Self {
        TermContext {
            power: 0,
            multiplier: Rational::one(),
        }
    }

    fn negated(&self) -> Self {
        TermContext {
            power: self.power,
            multiplier: -&self.multiplier,
        }
    }

    fn scaled(&self, k: &Rational) -> Self {
        TermContext {
            power: self.power,
            multiplier: &self.multiplier * k,
        }
    }
}

/// Collect the coefficients of `expr` as a polynomial in `var`.
///
/// Zero coefficients are pruned, so the zero polynomial is an empty map.
/// Fails with [`MathError::NotAPolynomial`] on any other variable, any
/// transcendental call, division by a non-constant, or a non-integer power.
pub fn collect_coefficients(expr: &Expr, var: &str) -> Result<Coefficients, MathError> {
    let mut out = Coefficients::new();
    collect_into(expr, var, &TermContext::root(), &mut out)?;
    out.retain(|_, c| !c.is_zero());
    Ok(out)
}

fn collect_into(
    expr: &Expr,
    var: &str,
    ctx: &TermContext,
    out: &mut Coefficients,
) -> Result<(), MathError> {
    match expr {
        Expr::Constant(c) => accumulate(out, var, ctx.power, &ctx.multiplier * c),
        Expr::Variable(name) if name == var => {
            accumulate(out, var, ctx.power + 1, ctx.multiplier.clone())
        }
        Expr::Binary(BinOp::Add, l, r) => {
            collect_into(l, var, ctx, out)?;
            collect_into(r, var, ctx, out)
        }
        Expr::Binary(BinOp::Sub, l, r) => {
            collect_into(l, var, ctx, out)?;
            collect_into(r, var, &ctx.negated(), out)
        }
        Expr::Binary(BinOp::Mul, l, r) => {
            let product = multiply(
                &collect_coefficients(l, var)?,
                &collect_coefficients(r, var)?,
                var,
            )?;
            merge_scaled(out, var, ctx, &product)
        }
        Expr::Binary(BinOp::Div, l, r) => {
            let divisor = collect_coefficients(r, var)?;
            match constant_only(&divisor) {
                Some(c) => collect_into(l, var, &ctx.scaled(&c.recip()?), out),
                None if divisor.is_empty() => Err(MathError::DivisionByZero),
                None => Err(MathError::not_polynomial(var)),
            }
        }
        Expr::Neg(e) => collect_into(e, var, &ctx.negated(), out),
        Expr::Call(BuiltinFn::Pow, args) => {
            let [base, exp] = args.as_slice() else {
                return Err(MathError::not_polynomial(var));
            };
            let n = evaluate_constant(exp)
                .and_then(|e| e.to_u32())
                .filter(|n| *n <= MAX_DEGREE)
                .ok_or_else(|| MathError::not_polynomial(var))?;
            let powered = power(&collect_coefficients(base, var)?, n, var)?;
            merge_scaled(out, var, ctx, &powered)
        }
        Expr::Variable(_) | Expr::Call(_, _) | Expr::Infinity(_) => {
            Err(MathError::not_polynomial(var))
        }
    }
}

fn accumulate(
    out: &mut Coefficients,
    var: &str,
    power: u32,
    value: Rational,
) -> Result<(), MathError> {
    if power > MAX_DEGREE {
        return Err(MathError::not_polynomial(var));
    }
    let slot = out.entry(power).or_default();
    *slot = &*slot + &value;
    Ok(())
}

fn merge_scaled(
    out: &mut Coefficients,
    var: &str,
    ctx: &TermContext,
    poly: &Coefficients,
) -> Result<(), MathError> {
    for (deg, c) in poly {
        accumulate(out, var, ctx.power + deg, &ctx.multiplier * c)?;
    }
    Ok(())
}

fn constant_only(poly: &Coefficients) -> Option<&Rational> {
    if poly.len() == 1 {
        poly.get(&0)
    } else {
        None
    }
}

/// Product of two coefficient maps.
pub fn multiply(a: &Coefficients, b: &Coefficients, var: &str) -> Result<Coefficients, MathError> {
    let mut out = Coefficients::new();
    for (i, x) in a {
        for (j, y) in b {
            accumulate(&mut out, var, i + j, x * y)?;
        }
    }
    out.retain(|_, c| !c.is_zero());
    Ok(out)
}

fn power(base: &Coefficients, n: u32, var: &str) -> Result<Coefficients, MathError> {
    let mut result = Coefficients::from([(0, Rational::one())]);
    for _ in 0..n {
        result = multiply(&result, base, var)?;
    }
    Ok(result)
}

pub fn degree(poly: &Coefficients) -> Option<u32> {
    poly.keys().next_back().copied()
}

pub fn leading_coefficient(poly: &Coefficients) -> Option<&Rational> {
    poly.values().next_back()
}

/// Build an expression tree from coefficients, highest degree first.
///
/// Unit coefficients are omitted and degrees above one use `pow(var, n)`.
/// Negative terms after the first are subtracted by magnitude, so the result
/// reads `x^2 - 3 * x - 1`. The zero polynomial is the constant `0`.
pub fn to_expr(poly: &Coefficients, var: &str) -> Rc<Expr> {
    let mut out: Option<Rc<Expr>> = None;
    for (&deg, coeff) in poly.iter().rev() {
        if coeff.is_zero() {
            continue;
        }
        out = Some(match out {
            None => monomial(coeff, deg, var),
            Some(acc) if coeff.is_negative() => Expr::sub(acc, monomial(&coeff.abs(), deg, var)),
            Some(acc) => Expr::add(acc, monomial(coeff, deg, var)),
        });
    }
    out.unwrap_or_else(|| Expr::num(0))
}

fn monomial(coeff: &Rational, deg: u32, var: &str) -> Rc<Expr> {
    if deg == 0 {
        return Expr::rational(coeff.clone());
    }
    let var_part = if deg == 1 {
        Expr::var(var)
    } else {
        Expr::pow(Expr::var(var), Expr::num(i64::from(deg)))
    };

    if coeff.is_one() {
        var_part
    } else if *coeff == -Rational::one() {
        Expr::neg(var_part)
    } else {
        Expr::mul(Expr::rational(coeff.clone()), var_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Rc<Expr> {
        Expr::var("x")
    }

    fn coeffs(pairs: &[(u32, i64)]) -> Coefficients {
        pairs.iter().map(|&(d, c)| (d, Rational::from(c))).collect()
    }

    #[test]
    fn collects_sums_and_products() {
        // x*x - 1
        let e = Expr::sub(Expr::mul(x(), x()), Expr::num(1));
        assert_eq!(collect_coefficients(&e, "x").unwrap(), coeffs(&[(0, -1), (2, 1)]));
    }

    #[test]
    fn expands_integer_powers() {
        // (x - 1)^2 * (x + 2) = x^3 - 3x + 2
        let e = Expr::mul(
            Expr::pow(Expr::sub(x(), Expr::num(1)), Expr::num(2)),
            Expr::add(x(), Expr::num(2)),
        );
        assert_eq!(
            collect_coefficients(&e, "x").unwrap(),
            coeffs(&[(0, 2), (1, -3), (3, 1)])
        );
    }

    #[test]
    fn negation_and_constant_division() {
        // -(3x - 6) / 3 = -x + 2
        let e = Expr::div(
            Expr::neg(Expr::sub(Expr::mul(Expr::num(3), x()), Expr::num(6))),
            Expr::num(3),
        );
        assert_eq!(collect_coefficients(&e, "x").unwrap(), coeffs(&[(0, 2), (1, -1)]));
    }

    #[test]
    fn cancelling_terms_are_pruned() {
        let e = Expr::sub(x(), x());
        assert!(collect_coefficients(&e, "x").unwrap().is_empty());
    }

    #[test]
    fn non_polynomials_are_rejected() {
        let not_poly = MathError::NotAPolynomial { var: "x".into() };
        for e in [
            Expr::sin(x()),
            Expr::div(Expr::num(1), x()),
            Expr::pow(x(), Expr::rational(Rational::from_ratio(1, 2).unwrap())),
            Expr::add(x(), Expr::var("y")),
            Expr::pow(x(), Expr::num(1000)),
        ] {
            assert_eq!(collect_coefficients(&e, "x"), Err(not_poly.clone()), "{e}");
        }
        assert_eq!(
            collect_coefficients(&Expr::div(x(), Expr::num(0)), "x"),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn rebuilds_expressions_highest_degree_first() {
        assert_eq!(to_expr(&coeffs(&[(0, 1), (1, 1)]), "x"), Expr::add(x(), Expr::num(1)));
        assert_eq!(
            to_expr(&coeffs(&[(0, 5), (2, -1), (3, 2)]), "x").to_string(),
            "2 * x^3 - x^2 + 5"
        );
        assert_eq!(
            to_expr(&coeffs(&[(0, -2), (1, -1)]), "x"),
            Expr::sub(Expr::neg(x()), Expr::num(2))
        );
        assert_eq!(
            to_expr(&coeffs(&[(0, -1), (1, -3), (2, 1)]), "x").to_string(),
            "x^2 - 3 * x - 1"
        );
        assert_eq!(to_expr(&Coefficients::new(), "x"), Expr::num(0));
        assert_eq!(degree(&coeffs(&[(0, 5), (4, 1)])), Some(4));
        assert_eq!(leading_coefficient(&coeffs(&[(0, 5), (4, 7)])), Some(&Rational::from(7)));
    }
}
