//! Root finding for single-variable expressions.
//!
//! Strategy, in order:
//!
//! 1. **Polynomials**: collect exact coefficients, strip factors of `x`,
//!    extract every rational root (Rational Root Theorem plus deflation),
//!    then close a quadratic residual with the discriminant. All of these
//!    roots are exact unless the discriminant is not a perfect square.
//! 2. **Structural recognizers**: `sin(kx+b)`, `tan`, `sinh`, `sqrt`,
//!    `log(kx+b)`, `exp(kx+b) - c`, `cos(kx+b)`, products and negations.
//!    Only the principal zero of a periodic function is reported.
//! 3. **Numeric scan**: sample a fixed window, bisect every sign change and
//!    tag the results as approximate.
//!
//! The result is deduplicated and sorted ascending.

use crate::exact_eval::evaluate_constant;
use crate::linear_form::linear_form;
use crate::numeric::{compile, CompiledExpr};
use crate::poly_coeffs::{collect_coefficients, degree, to_expr, Coefficients};
use crate::rational_roots::find_rational_roots;
use ricis_ast::{BinOp, BuiltinFn, Expr, Rational, Root};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, trace};

/// Hard cap on bisection halvings, independent of the tolerance.
const MAX_BISECTION_STEPS: usize = 200;

/// Tunables for [`find_roots_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct RootSearchOptions {
    /// Lower bound of the numeric scan window.
    pub scan_min: f64,
    /// Upper bound of the numeric scan window.
    pub scan_max: f64,
    /// Distance between consecutive scan samples.
    pub scan_step: f64,
    /// Bisection stops once the bracket is narrower than this.
    pub bisection_tol: f64,
    /// Rational Root Theorem gives up beyond this many candidates.
    pub max_candidates: usize,
    /// Roots equal after rounding to this many decimals are merged.
    pub dedup_decimals: u32,
}

impl Default for RootSearchOptions {
    fn default() -> Self {
        Self {
            scan_min: -10.0,
            scan_max: 10.0,
            scan_step: 0.05,
            bisection_tol: 1e-6,
            max_candidates: 512,
            dedup_decimals: 4,
        }
    }
}

/// Roots of `expr` in `var` with default options.
pub fn find_roots(expr: &Expr, var: &str) -> Vec<Root> {
    find_roots_with(expr, var, &RootSearchOptions::default())
}

/// Roots of `expr` in `var`, deduplicated and sorted ascending.
///
/// A nonzero constant has no roots. Never fails; an expression that cannot
/// be analysed yields whatever the numeric scan finds, possibly nothing.
pub fn find_roots_with(expr: &Expr, var: &str, opts: &RootSearchOptions) -> Vec<Root> {
    let roots = match collect_coefficients(expr, var) {
        Ok(coeffs) if !coeffs.is_empty() => {
            polynomial_roots(&coeffs, var, opts).unwrap_or_else(|| {
                debug!(target: "roots", expr = %expr, "polynomial_fallback_numeric");
                numeric_roots(expr, var, opts)
            })
        }
        Ok(_) => numeric_roots(expr, var, opts),
        Err(_) => {
            let structural = structural_roots(expr, var, opts);
            if structural.is_empty() {
                numeric_roots(expr, var, opts)
            } else {
                structural
            }
        }
    };

    let roots = dedup_roots(roots, opts.dedup_decimals);
    trace!(target: "roots", expr = %expr, count = roots.len(), "roots_found");
    roots
}

/// Exact-first roots of a nonzero polynomial.
///
/// `None` means no closed-form root was found and the residual has degree
/// three or more; the caller should fall back to the numeric scan.
fn polynomial_roots(
    coeffs: &Coefficients,
    var: &str,
    opts: &RootSearchOptions,
) -> Option<Vec<Root>> {
    let deg = degree(coeffs)?;
    if deg == 0 {
        return Some(vec![]);
    }

    let dense: Vec<Rational> = (0..=deg)
        .map(|d| coeffs.get(&d).cloned().unwrap_or_default())
        .collect();
    let (rational, residual) = find_rational_roots(dense, opts.max_candidates);

    let mut roots: Vec<Root> = rational.into_iter().map(|r| Root::exact(var, r)).collect();

    match residual.len() {
        0 | 1 => {}
        2 => {
            if let Some(r) = residual_linear_root(&residual) {
                roots.push(Root::exact(var, r));
            }
        }
        3 => roots.extend(quadratic_roots(&residual, var)),
        _ if roots.is_empty() => return None,
        _ => {
            let residual_map: Coefficients = residual
                .into_iter()
                .enumerate()
                .filter(|(_, c)| !c.is_zero())
                .map(|(d, c)| (d as u32, c))
                .collect();
            roots.extend(numeric_roots(&to_expr(&residual_map, var), var, opts));
        }
    }

    Some(roots)
}

fn residual_linear_root(residual: &[Rational]) -> Option<Rational> {
    let [c0, c1] = residual else {
        return None;
    };
    (-c0).checked_div(c1).ok()
}

/// Real roots of `c0 + c1*x + c2*x^2`.
///
/// Exact when the discriminant is a perfect square, approximate otherwise.
pub fn quadratic_roots(coeffs: &[Rational], var: &str) -> Vec<Root> {
    let [c, b, a] = coeffs else {
        return vec![];
    };
    if a.is_zero() {
        return vec![];
    }

    let disc = &(b * b) - &(&Rational::from(4) * &(a * c));
    if disc.is_negative() {
        return vec![];
    }
    let two_a = &Rational::from(2) * a;

    match disc.sqrt_exact() {
        Some(s) => {
            let mut out = Vec::with_capacity(2);
            for num in [&(-b) - &s, &(-b) + &s] {
                if let Ok(r) = num.checked_div(&two_a) {
                    out.push(Root::exact(var, r));
                }
            }
            if s.is_zero() {
                out.truncate(1);
            }
            out
        }
        None => {
            let sq = disc.to_f64().sqrt();
            let (b, two_a) = (b.to_f64(), two_a.to_f64());
            vec![
                Root::approx(var, (-b - sq) / two_a),
                Root::approx(var, (-b + sq) / two_a),
            ]
        }
    }
}

/// Roots read off the shape of a non-polynomial expression.
fn structural_roots(expr: &Expr, var: &str, opts: &RootSearchOptions) -> Vec<Root> {
    match expr {
        Expr::Call(BuiltinFn::Pow, args) => match args.as_slice() {
            [base, exp] if evaluate_constant(exp).is_some_and(|e| e.is_positive()) => {
                factor_roots(base, var, opts)
            }
            _ => vec![],
        },
        Expr::Call(func, args) => match args.as_slice() {
            [arg] => call_roots(*func, arg, var),
            _ => vec![],
        },
        Expr::Binary(BinOp::Sub, l, r) => match (l.as_ref(), evaluate_constant(r)) {
            (Expr::Call(BuiltinFn::Exp, args), Some(c)) => match args.as_slice() {
                [arg] => exp_level_roots(arg, &c, var),
                _ => vec![],
            },
            _ => vec![],
        },
        Expr::Binary(BinOp::Mul, l, r) => {
            let mut roots = factor_roots(l, var, opts);
            roots.extend(factor_roots(r, var, opts));
            roots
        }
        Expr::Neg(inner) => structural_roots(inner, var, opts),
        _ => vec![],
    }
}

/// Roots of one factor of a product.
fn factor_roots(factor: &Expr, var: &str, opts: &RootSearchOptions) -> Vec<Root> {
    match collect_coefficients(factor, var) {
        Ok(coeffs) if !coeffs.is_empty() => polynomial_roots(&coeffs, var, opts)
            .unwrap_or_else(|| numeric_roots(factor, var, opts)),
        Ok(_) => vec![],
        Err(_) => structural_roots(factor, var, opts),
    }
}

/// Principal zero of a unary builtin applied to a linear argument `kx + b`.
fn call_roots(func: BuiltinFn, arg: &Expr, var: &str) -> Vec<Root> {
    let Some(lf) = linear_form(arg, var).filter(|lf| !lf.coef.is_zero()) else {
        return vec![];
    };

    let root = match func {
        BuiltinFn::Sin | BuiltinFn::Tan | BuiltinFn::Sinh | BuiltinFn::Sqrt => {
            lf.zero().map(|r| Root::exact(var, r))
        }
        BuiltinFn::Log => lf.solve_for(&Rational::one()).map(|r| Root::exact(var, r)),
        BuiltinFn::Cos => {
            let (k, b) = (lf.coef.to_f64(), lf.constant.to_f64());
            Some(Root::approx(var, (FRAC_PI_2 - b) / k))
        }
        BuiltinFn::Cosh | BuiltinFn::Exp | BuiltinFn::Pow => None,
    };
    root.into_iter().collect()
}

/// Solution of `exp(kx + b) = c`.
fn exp_level_roots(arg: &Expr, c: &Rational, var: &str) -> Vec<Root> {
    if !c.is_positive() {
        return vec![];
    }
    let Some(lf) = linear_form(arg, var).filter(|lf| !lf.coef.is_zero()) else {
        return vec![];
    };
    if c.is_one() {
        return lf.zero().map(|r| Root::exact(var, r)).into_iter().collect();
    }
    let (k, b) = (lf.coef.to_f64(), lf.constant.to_f64());
    vec![Root::approx(var, (c.to_f64().ln() - b) / k)]
}

/// Scan `[scan_min, scan_max]` and bisect every sign change.
///
/// Sign changes across a pole are rejected: after bisection the function
/// must be smaller in magnitude than at both ends of the bracket.
pub fn numeric_roots(expr: &Expr, var: &str, opts: &RootSearchOptions) -> Vec<Root> {
    let Ok(f) = compile(expr, var) else {
        return vec![];
    };
    let span = opts.scan_max - opts.scan_min;
    if !(opts.scan_step > 0.0 && span.is_finite() && span > 0.0) {
        return vec![];
    }
    let steps = (span / opts.scan_step).round() as usize;

    let mut roots = Vec::new();
    let mut prev_x = opts.scan_min;
    let mut prev = f.eval(prev_x);
    if prev == 0.0 {
        roots.push(Root::approx(var, prev_x));
    }

    for i in 1..=steps {
        let x = opts.scan_min + i as f64 * opts.scan_step;
        let fx = f.eval(x);
        if fx == 0.0 {
            roots.push(Root::approx(var, x));
        } else if prev.is_finite() && fx.is_finite() && prev * fx < 0.0 {
            if let Some(r) = bisection(&f, prev_x, x, opts.bisection_tol) {
                let fr = f.eval(r).abs();
                if fr <= prev.abs().min(fx.abs()) {
                    roots.push(Root::approx(var, r));
                } else {
                    trace!(target: "roots", at = r, "pole_crossing_rejected");
                }
            }
        }
        prev_x = x;
        prev = fx;
    }

    roots
}

/// Bisect `[a, b]` until it is narrower than `tol`.
///
/// Requires a strict sign change at the endpoints; returns `None` otherwise
/// or when a midpoint evaluates to `NaN`.
pub fn bisection(f: &CompiledExpr, a: f64, b: f64, tol: f64) -> Option<f64> {
    let (mut a, mut b) = (a, b);
    let mut fa = f.eval(a);
    let fb = f.eval(b);
    if !(fa.is_finite() && fb.is_finite()) || fa * fb >= 0.0 {
        return None;
    }

    for _ in 0..MAX_BISECTION_STEPS {
        if b - a <= tol {
            break;
        }
        let mid = 0.5 * (a + b);
        let fm = f.eval(mid);
        if fm.is_nan() {
            return None;
        }
        if fm == 0.0 {
            return Some(mid);
        }
        if fa * fm < 0.0 {
            b = mid;
        } else {
            a = mid;
            fa = fm;
        }
    }

    Some(0.5 * (a + b))
}

/// Merge roots that agree to `decimals` places, preferring exact ones, and
/// sort ascending.
pub fn dedup_roots(roots: Vec<Root>, decimals: u32) -> Vec<Root> {
    let scale = 10f64.powi(decimals as i32);
    let key = |r: &Root| (r.to_f64() * scale).round();

    let mut out: Vec<Root> = Vec::with_capacity(roots.len());
    for root in roots {
        let k = key(&root);
        match out.iter_mut().find(|r| r.var == root.var && key(r) == k) {
            Some(existing) => {
                if !existing.is_exact() && root.is_exact() {
                    *existing = root;
                }
            }
            None => out.push(root),
        }
    }

    out.sort_by(|a, b| a.to_f64().total_cmp(&b.to_f64()));
    out
}
