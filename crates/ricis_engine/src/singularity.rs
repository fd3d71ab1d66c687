//! Classification and arithmetic helpers for singularity nodes.
//!
//! A lazy singularity `∞_{k}` at a single root resolves by evaluating its
//! index `k` there: an exact zero means the division was `0/0` (identity), a
//! value that is provably nonzero makes it a pole, and anything else is an
//! error state. Several roots always give the error state, since one index
//! cannot describe distinct points.

use crate::error::CasError;
use crate::options::SimplifyOptions;
use ricis_ast::traversal::collect_variables;
use ricis_ast::{Expr, Infinity, InfinityKind, Rational, Root, RootValue};
use ricis_math::{
    evaluate_constant, evaluate_finite, find_roots_with, project_infinity, try_evaluate_exact,
};
use std::rc::Rc;

/// Value of an expression at a root: exact when both the root and the
/// evaluation are exact, floating-point otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum PointValue {
    Exact(Rational),
    Approx(f64),
}

impl PointValue {
    pub fn is_exact(&self) -> bool {
        matches!(self, PointValue::Exact(_))
    }

    /// Exact zero, or an approximation within `tolerance` of zero.
    pub fn is_zero_within(&self, tolerance: f64) -> bool {
        match self {
            PointValue::Exact(r) => r.is_zero(),
            PointValue::Approx(v) => v.abs() <= tolerance,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            PointValue::Exact(r) => r.to_f64(),
            PointValue::Approx(v) => *v,
        }
    }

    /// Constant node for this value. Approximations are recovered as a small
    /// fraction when possible, otherwise as the exact binary value.
    pub fn to_constant(&self) -> Option<Rc<Expr>> {
        let value = match self {
            PointValue::Exact(r) => r.clone(),
            PointValue::Approx(v) => Rational::approximate_f64(*v, 1_000_000, 1e-12)
                .or_else(|| Rational::from_f64_exact(*v))?,
        };
        Some(Expr::rational(value))
    }
}

/// Evaluate `expr` at `root`, exactly when the root is exact and the
/// expression allows it.
pub fn evaluate_at_root(expr: &Expr, root: &Root) -> Option<PointValue> {
    if let RootValue::Exact(value) = &root.value {
        if let Some(exact) = try_evaluate_exact(expr, &root.var, value) {
            return Some(PointValue::Exact(exact));
        }
    }
    evaluate_finite(expr, &root.var, root.to_f64())
        .ok()
        .map(PointValue::Approx)
}

/// Classify a lazy singularity. Already classified nodes come back unchanged.
pub fn resolve(inf: &Infinity, opts: &SimplifyOptions) -> Infinity {
    if !inf.is_lazy() {
        return inf.clone();
    }
    let index = inf.index();
    let roots = inf.roots().to_vec();
    let Some(root) = inf.single_root() else {
        tracing::debug!(target: "singularity", roots = roots.len(), "multiple_roots");
        return Infinity::error(Rc::clone(index), roots);
    };

    let resolved = match evaluate_at_root(index, root) {
        Some(PointValue::Exact(v)) if v.is_zero() => Infinity::identity(roots),
        Some(value @ PointValue::Exact(_)) => pole(index, roots, &value, opts),
        Some(value @ PointValue::Approx(_)) if !value.is_zero_within(opts.zero_tolerance) => {
            pole(index, roots, &value, opts)
        }
        Some(PointValue::Approx(v)) => {
            tracing::debug!(target: "singularity", root = %root, value = v, "near_zero_index");
            Infinity::error(Rc::clone(index), roots)
        }
        None => Infinity::error(Rc::clone(index), roots),
    };
    tracing::trace!(target: "singularity", kind = resolved.kind().name(), "resolved");
    resolved
}

fn pole(index: &Rc<Expr>, roots: Vec<Root>, value: &PointValue, opts: &SimplifyOptions) -> Infinity {
    let numerator_roots = match collect_variables(index).into_iter().next() {
        Some(var) => find_roots_with(index, &var, &opts.roots),
        None => Vec::new(),
    };
    tracing::trace!(target: "singularity", index_value = value.to_f64(), "pole");
    Infinity::pole(Rc::clone(index), roots, numerator_roots)
}

/// Classic floating-point value of a singularity.
///
/// Lazy nodes are classified with default options first. Identity gives `1`,
/// a pole gives `±inf` by the sign of its index at the root.
pub fn classic_projection(inf: &Infinity) -> Result<f64, CasError> {
    let resolved = resolve(inf, &SimplifyOptions::default());
    if matches!(resolved.kind(), InfinityKind::Error) {
        return Err(CasError::IndeterminateAmbiguous {
            roots: resolved.roots().to_vec(),
        });
    }
    Ok(project_infinity(&resolved)?)
}

/// Two singularities describe the same point when their first roots share a
/// variable and lie within `tolerance` of each other.
pub fn roots_compatible(a: &Infinity, b: &Infinity, tolerance: f64) -> bool {
    match (a.roots().first(), b.roots().first()) {
        (Some(ra), Some(rb)) => {
            if ra.var != rb.var {
                return false;
            }
            match (ra.value.as_exact(), rb.value.as_exact()) {
                (Some(x), Some(y)) => x == y,
                _ => (ra.to_f64() - rb.to_f64()).abs() <= tolerance,
            }
        }
        (None, None) => true,
        _ => false,
    }
}

/// `e / e` for a structurally repeated operand.
///
/// A constant nonzero `e` gives `1`. In a single variable, `1` when `e` has
/// no roots and an identity singularity at its roots otherwise. Anything
/// else is left alone.
pub fn fold_self_division(e: &Rc<Expr>, opts: &SimplifyOptions) -> Option<Rc<Expr>> {
    let vars = collect_variables(e);
    let mut vars = vars.into_iter();
    match (vars.next(), vars.next()) {
        (None, _) => match evaluate_constant(e) {
            Some(c) if !c.is_zero() => Some(Expr::num(1)),
            _ => None,
        },
        (Some(var), None) => {
            let roots = find_roots_with(e, &var, &opts.roots);
            if roots.is_empty() {
                Some(Expr::num(1))
            } else {
                Some(Expr::infinity(Infinity::identity(roots)))
            }
        }
        _ => None,
    }
}
