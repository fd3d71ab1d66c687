//! Floating-point evaluation of single-variable expressions.
//!
//! Root scans evaluate the same expression hundreds of times, so the tree is
//! first compiled into a closure and then called per sample point.

use crate::error::MathError;
use ricis_ast::{BinOp, BuiltinFn, Expr, Infinity, InfinityKind};
use std::fmt;
use std::rc::Rc;

type Closure = Box<dyn Fn(f64) -> f64>;

/// A tree compiled to a function of one variable.
///
/// Division by zero and domain errors follow IEEE semantics (`inf`, `NaN`).
pub struct CompiledExpr {
    func: Closure,
}

impl CompiledExpr {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        (self.func)(x)
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompiledExpr(..)")
    }
}

/// Compile `expr` into a closure of `var`.
///
/// Fails on variables other than `var` and on singularities that have no
/// classic value.
pub fn compile(expr: &Expr, var: &str) -> Result<CompiledExpr, MathError> {
    Ok(CompiledExpr {
        func: build(expr, var)?,
    })
}

/// Compile and evaluate once.
pub fn evaluate(expr: &Expr, var: &str, value: f64) -> Result<f64, MathError> {
    Ok(compile(expr, var)?.eval(value))
}

/// Like [`evaluate`] but rejects `inf` and `NaN` results.
pub fn evaluate_finite(expr: &Expr, var: &str, value: f64) -> Result<f64, MathError> {
    let v = evaluate(expr, var, value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MathError::NonFiniteResult)
    }
}

/// Classic floating-point value of a resolved singularity.
///
/// `Identity` (0/0) projects to `1`; a `Pole` projects to its index value
/// at the root times `+inf`. Unresolved and error states have no value.
pub fn project_infinity(inf: &Infinity) -> Result<f64, MathError> {
    match inf.kind() {
        InfinityKind::Identity => Ok(1.0),
        InfinityKind::Pole { .. } => {
            let root = inf.single_root().ok_or_else(|| {
                MathError::Unsupported("pole without a single root".to_string())
            })?;
            let k = evaluate(inf.index(), &root.var, root.to_f64())?;
            Ok(k * f64::INFINITY)
        }
        kind @ (InfinityKind::Lazy | InfinityKind::Error) => Err(MathError::Unsupported(
            format!("{} singularity has no classic value", kind.name()),
        )),
    }
}

fn build(expr: &Expr, var: &str) -> Result<Closure, MathError> {
    let closure: Closure = match expr {
        Expr::Constant(c) => {
            let v = c.to_f64();
            Box::new(move |_| v)
        }
        Expr::Variable(name) if name == var => Box::new(|x| x),
        Expr::Variable(name) => {
            return Err(MathError::UnboundVariable { name: name.clone() });
        }
        Expr::Binary(op, l, r) => {
            let l = build(l, var)?;
            let r = build(r, var)?;
            match op {
                BinOp::Add => Box::new(move |x| l(x) + r(x)),
                BinOp::Sub => Box::new(move |x| l(x) - r(x)),
                BinOp::Mul => Box::new(move |x| l(x) * r(x)),
                BinOp::Div => Box::new(move |x| l(x) / r(x)),
            }
        }
        Expr::Neg(e) => {
            let e = build(e, var)?;
            Box::new(move |x| -e(x))
        }
        Expr::Call(func, args) => build_call(*func, args, var)?,
        Expr::Infinity(inf) => {
            let v = project_infinity(inf)?;
            Box::new(move |_| v)
        }
    };
    Ok(closure)
}

fn build_call(func: BuiltinFn, args: &[Rc<Expr>], var: &str) -> Result<Closure, MathError> {
    match (func, args) {
        (BuiltinFn::Pow, [base, exp]) => {
            let base = build(base, var)?;
            let exp = build(exp, var)?;
            Ok(Box::new(move |x| base(x).powf(exp(x))))
        }
        (_, [arg]) => {
            let f = unary_fn(func).ok_or_else(|| arity_error(func, args.len()))?;
            let arg = build(arg, var)?;
            Ok(Box::new(move |x| f(arg(x))))
        }
        _ => Err(arity_error(func, args.len())),
    }
}

fn unary_fn(func: BuiltinFn) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match func {
        BuiltinFn::Sin => f64::sin,
        BuiltinFn::Cos => f64::cos,
        BuiltinFn::Tan => f64::tan,
        BuiltinFn::Sinh => f64::sinh,
        BuiltinFn::Cosh => f64::cosh,
        BuiltinFn::Log => f64::ln,
        BuiltinFn::Exp => f64::exp,
        BuiltinFn::Sqrt => f64::sqrt,
        BuiltinFn::Pow => return None,
    };
    Some(f)
}

fn arity_error(func: BuiltinFn, got: usize) -> MathError {
    MathError::Unsupported(format!(
        "{func} expects {} argument(s), got {got}",
        func.arity()
    ))
}
