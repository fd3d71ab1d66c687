//! Exact rational evaluation.
//!
//! Evaluates a tree over exact rationals at a rational point. Transcendental
//! functions are only evaluable at the handful of arguments where their value
//! is rational (`sin(0)`, `cos(0)`, `exp(0)`, `log(1)`, ...). Anything else is
//! reported as [`MathError::Unsupported`], which callers read as "not provable".

use crate::error::MathError;
use ricis_ast::{BinOp, BuiltinFn, Expr, Rational};

/// Exponents beyond this are not expanded exactly.
const MAX_EXACT_EXPONENT: u32 = 1024;

/// Evaluate `expr` exactly, binding `var` to `value` when given.
///
/// With `binding = None` the expression must be variable-free.
pub fn evaluate_exact(
    expr: &Expr,
    binding: Option<(&str, &Rational)>,
) -> Result<Rational, MathError> {
    match expr {
        Expr::Constant(c) => Ok(c.clone()),
        Expr::Variable(name) => match binding {
            Some((var, value)) if var == name => Ok(value.clone()),
            _ => Err(MathError::UnboundVariable { name: name.clone() }),
        },
        Expr::Binary(op, l, r) => {
            let a = evaluate_exact(l, binding)?;
            let b = evaluate_exact(r, binding)?;
            match op {
                BinOp::Add => Ok(a + b),
                BinOp::Sub => Ok(a - b),
                BinOp::Mul => Ok(a * b),
                BinOp::Div => Ok(a.checked_div(&b)?),
            }
        }
        Expr::Neg(e) => Ok(-evaluate_exact(e, binding)?),
        Expr::Call(func, args) => evaluate_call(*func, args, binding),
        Expr::Infinity(_) => Err(MathError::Unsupported(
            "singularity has no exact value".to_string(),
        )),
    }
}

fn evaluate_call(
    func: BuiltinFn,
    args: &[std::rc::Rc<Expr>],
    binding: Option<(&str, &Rational)>,
) -> Result<Rational, MathError> {
    if let (BuiltinFn::Pow, [base, exp]) = (func, args) {
        let base = evaluate_exact(base, binding)?;
        let exp = evaluate_exact(exp, binding)?;
        return exact_power(&base, &exp);
    }

    let [arg] = args else {
        return Err(MathError::Unsupported(format!(
            "{func} expects {} argument(s), got {}",
            func.arity(),
            args.len()
        )));
    };
    let a = evaluate_exact(arg, binding)?;
    let no_exact_value = || MathError::Unsupported(format!("{func}({a}) has no exact value"));

    match func {
        BuiltinFn::Sin | BuiltinFn::Tan | BuiltinFn::Sinh if a.is_zero() => Ok(Rational::zero()),
        BuiltinFn::Cos | BuiltinFn::Cosh | BuiltinFn::Exp if a.is_zero() => Ok(Rational::one()),
        BuiltinFn::Log if a.is_one() => Ok(Rational::zero()),
        BuiltinFn::Sqrt => a.sqrt_exact().ok_or_else(no_exact_value),
        _ => Err(no_exact_value()),
    }
}

fn exact_power(base: &Rational, exp: &Rational) -> Result<Rational, MathError> {
    let n = exp
        .abs()
        .to_u32()
        .filter(|n| *n <= MAX_EXACT_EXPONENT)
        .ok_or_else(|| MathError::Unsupported(format!("{base}^{exp} has no exact value")))?;
    let magnitude = base.pow(n);
    if exp.is_negative() {
        Ok(magnitude.recip()?)
    } else {
        Ok(magnitude)
    }
}

/// Exact value of `expr` at `var = value`, or `None` if it is not provably rational.
pub fn try_evaluate_exact(expr: &Expr, var: &str, value: &Rational) -> Option<Rational> {
    evaluate_exact(expr, Some((var, value))).ok()
}

/// Exact value of a variable-free expression.
pub fn evaluate_constant(expr: &Expr) -> Option<Rational> {
    evaluate_exact(expr, None).ok()
}
