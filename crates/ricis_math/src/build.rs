//! Build helpers for expression construction.
//!
//! The `*_folded` builders apply the local identities that never change the
//! value of an expression away from singular points: constant arithmetic,
//! `0 + x`, `x - 0`, `1 * x`, `0 * x`, `x / 1` and double negation. They look
//! only at the node being built, never into the operands.

use ricis_ast::{BinOp, Expr};
use std::rc::Rc;

/// The folded form of `l op r`, or `None` when no identity applies.
///
/// Constant division by zero is never folded.
pub fn try_fold_binary(op: BinOp, l: &Rc<Expr>, r: &Rc<Expr>) -> Option<Rc<Expr>> {
    if let (Some(a), Some(b)) = (l.as_constant(), r.as_constant()) {
        let value = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a.checked_div(b).ok()?,
        };
        return Some(Expr::rational(value));
    }

    match op {
        BinOp::Add if l.is_constant_zero() => Some(Rc::clone(r)),
        BinOp::Add | BinOp::Sub if r.is_constant_zero() => Some(Rc::clone(l)),
        BinOp::Mul if l.is_constant_zero() || r.is_constant_zero() => Some(Expr::num(0)),
        BinOp::Mul if l.is_constant_one() => Some(Rc::clone(r)),
        BinOp::Mul | BinOp::Div if r.is_constant_one() => Some(Rc::clone(l)),
        _ => None,
    }
}

/// The folded form of `-e`, or `None` when no identity applies.
pub fn try_fold_neg(e: &Rc<Expr>) -> Option<Rc<Expr>> {
    match e.as_ref() {
        Expr::Constant(c) => Some(Expr::rational(-c)),
        Expr::Neg(inner) => Some(Rc::clone(inner)),
        _ => None,
    }
}

pub fn binary_folded(op: BinOp, l: Rc<Expr>, r: Rc<Expr>) -> Rc<Expr> {
    try_fold_binary(op, &l, &r).unwrap_or_else(|| Expr::binary(op, l, r))
}

#[inline]
pub fn add_folded(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Expr> {
    binary_folded(BinOp::Add, l, r)
}

#[inline]
pub fn sub_folded(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Expr> {
    binary_folded(BinOp::Sub, l, r)
}

#[inline]
pub fn mul_folded(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Expr> {
    binary_folded(BinOp::Mul, l, r)
}

#[inline]
pub fn div_folded(l: Rc<Expr>, r: Rc<Expr>) -> Rc<Expr> {
    binary_folded(BinOp::Div, l, r)
}

pub fn neg_folded(e: Rc<Expr>) -> Rc<Expr> {
    try_fold_neg(&e).unwrap_or_else(|| Expr::neg(e))
}
