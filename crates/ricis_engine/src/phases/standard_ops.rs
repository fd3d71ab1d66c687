//! Folding and singularity arithmetic.
//!
//! Two singularities at the same point combine through their indexes:
//! `∞_a ∘ ∞_b = ∞_{a ∘ b}` for `+ - *`, and `∞_a / ∞_b = a / b`. A scalar
//! factor or divisor folds into the index. Merges are tried before the
//! identity folds, so `0 * ∞_a` is a singularity with index `0`, not `0`.
//! Every lazy singularity met on the way is classified.

use super::Pass;
use crate::options::SimplifyOptions;
use crate::phase::SimplifyPhase;
use crate::singularity::{fold_self_division, resolve, roots_compatible};
use ricis_ast::visitor::rebuild_binary;
use ricis_ast::{BinOp, Expr, Infinity, Transformer};
use ricis_math::build::{binary_folded, try_fold_binary, try_fold_neg};
use ricis_math::evaluate_constant;
use std::rc::Rc;

pub struct StandardOperations<'a> {
    opts: &'a SimplifyOptions,
    rewrites: usize,
}

impl<'a> StandardOperations<'a> {
    pub fn new(opts: &'a SimplifyOptions) -> Self {
        Self { opts, rewrites: 0 }
    }

    fn lazy_resolved(&self, index: Rc<Expr>, like: &Infinity) -> Rc<Expr> {
        let roots = like.roots().to_vec();
        // A zero index is 0/0 at every root, however many there are
        if index.is_constant_zero() {
            return Expr::infinity(Infinity::identity(roots));
        }
        Expr::infinity(resolve(&Infinity::lazy(index, roots), self.opts))
    }

    fn merge_singularities(&self, op: BinOp, l: &Rc<Expr>, r: &Rc<Expr>) -> Option<Rc<Expr>> {
        match (l.as_infinity(), r.as_infinity()) {
            (Some(a), Some(b)) => {
                if !roots_compatible(a, b, self.opts.root_match_tolerance) {
                    return None;
                }
                // Dividing by a zero index has no finite quotient
                if op == BinOp::Div && evaluate_constant(b.index()).is_some_and(|c| c.is_zero()) {
                    tracing::debug!(target: "singularity", index = %a.index(), "zero_index_divisor");
                    return Some(Expr::infinity(Infinity::error(
                        Rc::clone(a.index()),
                        a.roots().to_vec(),
                    )));
                }
                let index = binary_folded(op, Rc::clone(a.index()), Rc::clone(b.index()));
                tracing::debug!(target: "singularity", op = op.symbol(), %index, "merge");
                match op {
                    BinOp::Div => Some(index),
                    _ => Some(self.lazy_resolved(index, a)),
                }
            }
            (Some(a), None) if matches!(op, BinOp::Mul | BinOp::Div) => {
                let index = binary_folded(op, Rc::clone(a.index()), Rc::clone(r));
                Some(self.lazy_resolved(index, a))
            }
            (None, Some(b)) if op == BinOp::Mul => {
                let index = binary_folded(op, Rc::clone(l), Rc::clone(b.index()));
                Some(self.lazy_resolved(index, b))
            }
            _ => None,
        }
    }

    fn fold_binary(&self, op: BinOp, l: &Rc<Expr>, r: &Rc<Expr>) -> Option<Rc<Expr>> {
        if let Some(merged) = self.merge_singularities(op, l, r) {
            return Some(merged);
        }
        if op == BinOp::Div && l == r {
            if let Some(folded) = fold_self_division(r, self.opts) {
                return Some(folded);
            }
        }
        try_fold_binary(op, l, r)
    }
}

impl Transformer for StandardOperations<'_> {
    fn transform_binary(
        &mut self,
        original: &Rc<Expr>,
        op: BinOp,
        l: &Rc<Expr>,
        r: &Rc<Expr>,
    ) -> Rc<Expr> {
        let new_l = self.transform_expr(l);
        let new_r = self.transform_expr(r);
        if let Some(folded) = self.fold_binary(op, &new_l, &new_r) {
            self.rewrites += 1;
            return folded;
        }
        rebuild_binary(original, op, l, r, new_l, new_r)
    }

    fn transform_neg(&mut self, original: &Rc<Expr>, e: &Rc<Expr>) -> Rc<Expr> {
        let new_e = self.transform_expr(e);
        if let Some(folded) = try_fold_neg(&new_e) {
            self.rewrites += 1;
            return folded;
        }
        if Rc::ptr_eq(&new_e, e) {
            Rc::clone(original)
        } else {
            Expr::neg(new_e)
        }
    }

    fn transform_infinity(&mut self, original: &Rc<Expr>, inf: &Infinity) -> Rc<Expr> {
        if inf.is_lazy() {
            self.rewrites += 1;
            Expr::infinity(resolve(inf, self.opts))
        } else {
            Rc::clone(original)
        }
    }
}

impl Pass for StandardOperations<'_> {
    fn phase(&self) -> SimplifyPhase {
        SimplifyPhase::StandardOperations
    }

    fn run(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        self.transform_expr(expr)
    }

    fn rewrites(&self) -> usize {
        self.rewrites
    }
}
