//! Exact polynomial cancellation.
//!
//! For every quotient in a single variable whose operands are polynomials:
//! divide exactly when the denominator divides the numerator, otherwise mark
//! the exact roots where both vanish with an identity singularity.

use super::{quotient_variable, Pass};
use crate::options::SimplifyOptions;
use crate::phase::SimplifyPhase;
use crate::singularity::fold_self_division;
use ricis_ast::traversal::contains_infinity;
use ricis_ast::visitor::rebuild_binary;
use ricis_ast::{BinOp, Expr, Infinity, Root, Transformer};
use ricis_math::long_division::try_divide;
use ricis_math::{collect_coefficients, find_roots_with, try_evaluate_exact};
use std::rc::Rc;

pub struct AlgebraicReduction<'a> {
    opts: &'a SimplifyOptions,
    rewrites: usize,
}

impl<'a> AlgebraicReduction<'a> {
    pub fn new(opts: &'a SimplifyOptions) -> Self {
        Self { opts, rewrites: 0 }
    }

    fn reduce_quotient(&mut self, num: &Rc<Expr>, den: &Rc<Expr>) -> Option<Rc<Expr>> {
        if num == den {
            return fold_self_division(den, self.opts);
        }
        if contains_infinity(num) || contains_infinity(den) {
            return None;
        }
        let var = quotient_variable(num, den)?;
        collect_coefficients(den, &var).ok()?;
        collect_coefficients(num, &var).ok()?;

        match try_divide(num, den, &var) {
            Ok(quotient) => {
                tracing::debug!(target: "simplify", %num, %den, %quotient, "exact_division");
                // The quotient may itself contain reducible quotients
                return Some(self.transform_expr(&quotient));
            }
            Err(e) => tracing::trace!(target: "simplify", %num, %den, reason = %e, "division_inexact"),
        }

        let vanishing: Vec<Root> = find_roots_with(den, &var, &self.opts.roots)
            .into_iter()
            .filter(|root| {
                root.value
                    .as_exact()
                    .and_then(|v| try_evaluate_exact(num, &var, v))
                    .is_some_and(|n| n.is_zero())
            })
            .collect();
        if vanishing.is_empty() {
            None
        } else {
            Some(Expr::infinity(Infinity::identity(vanishing)))
        }
    }
}

impl Transformer for AlgebraicReduction<'_> {
    fn transform_binary(
        &mut self,
        original: &Rc<Expr>,
        op: BinOp,
        l: &Rc<Expr>,
        r: &Rc<Expr>,
    ) -> Rc<Expr> {
        let new_l = self.transform_expr(l);
        let new_r = self.transform_expr(r);
        if op == BinOp::Div {
            if let Some(reduced) = self.reduce_quotient(&new_l, &new_r) {
                self.rewrites += 1;
                return reduced;
            }
        }
        rebuild_binary(original, op, l, r, new_l, new_r)
    }
}

impl Pass for AlgebraicReduction<'_> {
    fn phase(&self) -> SimplifyPhase {
        SimplifyPhase::AlgebraicReduction
    }

    fn run(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        self.transform_expr(expr)
    }

    fn rewrites(&self) -> usize {
        self.rewrites
    }
}
