//! Division-to-singularity rewriting.
//!
//! Every quotient `n / d` in a single variable whose denominator has roots
//! becomes a singularity located at those roots. A lone `0/0` is first offered
//! to the derivative-ratio limit and replaced by its value when one exists.

use super::{quotient_variable, Pass};
use crate::limits::derivative_ratio_limit;
use crate::options::SimplifyOptions;
use crate::phase::SimplifyPhase;
use crate::singularity::evaluate_at_root;
use ricis_ast::traversal::contains_infinity;
use ricis_ast::visitor::rebuild_binary;
use ricis_ast::{BinOp, Expr, Infinity, Root, Transformer};
use ricis_math::{evaluate, find_roots_with};
use std::rc::Rc;

/// Numerator behaviour at one root of the denominator.
struct RootEntry {
    root: Root,
    /// Numerator is exactly zero there.
    removable: bool,
}

pub struct RicisTransform<'a> {
    opts: &'a SimplifyOptions,
    rewrites: usize,
}

impl<'a> RicisTransform<'a> {
    pub fn new(opts: &'a SimplifyOptions) -> Self {
        Self { opts, rewrites: 0 }
    }

    fn transform_quotient(&mut self, num: &Rc<Expr>, den: &Rc<Expr>) -> Option<Rc<Expr>> {
        if contains_infinity(num) || contains_infinity(den) {
            return None;
        }
        let var = quotient_variable(num, den)?;
        let roots = find_roots_with(den, &var, &self.opts.roots);
        if roots.is_empty() {
            return None;
        }
        let single = roots.len() == 1;

        let mut entries = Vec::with_capacity(roots.len());
        for root in roots {
            let Some(value) = evaluate_at_root(num, &root) else {
                // A divergent numerator keeps its root
                if evaluate(num, &root.var, root.to_f64()).is_ok_and(f64::is_infinite) {
                    tracing::trace!(target: "singularity", root = %root, "numerator_diverges");
                    entries.push(RootEntry {
                        root,
                        removable: false,
                    });
                } else {
                    tracing::trace!(target: "singularity", root = %root, "numerator_not_evaluable");
                }
                continue;
            };
            let vanishes = value.is_zero_within(self.opts.zero_tolerance);
            if vanishes && single && self.opts.limit_rule.is_enabled() {
                let limit = derivative_ratio_limit(num, den, &root, self.opts)
                    .and_then(|v| v.to_constant());
                if let Some(limit) = limit {
                    tracing::debug!(target: "singularity", %num, %den, %limit, "removable_by_limit");
                    return Some(limit);
                }
            }
            entries.push(RootEntry {
                root,
                removable: vanishes && value.is_exact(),
            });
        }

        let node = if entries.len() > 1 {
            let all_removable = entries.iter().all(|e| e.removable);
            let roots = entries.into_iter().map(|e| e.root).collect();
            if all_removable {
                Infinity::identity(roots)
            } else {
                Infinity::lazy(Rc::clone(num), roots)
            }
        } else {
            let entry = entries.pop()?;
            let index = if entry.removable {
                Expr::num(0)
            } else {
                Rc::clone(num)
            };
            Infinity::lazy(index, vec![entry.root])
        };
        tracing::debug!(target: "singularity", %num, %den, roots = node.roots().len(), "singularity_created");
        Some(Expr::infinity(node))
    }
}

impl Transformer for RicisTransform<'_> {
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
            if let Some(node) = self.transform_quotient(&new_l, &new_r) {
                self.rewrites += 1;
                return node;
            }
        }
        rebuild_binary(original, op, l, r, new_l, new_r)
    }
}

impl Pass for RicisTransform<'_> {
    fn phase(&self) -> SimplifyPhase {
        SimplifyPhase::RicisTransform
    }

    fn run(&mut self, expr: &Rc<Expr>) -> Rc<Expr> {
        self.transform_expr(expr)
    }

    fn rewrites(&self) -> usize {
        self.rewrites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricis_ast::{InfinityKind, Rational};

    fn x() -> Rc<Expr> {
        Expr::var("x")
    }

    fn at(v: i64) -> Root {
        Root::exact("x", Rational::from_integer(v))
    }

    fn transform(e: &Rc<Expr>, opts: &SimplifyOptions) -> Rc<Expr> {
        RicisTransform::new(opts).run(e)
    }

    #[test]
    fn pole_candidate_keeps_numerator_as_index() {
        let e = Expr::div(Expr::num(3), Expr::sub(x(), Expr::num(2)));
        let out = transform(&e, &SimplifyOptions::default());
        assert_eq!(out, Expr::infinity(Infinity::lazy(Expr::num(3), vec![at(2)])));
    }

    #[test]
    fn removable_point_uses_limit() {
        let e = Expr::div(Expr::sin(x()), x());
        assert_eq!(transform(&e, &SimplifyOptions::default()), Expr::num(1));
    }

    #[test]
    fn removable_point_without_limit_rule() {
        let e = Expr::div(Expr::sin(x()), x());
        let out = transform(&e, &SimplifyOptions::without_limits());
        assert_eq!(out, Expr::infinity(Infinity::lazy(Expr::num(0), vec![at(0)])));
    }

    #[test]
    fn several_removable_roots_are_identity() {
        // (x^3 - x) / (x^2 - 1): numerator vanishes at both roots
        let num = Expr::sub(Expr::pow(x(), Expr::num(3)), x());
        let den = Expr::sub(Expr::mul(x(), x()), Expr::num(1));
        let out = transform(&Expr::div(num, den), &SimplifyOptions::default());
        let inf = out.as_infinity().expect("singularity");
        assert_eq!(inf.kind(), &InfinityKind::Identity);
        assert_eq!(inf.roots(), &[at(-1), at(1)]);
    }

    #[test]
    fn mixed_roots_stay_lazy() {
        let num = Expr::add(x(), Expr::num(1));
        let den = Expr::sub(Expr::mul(x(), x()), Expr::num(1));
        let out = transform(&Expr::div(Rc::clone(&num), den), &SimplifyOptions::default());
        assert_eq!(out, Expr::infinity(Infinity::lazy(num, vec![at(-1), at(1)])));
    }

    #[test]
    fn denominators_without_roots_are_untouched() {
        let e = Expr::div(x(), Expr::add(Expr::mul(x(), x()), Expr::num(1)));
        assert!(Rc::ptr_eq(&transform(&e, &SimplifyOptions::default()), &e));
    }

    #[test]
    fn divergent_numerator_keeps_its_root() {
        // log(x) / (x (x - 1)): -inf at 0, 0/0 at 1
        let num = Expr::log(x());
        let den = Expr::mul(x(), Expr::sub(x(), Expr::num(1)));
        let out = transform(&Expr::div(Rc::clone(&num), den), &SimplifyOptions::default());
        assert_eq!(out, Expr::infinity(Infinity::lazy(num, vec![at(0), at(1)])));
    }

    #[test]
    fn divergent_numerator_at_single_root() {
        let num = Expr::log(x());
        let out = transform(&Expr::div(Rc::clone(&num), x()), &SimplifyOptions::default());
        assert_eq!(out, Expr::infinity(Infinity::lazy(num, vec![at(0)])));
    }

    #[test]
    fn divergent_limit_falls_back_to_singularity() {
        // x / x^3 has a removable-looking numerator but no finite limit
        let e = Expr::div(x(), Expr::pow(x(), Expr::num(3)));
        let out = transform(&e, &SimplifyOptions::default());
        assert_eq!(out, Expr::infinity(Infinity::lazy(Expr::num(0), vec![at(0)])));
    }
}
