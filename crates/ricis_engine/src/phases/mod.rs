//! The rewrite passes, one per [`SimplifyPhase`].

pub mod algebraic_reduction;
pub mod ricis_transform;
pub mod standard_ops;

pub use algebraic_reduction::AlgebraicReduction;
pub use ricis_transform::RicisTransform;
pub use standard_ops::StandardOperations;

use crate::options::SimplifyOptions;
use crate::phase::SimplifyPhase;
use ricis_ast::traversal::collect_variables;
use ricis_ast::Expr;
use std::rc::Rc;

/// A whole-tree rewrite. Passes never fail: a subtree they cannot handle is
/// returned as it was.
pub trait Pass {
    fn phase(&self) -> SimplifyPhase;

    fn run(&mut self, expr: &Rc<Expr>) -> Rc<Expr>;

    /// Number of local rewrites applied so far.
    fn rewrites(&self) -> usize;
}

/// Construct the pass for `phase`.
pub fn pass_for(phase: SimplifyPhase, opts: &SimplifyOptions) -> Box<dyn Pass + '_> {
    match phase {
        SimplifyPhase::AlgebraicReduction => Box::new(AlgebraicReduction::new(opts)),
        SimplifyPhase::RicisTransform => Box::new(RicisTransform::new(opts)),
        SimplifyPhase::StandardOperations => Box::new(StandardOperations::new(opts)),
    }
}

/// The one variable shared by a quotient's operands, if there is exactly one.
pub(crate) fn quotient_variable(num: &Expr, den: &Expr) -> Option<String> {
    let mut vars = collect_variables(num);
    vars.extend(collect_variables(den));
    if vars.len() == 1 {
        vars.into_iter().next()
    } else {
        None
    }
}
