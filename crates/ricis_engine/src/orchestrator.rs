use crate::error::CasError;
use crate::options::SimplifyOptions;
use crate::phase::{PhaseStats, PipelineStats, SimplifyPhase};
use crate::phases::pass_for;
use ricis_ast::traversal::count_all_nodes;
use ricis_ast::Expr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Runs the three passes in order, round after round, until the tree stops
/// changing or `max_rounds` is reached.
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    pub options: SimplifyOptions,
}

impl Simplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SimplifyOptions) -> Self {
        Self { options }
    }

    pub fn simplify(&self, expr: &Rc<Expr>) -> Rc<Expr> {
        self.simplify_with_stats(expr).0
    }

    /// Simplify and report what each phase did.
    pub fn simplify_with_stats(&self, expr: &Rc<Expr>) -> (Rc<Expr>, PipelineStats) {
        let mut stats = PipelineStats::default();
        let mut current = Rc::clone(expr);

        for round in 0..self.options.max_rounds.max(1) {
            let start = Rc::clone(&current);
            for &phase in SimplifyPhase::all() {
                let (next, phase_stats) = self.run_phase(phase, &current);
                stats.record(phase_stats);
                current = next;
            }
            stats.rounds = round + 1;

            // Fixed point check
            if current == start {
                break;
            }
        }

        tracing::debug!(
            target: "simplify",
            rounds = stats.rounds,
            rewrites = stats.total_rewrites(),
            "pipeline_end"
        );
        (current, stats)
    }

    /// Run a single pass. A panicking pass is reported as
    /// [`CasError::PassFault`] instead of unwinding into the caller.
    pub fn try_run_phase(
        &self,
        phase: SimplifyPhase,
        expr: &Rc<Expr>,
    ) -> Result<(Rc<Expr>, usize), CasError> {
        guarded(phase, || {
            let mut pass = pass_for(phase, &self.options);
            let out = pass.run(expr);
            (out, pass.rewrites())
        })
    }

    fn run_phase(&self, phase: SimplifyPhase, expr: &Rc<Expr>) -> (Rc<Expr>, PhaseStats) {
        let mut stats = PhaseStats::new(phase);
        stats.nodes_before = count_all_nodes(expr);

        tracing::debug!(
            target: "simplify",
            phase = %phase,
            nodes = stats.nodes_before,
            "phase_start"
        );

        let out = match self.try_run_phase(phase, expr) {
            Ok((next, rewrites)) => {
                stats.rewrites = rewrites;
                next
            }
            Err(err) => {
                tracing::warn!(target: "simplify", phase = %phase, error = %err, "phase_fault");
                stats.fault = Some(err.to_string());
                Rc::clone(expr)
            }
        };

        stats.changed = !Rc::ptr_eq(&out, expr) && out != *expr;
        stats.nodes_after = count_all_nodes(&out);

        tracing::debug!(
            target: "simplify",
            phase = %phase,
            rewrites = stats.rewrites,
            changed = stats.changed,
            nodes = stats.nodes_after,
            "phase_end"
        );

        (out, stats)
    }
}

/// Run `f`, converting a panic into a fault for `phase`.
pub(crate) fn guarded<T>(phase: SimplifyPhase, f: impl FnOnce() -> T) -> Result<T, CasError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        CasError::PassFault { phase, reason }
    })
}

/// Simplify with default options.
pub fn simplify(expr: &Rc<Expr>) -> Rc<Expr> {
    Simplifier::new().simplify(expr)
}
