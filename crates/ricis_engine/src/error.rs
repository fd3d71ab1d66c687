use crate::phase::SimplifyPhase;
use ricis_ast::Root;
use ricis_math::MathError;
use thiserror::Error;

fn format_roots(roots: &[Root]) -> String {
    roots
        .iter()
        .map(Root::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CasError {
    /// Singularity spread over several roots, or with an index that is
    /// neither provably zero nor provably nonzero.
    #[error("singularity at {{{}}} cannot be classified", format_roots(.roots))]
    IndeterminateAmbiguous { roots: Vec<Root> },

    /// A pass panicked; the pipeline kept the tree it received.
    #[error("{phase} pass failed: {reason}")]
    PassFault { phase: SimplifyPhase, reason: String },

    #[error(transparent)]
    Math(#[from] MathError),
}
