//! Singularity-resolving simplification pipeline.
//!
//! [`simplify`] runs three passes in a fixed order:
//!
//! 1. **AlgebraicReduction**: exact polynomial cancellation (`(x²-1)/(x-1) → x+1`)
//!    and exact `0/0` detection.
//! 2. **RicisTransform**: every remaining division whose denominator has roots
//!    becomes a singularity node, or a constant when a derivative-ratio limit
//!    settles a single `0/0`.
//! 3. **StandardOperations**: identity folding, singularity arithmetic and
//!    classification of pending singularities.
//!
//! Each pass is total: if one panics, the tree it received is kept and the
//! pipeline continues with the next pass.

pub mod error;
pub mod limits;
pub mod options;
pub mod orchestrator;
pub mod phase;
pub mod phases;
pub mod singularity;

pub use error::CasError;
pub use options::{LimitRule, SimplifyOptions};
pub use orchestrator::{simplify, Simplifier};
pub use phase::{PhaseStats, PipelineStats, SimplifyPhase};
pub use singularity::{classic_projection, resolve, roots_compatible};

pub use ricis_ast::{BinOp, BuiltinFn, Expr, Infinity, InfinityKind, Rational, Root, RootValue};
pub use ricis_math::{evaluate, find_roots, try_evaluate_exact, RootSearchOptions};
