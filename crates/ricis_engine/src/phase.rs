//! Simplification phases for the pipeline.
//!
//! The simplifier executes passes in a fixed order:
//! 1. AlgebraicReduction - exact polynomial cancellation
//! 2. RicisTransform - divisions by vanishing denominators become singularities
//! 3. StandardOperations - folding, singularity arithmetic and classification
//!
//! Key invariant: StandardOperations runs last, so every singularity produced
//! by RicisTransform is classified before `simplify` returns.

/// Phase of the simplification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimplifyPhase {
    /// Polynomial long division and exact 0/0 detection.
    /// Never introduces a singularity with an unclassified index.
    AlgebraicReduction,

    /// Division-to-singularity rewriting, with the derivative-ratio limit
    /// for a single removable root.
    RicisTransform,

    /// Identity folding, constant arithmetic and singularity merging.
    /// Resolves every lazy singularity it meets.
    StandardOperations,
}

impl SimplifyPhase {
    /// Returns the next phase in the pipeline, or None if this is the last.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::AlgebraicReduction => Some(Self::RicisTransform),
            Self::RicisTransform => Some(Self::StandardOperations),
            Self::StandardOperations => None,
        }
    }

    /// Returns all phases in pipeline order.
    pub fn all() -> &'static [SimplifyPhase] {
        &[
            SimplifyPhase::AlgebraicReduction,
            SimplifyPhase::RicisTransform,
            SimplifyPhase::StandardOperations,
        ]
    }
}

impl std::fmt::Display for SimplifyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlgebraicReduction => write!(f, "AlgebraicReduction"),
            Self::RicisTransform => write!(f, "RicisTransform"),
            Self::StandardOperations => write!(f, "StandardOperations"),
        }
    }
}

/// Per-phase statistics for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseStats {
    pub phase: SimplifyPhase,
    /// Whether the pass returned a different tree.
    pub changed: bool,
    /// Rewrites the pass reported.
    pub rewrites: usize,
    pub nodes_before: usize,
    pub nodes_after: usize,
    /// Reason the pass was abandoned, if it faulted.
    pub fault: Option<String>,
}

impl PhaseStats {
    pub fn new(phase: SimplifyPhase) -> Self {
        Self {
            phase,
            changed: false,
            rewrites: 0,
            nodes_before: 0,
            nodes_after: 0,
            fault: None,
        }
    }
}

/// Statistics for a full pipeline run, aggregated per phase over all rounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub phases: Vec<PhaseStats>,
    /// Full rounds executed, including the final unchanged one.
    pub rounds: usize,
}

impl PipelineStats {
    /// Fold one phase run into the per-phase totals.
    pub fn record(&mut self, run: PhaseStats) {
        match self.phases.iter_mut().find(|s| s.phase == run.phase) {
            Some(total) => {
                total.changed |= run.changed;
                total.rewrites += run.rewrites;
                total.nodes_after = run.nodes_after;
                if run.fault.is_some() {
                    total.fault = run.fault;
                }
            }
            None => self.phases.push(run),
        }
    }

    pub fn get(&self, phase: SimplifyPhase) -> Option<&PhaseStats> {
        self.phases.iter().find(|s| s.phase == phase)
    }

    pub fn any_fault(&self) -> bool {
        self.phases.iter().any(|s| s.fault.is_some())
    }

    pub fn total_rewrites(&self) -> usize {
        self.phases.iter().map(|s| s.rewrites).sum()
    }
}
