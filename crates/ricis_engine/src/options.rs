//! Tunables for the simplification pipeline.

use ricis_math::RootSearchOptions;

/// Whether `0/0` at a single root is settled by differentiating numerator and
/// denominator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LimitRule {
    /// Replace `f/g` by `lim f'/g'` (up to `max_limit_rounds` times) when the
    /// limit exists and is finite.
    #[default]
    DerivativeRatio,

    /// Always emit a singularity node for `0/0`.
    Off,
}

impl LimitRule {
    pub fn is_enabled(self) -> bool {
        matches!(self, LimitRule::DerivativeRatio)
    }
}

/// Options for [`crate::Simplifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifyOptions {
    /// Root finding window, tolerances and budgets.
    pub roots: RootSearchOptions,
    /// A floating-point value at or below this magnitude is treated as zero
    /// when classifying singularities at approximate roots.
    pub zero_tolerance: f64,
    /// Two singularities are at the same point when their first roots differ
    /// by at most this much.
    pub root_match_tolerance: f64,
    /// Maximum number of differentiation rounds per limit.
    pub max_limit_rounds: usize,
    pub limit_rule: LimitRule,
    /// Maximum number of full pipeline rounds. Rounds repeat until the tree
    /// stops changing.
    pub max_rounds: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            roots: RootSearchOptions::default(),
            zero_tolerance: 1e-10,
            root_match_tolerance: 1e-9,
            max_limit_rounds: 3,
            limit_rule: LimitRule::default(),
            max_rounds: 8,
        }
    }
}

impl SimplifyOptions {
    /// Options with the derivative-ratio limit turned off.
    pub fn without_limits() -> Self {
        Self {
            limit_rule: LimitRule::Off,
            ..Self::default()
        }
    }
}
