//! Singularity nodes.
//!
//! A division by zero does not fail; it produces an [`Infinity`] whose *index*
//! is the numerator that was divided and whose *roots* are the points where the
//! denominator vanished. `∞_{k}` stands for `k/0`:
//!
//! - `Lazy` has not been classified yet.
//! - `Identity` is `0/0` at exact roots; it projects to `1`.
//! - `Pole` is `k/0` with `k` provably nonzero at the root; it projects to `k·∞`.
//! - `Error` could not be classified (several roots, or an index that is not
//!   provably zero or nonzero).

use crate::expression::Expr;
use crate::rational::Rational;
use std::fmt;
use std::rc::Rc;

/// Numeric value of a root.
#[derive(Debug, Clone, PartialEq)]
pub enum RootValue {
    Exact(Rational),
    /// Found by numeric search or an irrational closed form.
    Approx(f64),
}

impl RootValue {
    pub fn is_exact(&self) -> bool {
        matches!(self, RootValue::Exact(_))
    }

    pub fn as_exact(&self) -> Option<&Rational> {
        match self {
            RootValue::Exact(r) => Some(r),
            RootValue::Approx(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            RootValue::Exact(r) => r.to_f64(),
            RootValue::Approx(v) => *v,
        }
    }
}

impl fmt::Display for RootValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootValue::Exact(r) => write!(f, "{r}"),
            RootValue::Approx(v) => write!(f, "{v}"),
        }
    }
}

/// A point `var = value` where some expression vanishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub var: String,
    pub value: RootValue,
}

impl Root {
    pub fn exact(var: &str, value: Rational) -> Self {
        Root {
            var: var.to_string(),
            value: RootValue::Exact(value),
        }
    }

    pub fn approx(var: &str, value: f64) -> Self {
        // -0.0 and 0.0 should display and compare the same
        let value = if value == 0.0 { 0.0 } else { value };
        Root {
            var: var.to_string(),
            value: RootValue::Approx(value),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.value.is_exact()
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64()
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.var, self.value)
    }
}

/// Classification state of a singularity.
#[derive(Debug, Clone, PartialEq)]
pub enum InfinityKind {
    Lazy,
    Identity,
    Pole {
        /// Roots of the index itself, kept for later merges.
        numerator_roots: Vec<Root>,
    },
    Error,
}

impl InfinityKind {
    pub fn name(&self) -> &'static str {
        match self {
            InfinityKind::Lazy => "lazy",
            InfinityKind::Identity => "identity",
            InfinityKind::Pole { .. } => "pole",
            InfinityKind::Error => "error",
        }
    }
}

/// A division-by-zero singularity `∞_{index}` located at `roots`.
#[derive(Debug, Clone)]
pub struct Infinity {
    index: Rc<Expr>,
    roots: Vec<Root>,
    kind: InfinityKind,
}

impl Infinity {
    pub fn lazy(index: Rc<Expr>, roots: Vec<Root>) -> Self {
        Infinity {
            index,
            roots,
            kind: InfinityKind::Lazy,
        }
    }

    /// `0/0` at `roots`. The index is always the constant zero.
    pub fn identity(roots: Vec<Root>) -> Self {
        Infinity {
            index: Expr::num(0),
            roots,
            kind: InfinityKind::Identity,
        }
    }

    pub fn pole(index: Rc<Expr>, roots: Vec<Root>, numerator_roots: Vec<Root>) -> Self {
        Infinity {
            index,
            roots,
            kind: InfinityKind::Pole { numerator_roots },
        }
    }

    pub fn error(index: Rc<Expr>, roots: Vec<Root>) -> Self {
        Infinity {
            index,
            roots,
            kind: InfinityKind::Error,
        }
    }

    pub fn index(&self) -> &Rc<Expr> {
        &self.index
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn kind(&self) -> &InfinityKind {
        &self.kind
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.kind, InfinityKind::Lazy)
    }

    /// The single root of a singularity located at exactly one point.
    pub fn single_root(&self) -> Option<&Root> {
        match self.roots.as_slice() {
            [root] => Some(root),
            _ => None,
        }
    }
}

/// Two singularities are equal when they are in the same state with the same
/// index and root set. Cached numerator roots of a pole are derived data.
impl PartialEq for Infinity {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
            && self.index == other.index
            && self.roots == other.roots
    }
}

impl fmt::Display for Infinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "∞_{{{}}}", self.index)?;
        match self.roots.as_slice() {
            [] => Ok(()),
            [root] => write!(f, " when {root}"),
            roots => {
                f.write_str(" at {")?;
                for (i, root) in roots.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{root}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_single_and_multiple_roots() {
        let one = Infinity::lazy(Expr::num(3), vec![Root::exact("x", Rational::from(1))]);
        assert_eq!(one.to_string(), "∞_{3} when x=1");

        let two = Infinity::identity(vec![
            Root::exact("x", Rational::from(-1)),
            Root::exact("x", Rational::from(1)),
        ]);
        assert_eq!(two.to_string(), "∞_{0} at {x=-1, x=1}");
    }

    #[test]
    fn equality_ignores_cached_numerator_roots() {
        let roots = vec![Root::exact("x", Rational::from(2))];
        let a = Infinity::pole(Expr::var("x"), roots.clone(), vec![Root::exact("x", Rational::zero())]);
        let b = Infinity::pole(Expr::var("x"), roots.clone(), vec![]);
        assert_eq!(a, b);
        assert_ne!(a, Infinity::error(Expr::var("x"), roots));
    }

    #[test]
    fn approximate_roots_normalize_negative_zero() {
        assert_eq!(Root::approx("x", -0.0), Root::approx("x", 0.0));
        assert_eq!(Root::approx("x", -0.0).to_string(), "x=0");
        assert!(!Root::approx("x", 1.5).is_exact());
        assert_eq!(Root::exact("x", Rational::from_ratio(1, 4).unwrap()).to_f64(), 0.25);
    }

    #[test]
    fn single_root_accessor() {
        let inf = Infinity::identity(vec![Root::exact("x", Rational::zero())]);
        assert!(inf.single_root().is_some());
        assert!(Infinity::identity(vec![]).single_root().is_none());
        assert!(!inf.is_lazy());
        assert_eq!(inf.kind().name(), "identity");
        assert!(inf.index().is_constant_zero());
    }
}
