//! Expression tree for the ricis simplifier.
//!
//! Trees are immutable and shared through `Rc`; rewrites build new nodes and
//! reuse untouched subtrees. Singularities produced by division by zero are
//! first-class nodes ([`Infinity`]) that carry their own index expression and
//! the roots at which they occur.

pub mod error;
pub mod expression;
pub mod infinity;
pub mod rational;
pub mod traversal;
pub mod visitor;

pub use error::AstError;
pub use expression::{BinOp, BuiltinFn, Expr};
pub use infinity::{Infinity, InfinityKind, Root, RootValue};
pub use rational::Rational;
pub use visitor::{Transformer, Visitor};
