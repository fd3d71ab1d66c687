//! Algebraic and numeric kernels for the ricis simplifier.
//!
//! Everything here is a pure function of its inputs: coefficient collection,
//! exact and floating-point evaluation, polynomial division, root finding and
//! symbolic differentiation. The rewrite passes live in `ricis_engine`.

pub mod build;
pub mod differentiation;
pub mod error;
pub mod exact_eval;
pub mod linear_form;
pub mod long_division;
pub mod numeric;
pub mod poly_coeffs;
pub mod rational_roots;
pub mod roots;

pub use differentiation::differentiate;
pub use error::MathError;
pub use exact_eval::{evaluate_constant, evaluate_exact, try_evaluate_exact};
pub use numeric::{compile, evaluate, evaluate_finite, project_infinity, CompiledExpr};
pub use poly_coeffs::{collect_coefficients, Coefficients};
pub use roots::{find_roots, find_roots_with, RootSearchOptions};
