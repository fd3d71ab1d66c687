//! Error types for ricis_math crate.

use ricis_ast::AstError;
use thiserror::Error;

/// Errors raised by the math kernels.
///
/// Callers in the rewrite passes treat every variant as "this rewrite does
/// not apply" and leave the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,

    /// Expression contains a term the coefficient collector cannot expand
    #[error("expression is not a polynomial in '{var}'")]
    NotAPolynomial { var: String },

    /// Polynomial long division left a nonzero remainder
    #[error("polynomial division is not exact")]
    InexactDivision,

    #[error("evaluation produced a non-finite value")]
    NonFiniteResult,

    #[error("variable '{name}' is not bound")]
    UnboundVariable { name: String },

    /// No exact or numeric rule for this node
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl MathError {
    pub(crate) fn not_polynomial(var: &str) -> Self {
        MathError::NotAPolynomial {
            var: var.to_string(),
        }
    }
}

impl From<AstError> for MathError {
    fn from(err: AstError) -> Self {
        match err {
            AstError::DivisionByZero => MathError::DivisionByZero,
            other => MathError::Unsupported(other.to_string()),
        }
    }
}
