//! Error types for ricis_ast crate.

use thiserror::Error;

/// Errors that can occur in AST operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    /// Exact rational division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Decimal literal could not be read as an exact rational
    #[error("invalid decimal literal: '{0}'")]
    InvalidDecimal(String),
}
