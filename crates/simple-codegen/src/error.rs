//! Codegen error types.

use simple_types::Type;
use thiserror::Error;

/// Errors that can occur during WASM code generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// An operand, condition or assignment has the wrong static type.
    #[error("type mismatch: {context} expects {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        context: String,
    },

    /// A variable is read where it may not have been assigned.
    #[error("unresolved symbol: {0}")]
    UnresolvedSymbol(String),

    /// The generated WASM module failed validation.
    #[error("WASM validation failed: {0}")]
    ValidationFailed(String),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
