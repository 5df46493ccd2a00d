//! Runtime error types for the Simple engines.

use simple_types::Type;
use thiserror::Error;

/// Evaluation error raised by either engine.
///
/// Errors are raised at the offending node and propagate unchanged to the
/// caller of `run`/`evaluate`/`execute`; neither engine retries or recovers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Variable lookup missed the environment.
    #[error("unbound variable: {0}")]
    UnboundVariable(String),

    /// A value of the wrong type reached an operator or a condition.
    #[error("type mismatch: {context} expects {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        context: String,
    },

    /// Checked `i64` arithmetic overflowed.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// A reduction step was requested on a terminal node.
    #[error("irreducible: {0}")]
    Irreducible(String),

    /// The configured gas limit was exceeded.
    #[error("gas exhausted")]
    GasExhausted,
}

/// Result alias for engine operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EvalError::UnboundVariable("x".into()).to_string(),
            "unbound variable: x"
        );
        let err = EvalError::TypeMismatch {
            expected: Type::Boolean,
            found: Type::Number,
            context: "condition".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: condition expects boolean, found number"
        );
        assert_eq!(EvalError::GasExhausted.to_string(), "gas exhausted");
    }
}
