//! Operator semantics shared by both engines.

use simple_types::{Type, Value};

use crate::error::{EvalError, EvalResult};

/// Context for a non-Boolean `if` or `while` condition. Both engines use
/// it, since the small-step machine sees every `while` as an `if`.
pub(crate) const CONDITION: &str = "condition";

/// The three binary operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Multiply,
    LessThan,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Multiply => "*",
            BinaryOp::LessThan => "<",
        }
    }

    /// Combine two operand values. Both must be numbers.
    pub(crate) fn apply(self, left: Value, right: Value) -> EvalResult<Value> {
        let context = format!("operand of '{}'", self.symbol());
        let a = expect_number(left, &context)?;
        let b = expect_number(right, &context)?;
        match self {
            BinaryOp::Add => a
                .checked_add(b)
                .map(Value::Number)
                .ok_or_else(|| EvalError::ArithmeticOverflow(format!("{a} + {b}"))),
            BinaryOp::Multiply => a
                .checked_mul(b)
                .map(Value::Number)
                .ok_or_else(|| EvalError::ArithmeticOverflow(format!("{a} * {b}"))),
            BinaryOp::LessThan => Ok(Value::Boolean(a < b)),
        }
    }
}

pub(crate) fn expect_number(value: Value, context: &str) -> EvalResult<i64> {
    value.as_number().ok_or_else(|| EvalError::TypeMismatch {
        expected: Type::Number,
        found: value.ty(),
        context: context.to_string(),
    })
}

pub(crate) fn expect_boolean(value: Value, context: &str) -> EvalResult<bool> {
    value.as_boolean().ok_or_else(|| EvalError::TypeMismatch {
        expected: Type::Boolean,
        found: value.ty(),
        context: context.to_string(),
    })
}
