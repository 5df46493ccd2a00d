//! Simple language engines.
//!
//! Two independent semantics over the same AST:
//!
//! - [`reduce`] / [`Machine`]: small-step operational semantics. One rewrite
//!   rule fires per step and the machine repeats until the program is
//!   irreducible.
//! - [`Evaluator`]: big-step semantics. A node is evaluated to its final
//!   value (expressions) or environment (statements) in one call.
//!
//! Both engines agree on every well-typed program.

mod env;
mod error;
mod gas;
mod ops;

pub mod evaluator;
pub mod machine;
pub mod reduce;

pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, execute, Evaluator};
pub use gas::Gas;
pub use machine::{run_expr, run_stmt, Machine};
pub use reduce::{reduce_expr, reduce_stmt, Reducible};
