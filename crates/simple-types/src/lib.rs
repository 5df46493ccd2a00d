//! Shared types for the Simple language.
//!
//! This crate defines the AST node types and runtime values used by the
//! small-step machine, the big-step evaluator and the WASM code generator.
//! Nothing here evaluates anything; it only describes programs.

pub mod ast;
mod value;

pub use ast::{Expr, Stmt};
pub use value::{Type, Value};
