//! Simple WASM code generator: compiles a Simple program to a `.wasm` binary.
//!
//! # Architecture
//!
//! Compilation runs in two passes. [`types::infer_stmt`] gives every
//! variable a single static [`Type`](simple_types::Type) and checks that every
//! read happens after a definite assignment. The compiler then emits one
//! module with no imports:
//!
//! ## Exports
//! - `run`: executes the program (`() -> ()` for statements, `() -> i64`
//!   or `() -> i32` for expressions)
//! - `gas`: loop iterations executed so far (`i64`)
//! - `var.<name>`: one mutable global per variable
//!
//! ## Value Representation
//!
//! Numbers are `i64` and wrap on overflow. Booleans are `i32` (0 or 1).

pub mod compiler;
pub mod error;
pub mod expr;
pub mod gas;
pub mod stmt;
pub mod types;

pub use compiler::{compile_expr, compile_stmt, CompileOptions, CompiledProgram};
pub use error::{CodegenError, CodegenResult};
