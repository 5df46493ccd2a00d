//! WASM layout constants and static type inference.
//!
//! Every Simple variable becomes one module-level global whose WASM type is
//! fixed by the variable's static [`Type`]:
//!
//! | Type    | WASM  | Encoding            |
//! |---------|-------|---------------------|
//! | Number  | `i64` | two's complement    |
//! | Boolean | `i32` | 0 = false, 1 = true |
//!
//! Inference is flow-sensitive for binding and flow-insensitive for types: a
//! variable keeps one type for the whole program, but it may only be read on
//! paths where it has definitely been assigned.

use std::collections::{BTreeMap, BTreeSet};

use simple_types::{Expr, Stmt, Type, Value};
use wasm_encoder::ValType;

use crate::error::{CodegenError, CodegenResult};

// ── Global variable indices ──────────────────────────────────────────────────
// (order must match the global section emission in compiler.rs)

/// Loop iterations executed so far.
pub const GLOBAL_GAS: u32 = 0;
/// Iteration budget; trap when the counter exceeds it.
pub const GLOBAL_GAS_LIMIT: u32 = 1;
/// Index of the first variable global. Variables follow in name order.
pub const VARIABLE_GLOBAL_BASE: u32 = 2;

// ── Function indices ─────────────────────────────────────────────────────────

/// The module's only function.
pub const FUNC_RUN: u32 = 0;

// ── WASM type indices ────────────────────────────────────────────────────────
// Fixed type indices in the type section (see compiler.rs emit_types).

/// `() -> ()`
pub const TYPE_VOID_VOID: u32 = 0;
/// `() -> i64`
pub const TYPE_VOID_I64: u32 = 1;
/// `() -> i32`
pub const TYPE_VOID_I32: u32 = 2;

// ── Export names ─────────────────────────────────────────────────────────────

pub const RUN_EXPORT: &str = "run";
pub const GAS_EXPORT: &str = "gas";
/// Variables are exported as `var.<name>` so they never clash with `run`
/// or `gas`.
pub const VARIABLE_EXPORT_PREFIX: &str = "var.";

/// The WASM value type that holds a Simple value of type `ty`.
pub fn val_type(ty: Type) -> ValType {
    match ty {
        Type::Number => ValType::I64,
        Type::Boolean => ValType::I32,
    }
}

/// The type index of `run` for a program producing `result`.
pub fn run_type_index(result: Option<Type>) -> u32 {
    match result {
        None => TYPE_VOID_VOID,
        Some(Type::Number) => TYPE_VOID_I64,
        Some(Type::Boolean) => TYPE_VOID_I32,
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Type environment
// ══════════════════════════════════════════════════════════════════════════════

/// Static typing state threaded through [`infer_stmt`].
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    /// Every variable seen so far, with its one type.
    types: BTreeMap<String, Type>,
    /// Variables assigned on every path reaching the current point.
    bound: BTreeSet<String>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the environment from initial bindings; all of them are bound.
    pub fn from_bindings<'a>(bindings: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let types: BTreeMap<String, Type> = bindings
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.ty()))
            .collect();
        let bound = types.keys().cloned().collect();
        Self { types, bound }
    }

    /// The type of a variable that is bound at this point.
    pub fn lookup(&self, name: &str) -> CodegenResult<Type> {
        match self.types.get(name) {
            Some(ty) if self.bound.contains(name) => Ok(*ty),
            _ => Err(CodegenError::UnresolvedSymbol(name.to_string())),
        }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    /// Every variable and its type, in name order.
    pub fn variables(&self) -> &BTreeMap<String, Type> {
        &self.types
    }

    pub fn into_variables(self) -> BTreeMap<String, Type> {
        self.types
    }

    fn assign(&mut self, name: &str, ty: Type) -> CodegenResult<()> {
        match self.types.get(name) {
            Some(&existing) if existing != ty => Err(CodegenError::TypeMismatch {
                expected: existing,
                found: ty,
                context: format!("assignment to '{name}'"),
            }),
            Some(_) => {
                self.bound.insert(name.to_string());
                Ok(())
            }
            None => {
                self.types.insert(name.to_string(), ty);
                self.bound.insert(name.to_string());
                Ok(())
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Inference
// ══════════════════════════════════════════════════════════════════════════════

/// The static type of `expr`.
pub fn infer_expr(expr: &Expr, env: &TypeEnv) -> CodegenResult<Type> {
    match expr {
        Expr::Number(_) => Ok(Type::Number),
        Expr::Boolean(_) => Ok(Type::Boolean),
        Expr::Variable(name) => env.lookup(name),
        Expr::Add(l, r) => infer_arithmetic("+", l, r, env).map(|_| Type::Number),
        Expr::Multiply(l, r) => infer_arithmetic("*", l, r, env).map(|_| Type::Number),
        Expr::LessThan(l, r) => infer_arithmetic("<", l, r, env).map(|_| Type::Boolean),
    }
}

fn infer_arithmetic(symbol: &str, left: &Expr, right: &Expr, env: &TypeEnv) -> CodegenResult<()> {
    let context = format!("operand of '{symbol}'");
    expect(Type::Number, infer_expr(left, env)?, &context)?;
    expect(Type::Number, infer_expr(right, env)?, &context)
}

fn expect(expected: Type, found: Type, context: &str) -> CodegenResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(CodegenError::TypeMismatch {
            expected,
            found,
            context: context.to_string(),
        })
    }
}

/// Type-check `stmt`, recording the variables it assigns in `env`.
pub fn infer_stmt(stmt: &Stmt, env: &mut TypeEnv) -> CodegenResult<()> {
    match stmt {
        Stmt::DoNothing => Ok(()),
        Stmt::Assign(name, value) => {
            let ty = infer_expr(value, env)?;
            env.assign(name, ty)
        }
        Stmt::If(cond, cons, alt) => {
            expect(Type::Boolean, infer_expr(cond, env)?, "condition")?;

            let mut then_env = env.clone();
            infer_stmt(cons, &mut then_env)?;

            // Types carry across branches; bindings do not.
            let mut else_env = TypeEnv {
                types: then_env.types.clone(),
                bound: env.bound.clone(),
            };
            infer_stmt(alt, &mut else_env)?;

            env.bound = then_env.bound.intersection(&else_env.bound).cloned().collect();
            env.types = else_env.types;
            Ok(())
        }
        Stmt::Sequence(..) => {
            let mut rest = stmt;
            while let Stmt::Sequence(first, second) = rest {
                infer_stmt(first, env)?;
                rest = &**second;
            }
            infer_stmt(rest, env)
        }
        Stmt::While(cond, body) => {
            expect(Type::Boolean, infer_expr(cond, env)?, "condition")?;

            // The body may run zero times, so nothing it binds is definite
            // afterwards.
            let mut body_env = env.clone();
            infer_stmt(body, &mut body_env)?;
            env.types = body_env.types;
            Ok(())
        }
    }
}
