//! Small-step reduction rules.
//!
//! Each call performs exactly one rewrite. Operands are reduced left to
//! right: the left operand must be a value before the right one is touched.
//! Expressions never change the environment; statements thread it through
//! and hand back the (possibly updated) environment.

use simple_types::{Expr, Stmt};
use std::{fmt, mem};

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::ops::{expect_boolean, BinaryOp, CONDITION};

/// Reduce an expression by one step.
///
/// Fails with `Irreducible` on `Number`/`Boolean`, `UnboundVariable` on a
/// lookup miss and `TypeMismatch` when an operator sees a Boolean.
pub fn reduce_expr(expr: &Expr, env: &Environment) -> EvalResult<Expr> {
    match expr {
        Expr::Number(_) | Expr::Boolean(_) => Err(EvalError::Irreducible(expr.to_string())),
        Expr::Variable(name) => env.lookup(name).map(Expr::from),
        Expr::Add(l, r) => reduce_binary(BinaryOp::Add, l, r, env),
        Expr::Multiply(l, r) => reduce_binary(BinaryOp::Multiply, l, r, env),
        Expr::LessThan(l, r) => reduce_binary(BinaryOp::LessThan, l, r, env),
    }
}

fn reduce_binary(op: BinaryOp, left: &Expr, right: &Expr, env: &Environment) -> EvalResult<Expr> {
    let rebuild = |l: Expr, r: Expr| match op {
        BinaryOp::Add => Expr::add(l, r),
        BinaryOp::Multiply => Expr::multiply(l, r),
        BinaryOp::LessThan => Expr::less_than(l, r),
    };

    match (left.as_value(), right.as_value()) {
        (None, _) => Ok(rebuild(reduce_expr(left, env)?, right.clone())),
        (Some(_), None) => Ok(rebuild(left.clone(), reduce_expr(right, env)?)),
        (Some(a), Some(b)) => op.apply(a, b).map(Expr::from),
    }
}

/// Reduce a statement by one step, returning the rewritten statement and
/// the environment to use for the next step.
///
/// The statement is taken by value. Subtrees the step does not touch are
/// moved into the result, so finishing one statement of a long sequence
/// costs the same as finishing the only one.
///
/// `While` is desugared in a single step into
/// `if (cond) { body; while (cond) { body } } else { do-nothing }`
/// without evaluating the condition.
pub fn reduce_stmt(mut stmt: Stmt, env: Environment) -> EvalResult<(Stmt, Environment)> {
    match &mut stmt {
        Stmt::DoNothing => Err(EvalError::Irreducible(stmt.to_string())),

        Stmt::Assign(name, expr) => match expr.as_value() {
            Some(value) => Ok((Stmt::DoNothing, env.assign(mem::take(name), value))),
            None => {
                *expr = reduce_expr(expr, &env)?;
                Ok((stmt, env))
            }
        },

        Stmt::If(cond, cons, alt) => match cond.as_value() {
            Some(value) => {
                let branch = if expect_boolean(value, CONDITION)? {
                    cons
                } else {
                    alt
                };
                Ok((mem::take(&mut **branch), env))
            }
            None => {
                *cond = reduce_expr(cond, &env)?;
                Ok((stmt, env))
            }
        },

        Stmt::Sequence(first, second) => {
            if matches!(**first, Stmt::DoNothing) {
                Ok((mem::take(&mut **second), env))
            } else {
                let (reduced, env) = reduce_stmt(mem::take(&mut **first), env)?;
                **first = reduced;
                Ok((stmt, env))
            }
        }

        Stmt::While(cond, body) => {
            let cond = cond.clone();
            let body = (**body).clone();
            Ok((Stmt::if_else(cond, Stmt::sequence(body, stmt), Stmt::DoNothing), env))
        }
    }
}

/// A program the [`Machine`](crate::Machine) can drive to normal form.
pub trait Reducible: Sized + fmt::Display {
    /// Whether another step is possible.
    fn is_reducible(&self) -> bool;

    /// Perform one step, threading the environment.
    fn step(self, env: Environment) -> EvalResult<(Self, Environment)>;
}

impl Reducible for Expr {
    fn is_reducible(&self) -> bool {
        Expr::is_reducible(self)
    }

    fn step(self, env: Environment) -> EvalResult<(Self, Environment)> {
        let expr = reduce_expr(&self, &env)?;
        Ok((expr, env))
    }
}

impl Reducible for Stmt {
    fn is_reducible(&self) -> bool {
        Stmt::is_reducible(self)
    }

    fn step(self, env: Environment) -> EvalResult<(Self, Environment)> {
        reduce_stmt(self, env)
    }
}
