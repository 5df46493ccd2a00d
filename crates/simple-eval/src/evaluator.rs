//! Big-step expression and statement evaluator.

use simple_types::{Expr, Stmt, Value};

use crate::env::Environment;
use crate::error::EvalResult;
use crate::gas::Gas;
use crate::ops::{expect_boolean, BinaryOp, CONDITION};

/// The big-step evaluator. Walks AST nodes and produces values or
/// environments directly.
///
/// `While` runs as an explicit loop rather than by re-evaluating itself, so
/// native stack depth is bounded by the depth of the AST and not by the
/// number of iterations.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    /// Ticked once per loop iteration.
    gas: Gas,
}

impl Evaluator {
    /// An evaluator with no iteration limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `GasExhausted` after `limit` loop iterations in total.
    pub fn with_gas_limit(limit: u64) -> Self {
        Self {
            gas: Gas::limited(limit),
        }
    }

    pub fn gas_used(&self) -> u64 {
        self.gas.used()
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a value.
    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Variable(name) => env.lookup(name),
            Expr::Add(l, r) => self.eval_binary(BinaryOp::Add, l, r, env),
            Expr::Multiply(l, r) => self.eval_binary(BinaryOp::Multiply, l, r, env),
            Expr::LessThan(l, r) => self.eval_binary(BinaryOp::LessThan, l, r, env),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult<Value> {
        let lv = self.evaluate(left, env)?;
        let rv = self.evaluate(right, env)?;
        op.apply(lv, rv)
    }

    fn eval_condition(&mut self, cond: &Expr, env: &Environment) -> EvalResult<bool> {
        let value = self.evaluate(cond, env)?;
        expect_boolean(value, CONDITION)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute a statement, returning the environment it leaves behind.
    pub fn execute(&mut self, stmt: &Stmt, env: Environment) -> EvalResult<Environment> {
        match stmt {
            Stmt::DoNothing => Ok(env),
            Stmt::Assign(name, expr) => {
                let value = self.evaluate(expr, &env)?;
                Ok(env.assign(name.clone(), value))
            }
            Stmt::If(cond, cons, alt) => {
                if self.eval_condition(cond, &env)? {
                    self.execute(cons, env)
                } else {
                    self.execute(alt, env)
                }
            }
            Stmt::Sequence(..) => self.exec_sequence(stmt, env),
            Stmt::While(cond, body) => self.exec_while(cond, body, env),
        }
    }

    /// Run a right-nested chain of sequences without recursing along it.
    fn exec_sequence(
        &mut self,
        mut stmt: &Stmt,
        mut env: Environment,
    ) -> EvalResult<Environment> {
        while let Stmt::Sequence(first, second) = stmt {
            env = self.execute(first, env)?;
            stmt = &**second;
        }
        self.execute(stmt, env)
    }

    fn exec_while(
        &mut self,
        cond: &Expr,
        body: &Stmt,
        mut env: Environment,
    ) -> EvalResult<Environment> {
        while self.eval_condition(cond, &env)? {
            self.gas.tick()?;
            tracing::trace!(iteration = self.gas.used(), env = %env, "while");
            env = self.execute(body, env)?;
        }
        Ok(env)
    }
}

/// Evaluate an expression with a fresh, unlimited evaluator.
pub fn evaluate(expr: &Expr, env: &Environment) -> EvalResult<Value> {
    Evaluator::new().evaluate(expr, env)
}

/// Execute a statement with a fresh, unlimited evaluator.
#[tracing::instrument(level = "debug", skip_all, fields(stmt = %stmt))]
pub fn execute(stmt: &Stmt, env: Environment) -> EvalResult<Environment> {
    let mut evaluator = Evaluator::new();
    let env = evaluator.execute(stmt, env)?;
    tracing::debug!(iterations = evaluator.gas_used(), "execution finished");
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use simple_types::Type;

    fn x() -> Expr {
        Expr::variable("x")
    }

    #[test]
    fn test_literals_evaluate_to_themselves() {
        let env = Environment::new();
        assert_eq!(evaluate(&Expr::number(23), &env), Ok(Value::Number(23)));
        assert_eq!(evaluate(&Expr::boolean(true), &env), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_do_nothing_is_identity() {
        let env = Environment::new().assign("x", 1);
        assert_eq!(execute(&Stmt::DoNothing, env.clone()), Ok(env));
    }

    #[test]
    fn test_while_condition_must_be_boolean() {
        let stmt = Stmt::while_loop(x(), Stmt::DoNothing);
        let err = execute(&stmt, Environment::new().assign("x", 0)).unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeMismatch {
                expected: Type::Boolean,
                found: Type::Number,
                context: "condition".into(),
            }
        );
    }

    #[test]
    fn test_gas_counts_loop_iterations() {
        // x = 0; while (x < 10) { x = x + 1 }
        let stmt = Stmt::while_loop(
            Expr::less_than(x(), 10.into()),
            Stmt::assign("x", Expr::add(x(), 1.into())),
        );
        let mut evaluator = Evaluator::new();
        evaluator
            .execute(&stmt, Environment::new().assign("x", 0))
            .unwrap();
        assert_eq!(evaluator.gas_used(), 10);

        let mut limited = Evaluator::with_gas_limit(5);
        let err = limited
            .execute(&stmt, Environment::new().assign("x", 0))
            .unwrap_err();
        assert_eq!(err, EvalError::GasExhausted);
    }
}
