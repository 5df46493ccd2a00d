//! The small-step driving loop.

use simple_types::{Expr, Stmt, Value};

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::gas::Gas;
use crate::reduce::Reducible;

/// Drives a program to normal form by repeated single-step reduction.
///
/// The machine owns its program and environment exclusively. Without a gas
/// limit it runs until the program is irreducible, which for a
/// non-terminating program is never.
#[derive(Debug, Clone)]
pub struct Machine<P> {
    program: P,
    env: Environment,
    gas: Gas,
}

impl<P: Reducible> Machine<P> {
    pub fn new(program: P, env: Environment) -> Self {
        Self {
            program,
            env,
            gas: Gas::unlimited(),
        }
    }

    /// Fail with `GasExhausted` after `limit` reduction steps.
    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas = Gas::limited(limit);
        self
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.gas.used()
    }

    pub fn is_halted(&self) -> bool {
        !self.program.is_reducible()
    }

    /// Perform one reduction step, consuming the machine and returning it
    /// in its next state.
    pub fn step(self) -> EvalResult<Self> {
        let Machine {
            program,
            env,
            mut gas,
        } = self;
        gas.tick()?;
        let (program, env) = program.step(env)?;
        tracing::trace!(step = gas.used(), program = %program, env = %env, "reduced");
        Ok(Machine { program, env, gas })
    }

    /// Reduce until the program is irreducible.
    #[tracing::instrument(level = "debug", skip_all, fields(program = %self.program))]
    pub fn run(mut self) -> EvalResult<(P, Environment)> {
        while self.program.is_reducible() {
            self = self.step()?;
        }
        tracing::debug!(steps = self.gas.used(), "machine halted");
        Ok((self.program, self.env))
    }

    /// Reduce until the program is irreducible, recording every
    /// intermediate program and environment, starting with the initial one.
    pub fn trace(mut self) -> EvalResult<Vec<(P, Environment)>>
    where
        P: Clone,
    {
        let mut states = vec![(self.program.clone(), self.env.clone())];
        while self.program.is_reducible() {
            self = self.step()?;
            states.push((self.program.clone(), self.env.clone()));
        }
        Ok(states)
    }
}

/// Reduce an expression to its value.
pub fn run_expr(expr: Expr, env: Environment) -> EvalResult<Value> {
    let (expr, _) = Machine::new(expr, env).run()?;
    expr.as_value().ok_or_else(|| EvalError::Irreducible(expr.to_string()))
}

/// Reduce a statement to `do-nothing` and return the final environment.
pub fn run_stmt(stmt: Stmt, env: Environment) -> EvalResult<Environment> {
    let (_, env) = Machine::new(stmt, env).run()?;
    Ok(env)
}
