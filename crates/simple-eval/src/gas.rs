//! Step metering.
//!
//! Neither engine bounds execution by default: `while (true) { ... }` runs
//! forever. A caller that wants bounded execution configures a gas limit and
//! the engine fails with [`EvalError::GasExhausted`] once it is exceeded.

use crate::error::{EvalError, EvalResult};

/// Gas counter with an optional limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gas {
    used: u64,
    limit: Option<u64>,
}

impl Gas {
    /// A counter that never runs out.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// A counter that fails on the `limit + 1`-th tick.
    pub fn limited(limit: u64) -> Self {
        Self {
            used: 0,
            limit: Some(limit),
        }
    }

    /// Consume one unit of gas.
    pub fn tick(&mut self) -> EvalResult<()> {
        self.used += 1;
        match self.limit {
            Some(limit) if self.used > limit => Err(EvalError::GasExhausted),
            _ => Ok(()),
        }
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
