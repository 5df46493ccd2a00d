//! Automaton error types.

use thiserror::Error;

/// Errors raised by deterministic rulebooks.
///
/// States and characters are rendered with `Debug` at the point of failure
/// so the error type does not carry the automaton's type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// A DFA rulebook has no rule for the current state and character.
    #[error("no rule applies to state {state} reading {character}")]
    NoApplicableRule { state: String, character: String },

    /// A DFA rulebook has more than one rule for a state and character.
    #[error("{count} rules apply to state {state} reading {character}")]
    AmbiguousRule {
        state: String,
        character: String,
        count: usize,
    },
}

/// Result alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;
