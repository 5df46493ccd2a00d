//! Transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single transition: in `state`, reading `character`, move to
/// `next_state`.
///
/// A rule without a character is a free move, followed without consuming
/// input. Only NFA rulebooks follow free moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FARule<S, C> {
    pub state: S,
    pub character: Option<C>,
    pub next_state: S,
}

impl<S, C> FARule<S, C> {
    pub fn new(state: S, character: C, next_state: S) -> Self {
        Self {
            state,
            character: Some(character),
            next_state,
        }
    }

    pub fn free_move(state: S, next_state: S) -> Self {
        Self {
            state,
            character: None,
            next_state,
        }
    }

    pub fn is_free_move(&self) -> bool {
        self.character.is_none()
    }

    /// The state this rule leads to.
    pub fn follow(&self) -> &S {
        &self.next_state
    }
}

impl<S: PartialEq, C: PartialEq> FARule<S, C> {
    /// Exact match on state and character. Free moves never apply to a
    /// character.
    pub fn applies_to(&self, state: &S, character: &C) -> bool {
        self.state == *state && self.character.as_ref() == Some(character)
    }

    pub(crate) fn is_free_move_from(&self, state: &S) -> bool {
        self.state == *state && self.character.is_none()
    }
}

impl<S: fmt::Display, C: fmt::Display> fmt::Display for FARule<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.character {
            Some(c) => write!(f, "{} --{}--> {}", self.state, c, self.next_state),
            None => write!(f, "{} --ε--> {}", self.state, self.next_state),
        }
    }
}

impl<S, C> From<(S, C, S)> for FARule<S, C> {
    fn from((state, character, next_state): (S, C, S)) -> Self {
        Self::new(state, character, next_state)
    }
}
