//! Deterministic finite automata.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AutomatonError, AutomatonResult};
use crate::rule::FARule;

// ══════════════════════════════════════════════════════════════════════════════
// Rulebook
// ══════════════════════════════════════════════════════════════════════════════

/// A rulebook that must have exactly one rule per (state, character) pair
/// the automaton will encounter.
///
/// Keeping the rulebook total and unambiguous is the caller's
/// responsibility. [`DFARulebook::next_state`] takes the first matching rule
/// and never disambiguates; [`DFARulebook::check_deterministic`] can be used
/// to validate a rulebook up front. Free moves are never followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFARulebook<S, C> {
    rules: Vec<FARule<S, C>>,
}

impl<S, C> DFARulebook<S, C> {
    pub fn new(rules: Vec<FARule<S, C>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FARule<S, C>] {
        &self.rules
    }
}

impl<S, C> DFARulebook<S, C>
where
    S: Clone + Ord + fmt::Debug,
    C: Clone + Ord + fmt::Debug,
{
    /// All rules that apply, in book order.
    pub fn rules_for(&self, state: &S, character: &C) -> Vec<&FARule<S, C>> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(state, character))
            .collect()
    }

    /// The state reached from `state` by reading `character`.
    pub fn next_state(&self, state: &S, character: &C) -> AutomatonResult<S> {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(state, character))
            .map(|rule| rule.follow().clone())
            .ok_or_else(|| AutomatonError::NoApplicableRule {
                state: format!("{state:?}"),
                character: format!("{character:?}"),
            })
    }

    /// Fail with `AmbiguousRule` if any (state, character) pair has more
    /// than one rule.
    pub fn check_deterministic(&self) -> AutomatonResult<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            let Some(character) = &rule.character else {
                continue;
            };
            if !seen.insert((&rule.state, character)) {
                return Err(AutomatonError::AmbiguousRule {
                    state: format!("{:?}", rule.state),
                    character: format!("{character:?}"),
                    count: self.rules_for(&rule.state, character).len(),
                });
            }
        }
        Ok(())
    }
}

impl<S, C> FromIterator<(S, C, S)> for DFARulebook<S, C> {
    fn from_iter<I: IntoIterator<Item = (S, C, S)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(FARule::from).collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Simulator
// ══════════════════════════════════════════════════════════════════════════════

/// A running DFA: one current state plus borrowed accept states and rules.
///
/// Acceptance is a predicate on the current state, not a halting state; the
/// simulator keeps reading input after it has accepted.
#[derive(Debug, Clone)]
pub struct DFA<'a, S, C> {
    current_state: S,
    accept_states: &'a BTreeSet<S>,
    rulebook: &'a DFARulebook<S, C>,
}

impl<'a, S, C> DFA<'a, S, C>
where
    S: Clone + Ord + fmt::Debug,
    C: Clone + Ord + fmt::Debug,
{
    pub fn new(
        current_state: S,
        accept_states: &'a BTreeSet<S>,
        rulebook: &'a DFARulebook<S, C>,
    ) -> Self {
        Self {
            current_state,
            accept_states,
            rulebook,
        }
    }

    pub fn current_state(&self) -> &S {
        &self.current_state
    }

    pub fn accepting(&self) -> bool {
        self.accept_states.contains(&self.current_state)
    }

    pub fn read_character(&mut self, character: &C) -> AutomatonResult<()> {
        self.current_state = self.rulebook.next_state(&self.current_state, character)?;
        Ok(())
    }

    /// Read every character in order.
    pub fn read_string<I>(&mut self, input: I) -> AutomatonResult<()>
    where
        I: IntoIterator<Item = C>,
    {
        for character in input {
            self.read_character(&character)?;
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Design
// ══════════════════════════════════════════════════════════════════════════════

/// An immutable DFA description that builds fresh simulators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFADesign<S, C> {
    start_state: S,
    accept_states: BTreeSet<S>,
    rulebook: DFARulebook<S, C>,
}

impl<S, C> DFADesign<S, C>
where
    S: Clone + Ord + fmt::Debug,
    C: Clone + Ord + fmt::Debug,
{
    pub fn new(
        start_state: S,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: DFARulebook<S, C>,
    ) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    pub fn start_state(&self) -> &S {
        &self.start_state
    }

    pub fn accept_states(&self) -> &BTreeSet<S> {
        &self.accept_states
    }

    pub fn rulebook(&self) -> &DFARulebook<S, C> {
        &self.rulebook
    }

    /// A fresh simulator in the start state.
    pub fn to_dfa(&self) -> DFA<'_, S, C> {
        DFA::new(self.start_state.clone(), &self.accept_states, &self.rulebook)
    }

    /// Run a fresh simulator over `input` and report whether it accepts.
    pub fn accepts<I>(&self, input: I) -> AutomatonResult<bool>
    where
        I: IntoIterator<Item = C>,
    {
        let mut dfa = self.to_dfa();
        dfa.read_string(input)?;
        Ok(dfa.accepting())
    }
}
