//! Nondeterministic finite automata.

use std::collections::BTreeSet;

use crate::rule::FARule;

// ══════════════════════════════════════════════════════════════════════════════
// Rulebook
// ══════════════════════════════════════════════════════════════════════════════

/// A rulebook in which any number of rules may match a (state, character)
/// pair. Every match is followed; an empty result models rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFARulebook<S, C> {
    rules: Vec<FARule<S, C>>,
}

impl<S, C> NFARulebook<S, C> {
    pub fn new(rules: Vec<FARule<S, C>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FARule<S, C>] {
        &self.rules
    }
}

impl<S, C> NFARulebook<S, C>
where
    S: Clone + Ord,
    C: Clone + Ord,
{
    /// All rules that apply, in book order.
    pub fn rules_for(&self, state: &S, character: &C) -> Vec<&FARule<S, C>> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(state, character))
            .collect()
    }

    /// Every state reachable from `state` by one `character` transition.
    pub fn follow_rules_for<'a>(
        &'a self,
        state: &'a S,
        character: &'a C,
    ) -> impl Iterator<Item = &'a S> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.applies_to(state, character))
            .map(FARule::follow)
    }

    /// The union of `follow_rules_for` over every state in `states`.
    ///
    /// Free moves are not followed here; see [`NFARulebook::follow_free_moves`].
    pub fn next_states(&self, states: &BTreeSet<S>, character: &C) -> BTreeSet<S> {
        states
            .iter()
            .flat_map(|state| self.follow_rules_for(state, character))
            .cloned()
            .collect()
    }

    /// Extend `states` with everything reachable through free moves.
    pub fn follow_free_moves(&self, mut states: BTreeSet<S>) -> BTreeSet<S> {
        let mut pending: Vec<S> = states.iter().cloned().collect();
        while let Some(state) = pending.pop() {
            for rule in self.rules.iter().filter(|rule| rule.is_free_move_from(&state)) {
                if states.insert(rule.next_state.clone()) {
                    pending.push(rule.next_state.clone());
                }
            }
        }
        states
    }

    /// Distinct characters mentioned by non-free rules, in order.
    pub fn alphabet(&self) -> BTreeSet<C> {
        self.rules
            .iter()
            .filter_map(|rule| rule.character.clone())
            .collect()
    }
}

impl<S, C> FromIterator<(S, C, S)> for NFARulebook<S, C> {
    fn from_iter<I: IntoIterator<Item = (S, C, S)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(FARule::from).collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Simulator
// ══════════════════════════════════════════════════════════════════════════════

/// A running NFA: a set of current states plus borrowed accept states and
/// rules.
///
/// The stored set is exactly what the simulator was started with or moved
/// to; [`NFA::current_states`] adds the free-move closure on read.
#[derive(Debug, Clone)]
pub struct NFA<'a, S, C> {
    current_states: BTreeSet<S>,
    accept_states: &'a BTreeSet<S>,
    rulebook: &'a NFARulebook<S, C>,
}

impl<'a, S, C> NFA<'a, S, C>
where
    S: Clone + Ord,
    C: Clone + Ord,
{
    pub fn new(
        current_states: BTreeSet<S>,
        accept_states: &'a BTreeSet<S>,
        rulebook: &'a NFARulebook<S, C>,
    ) -> Self {
        Self {
            current_states,
            accept_states,
            rulebook,
        }
    }

    /// The current states, including those reachable by free moves.
    pub fn current_states(&self) -> BTreeSet<S> {
        self.rulebook.follow_free_moves(self.current_states.clone())
    }

    /// True if any current state is an accept state.
    pub fn accepting(&self) -> bool {
        self.current_states()
            .iter()
            .any(|state| self.accept_states.contains(state))
    }

    pub fn read_character(&mut self, character: &C) {
        self.current_states = self.rulebook.next_states(&self.current_states(), character);
    }

    /// Read every character in order. An empty state set stays empty.
    pub fn read_string<I>(&mut self, input: I)
    where
        I: IntoIterator<Item = C>,
    {
        for character in input {
            self.read_character(&character);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Design
// ══════════════════════════════════════════════════════════════════════════════

/// An immutable NFA description that builds fresh simulators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFADesign<S, C> {
    start_state: S,
    accept_states: BTreeSet<S>,
    rulebook: NFARulebook<S, C>,
}

impl<S, C> NFADesign<S, C>
where
    S: Clone + Ord,
    C: Clone + Ord,
{
    pub fn new(
        start_state: S,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: NFARulebook<S, C>,
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

    pub fn rulebook(&self) -> &NFARulebook<S, C> {
        &self.rulebook
    }

    /// A fresh simulator whose only state is the start state.
    pub fn to_nfa(&self) -> NFA<'_, S, C> {
        self.to_nfa_from(BTreeSet::from([self.start_state.clone()]))
    }

    /// A fresh simulator starting from an arbitrary set of states.
    pub fn to_nfa_from(&self, current_states: BTreeSet<S>) -> NFA<'_, S, C> {
        NFA::new(current_states, &self.accept_states, &self.rulebook)
    }

    /// Run a fresh simulator over `input` and report whether it accepts.
    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = C>,
    {
        let mut nfa = self.to_nfa();
        nfa.read_string(input);
        nfa.accepting()
    }
}
