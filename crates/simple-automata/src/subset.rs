//! NFA → DFA conversion by subset construction.

use std::collections::BTreeSet;
use std::fmt;

use crate::dfa::{DFADesign, DFARulebook};
use crate::nfa::NFADesign;
use crate::rule::FARule;

impl<S, C> NFADesign<S, C>
where
    S: Clone + Ord + fmt::Debug,
    C: Clone + Ord + fmt::Debug,
{
    /// Build an equivalent DFA whose states are sets of NFA states.
    ///
    /// Only sets reachable from the start state are generated. The result
    /// has a rule for every reachable set and every character in the NFA's
    /// alphabet; the empty set acts as the dead state. Characters outside
    /// the alphabet have no rule, so the DFA reports `NoApplicableRule` for
    /// them where the NFA would simply reject.
    pub fn to_dfa_design(&self) -> DFADesign<BTreeSet<S>, C> {
        let rulebook = self.rulebook();
        let alphabet = rulebook.alphabet();
        let start = rulebook.follow_free_moves(BTreeSet::from([self.start_state().clone()]));

        let mut discovered = BTreeSet::from([start.clone()]);
        let mut pending = vec![start.clone()];
        let mut rules = Vec::new();

        while let Some(states) = pending.pop() {
            for character in &alphabet {
                let next = rulebook.follow_free_moves(rulebook.next_states(&states, character));
                if discovered.insert(next.clone()) {
                    pending.push(next.clone());
                }
                rules.push(FARule::new(states.clone(), character.clone(), next));
            }
        }

        let accept_states: Vec<BTreeSet<S>> = discovered
            .into_iter()
            .filter(|states| states.iter().any(|s| self.accept_states().contains(s)))
            .collect();

        tracing::debug!(
            rules = rules.len(),
            accept_states = accept_states.len(),
            "subset construction finished"
        );

        DFADesign::new(start, accept_states, DFARulebook::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use crate::{FARule, NFADesign, NFARulebook};
    use std::collections::BTreeSet;

    #[test]
    fn test_reachable_sets_only() {
        let design = NFADesign::new(
            1,
            [3],
            NFARulebook::new(vec![
                FARule::new(1, 'a', 1),
                FARule::new(1, 'a', 2),
                FARule::free_move(1, 2),
                FARule::new(2, 'b', 3),
                FARule::new(3, 'b', 1),
                FARule::free_move(3, 2),
            ]),
        );
        let dfa = design.to_dfa_design();
        assert_eq!(dfa.start_state(), &BTreeSet::from([1, 2]));

        let states: BTreeSet<BTreeSet<u32>> = dfa
            .rulebook()
            .rules()
            .iter()
            .map(|rule| rule.state.clone())
            .collect();
        assert_eq!(
            states,
            BTreeSet::from([
                BTreeSet::new(),
                BTreeSet::from([1, 2]),
                BTreeSet::from([2, 3]),
                BTreeSet::from([1, 2, 3]),
            ])
        );
        assert_eq!(dfa.rulebook().rules().len(), 8);
        assert_eq!(
            dfa.accept_states(),
            &BTreeSet::from([BTreeSet::from([2, 3]), BTreeSet::from([1, 2, 3])])
        );
        assert_eq!(dfa.rulebook().check_deterministic(), Ok(()));
    }
}
