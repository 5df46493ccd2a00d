//! Integration tests for DFA/NFA designs.
//!
//! Tests key automaton features:
//! - DFA and NFA acceptance
//! - design idempotence (fresh simulator per input)
//! - rejection vs. missing-rule errors
//! - free moves
//! - subset construction agreeing with its source NFA

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simple_automata::{
    AutomatonError, DFADesign, DFARulebook, FARule, NFADesign, NFARulebook,
};
use std::collections::BTreeSet;

// ══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ══════════════════════════════════════════════════════════════════════════════

/// Accepts strings over {a, b} containing the substring "ab".
fn contains_ab() -> DFADesign<u32, char> {
    let rulebook = DFARulebook::from_iter([
        (1, 'a', 2),
        (1, 'b', 1),
        (2, 'a', 2),
        (2, 'b', 3),
        (3, 'a', 3),
        (3, 'b', 3),
    ]);
    DFADesign::new(1, [3], rulebook)
}

/// Accepts strings over {a, b} whose third-from-last character is `b`.
fn third_from_last_is_b() -> NFADesign<u32, char> {
    let rulebook = NFARulebook::from_iter([
        (1, 'a', 1),
        (1, 'b', 1),
        (1, 'b', 2),
        (2, 'a', 3),
        (2, 'b', 3),
        (3, 'a', 4),
        (3, 'b', 4),
    ]);
    NFADesign::new(1, [4], rulebook)
}

/// Accepts runs of `a` whose length is a multiple of two or of three.
fn multiple_of_two_or_three() -> NFADesign<u32, char> {
    let rulebook = NFARulebook::new(vec![
        FARule::free_move(1, 2),
        FARule::free_move(1, 4),
        FARule::new(2, 'a', 3),
        FARule::new(3, 'a', 2),
        FARule::new(4, 'a', 5),
        FARule::new(5, 'a', 6),
        FARule::new(6, 'a', 4),
    ]);
    NFADesign::new(1, [2, 4], rulebook)
}

/// Free moves out of accept-adjacent states: a(b|ab)* style loop.
fn looping_with_free_moves() -> NFADesign<u32, char> {
    let rulebook = NFARulebook::new(vec![
        FARule::new(1, 'a', 1),
        FARule::new(1, 'a', 2),
        FARule::free_move(1, 2),
        FARule::new(2, 'b', 3),
        FARule::new(3, 'b', 1),
        FARule::free_move(3, 2),
    ]);
    NFADesign::new(1, [3], rulebook)
}

// ══════════════════════════════════════════════════════════════════════════════
// DFA
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn dfa_design_accepts() {
    let design = contains_ab();
    assert_eq!(design.accepts("".chars()), Ok(false));
    assert_eq!(design.accepts("a".chars()), Ok(false));
    assert_eq!(design.accepts("baa".chars()), Ok(false));
    assert_eq!(design.accepts("baaab".chars()), Ok(true));
    assert_eq!(design.accepts("abbbba".chars()), Ok(true));
}

#[test]
fn dfa_design_is_idempotent() {
    let design = contains_ab();
    let before = design.clone();
    for _ in 0..3 {
        assert_eq!(design.accepts("baaab".chars()), Ok(true));
        assert_eq!(design.accepts("baa".chars()), Ok(false));
    }
    assert_eq!(design, before);
}

#[test]
fn dfa_simulator_reads_whole_string() {
    let design = contains_ab();
    let mut dfa = design.to_dfa();
    assert_eq!(dfa.current_state(), &1);
    dfa.read_string("baaab".chars()).unwrap();
    assert_eq!(dfa.current_state(), &3);
    assert!(dfa.accepting());
    // Accepting is not terminal.
    dfa.read_string("aa".chars()).unwrap();
    assert!(dfa.accepting());
    // The design's simulators are independent.
    assert_eq!(design.to_dfa().current_state(), &1);
}

#[test]
fn dfa_missing_rule_is_an_error() {
    let rulebook = DFARulebook::from_iter([(1, 'a', 2), (2, 'a', 1)]);
    assert_eq!(
        rulebook.next_state(&2, &'b'),
        Err(AutomatonError::NoApplicableRule {
            state: "2".into(),
            character: "'b'".into(),
        })
    );
    let design = DFADesign::new(1, [1], rulebook);
    assert_eq!(design.accepts("aa".chars()), Ok(true));
    assert!(matches!(
        design.accepts("ab".chars()),
        Err(AutomatonError::NoApplicableRule { .. })
    ));
}

#[test]
fn dfa_over_non_char_symbols() {
    // Parity of 1s in a bit stream.
    let rulebook = DFARulebook::from_iter([
        ("even", 0u8, "even"),
        ("even", 1, "odd"),
        ("odd", 0, "odd"),
        ("odd", 1, "even"),
    ]);
    let design = DFADesign::new("even", ["even"], rulebook);
    assert_eq!(design.accepts([1, 0, 1]), Ok(true));
    assert_eq!(design.accepts([1, 1, 1]), Ok(false));
    assert_eq!(design.accepts(Vec::<u8>::new()), Ok(true));
}

// ══════════════════════════════════════════════════════════════════════════════
// NFA
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn nfa_design_accepts() {
    let design = third_from_last_is_b();
    assert!(design.accepts("bab".chars()));
    assert!(design.accepts("bbbbb".chars()));
    assert!(!design.accepts("bbabb".chars()));
    assert!(!design.accepts("".chars()));
}

#[test]
fn nfa_next_states() {
    let design = third_from_last_is_b();
    let rulebook = design.rulebook();
    assert_eq!(
        rulebook.next_states(&BTreeSet::from([1]), &'b'),
        BTreeSet::from([1, 2])
    );
    assert_eq!(
        rulebook.next_states(&BTreeSet::from([1, 2]), &'a'),
        BTreeSet::from([1, 3])
    );
    assert_eq!(
        rulebook.next_states(&BTreeSet::from([1, 3]), &'b'),
        BTreeSet::from([1, 2, 4])
    );
}

#[test]
fn nfa_design_is_idempotent() {
    let design = third_from_last_is_b();
    let before = design.clone();
    assert!(design.accepts("bab".chars()));
    assert!(design.accepts("bab".chars()));
    assert!(!design.accepts("bbabb".chars()));
    assert_eq!(design, before);
}

#[test]
fn nfa_unknown_character_rejects_without_error() {
    let design = third_from_last_is_b();
    let mut nfa = design.to_nfa();
    nfa.read_string("bzz".chars());
    assert!(nfa.current_states().is_empty());
    assert!(!nfa.accepting());
}

#[test]
fn nfa_free_moves() {
    let design = multiple_of_two_or_three();
    assert_eq!(design.to_nfa().current_states(), BTreeSet::from([1, 2, 4]));
    assert!(design.accepts("".chars()));
    assert!(design.accepts("aa".chars()));
    assert!(design.accepts("aaa".chars()));
    assert!(design.accepts("aaaa".chars()));
    assert!(!design.accepts("aaaaa".chars()));
    assert!(design.accepts("aaaaaa".chars()));
    assert!(!design.accepts("a".chars()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Subset construction
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn subset_construction_matches_known_results() {
    let dfa = looping_with_free_moves().to_dfa_design();
    assert_eq!(dfa.accepts("aaa".chars()), Ok(false));
    assert_eq!(dfa.accepts("aab".chars()), Ok(true));
    assert_eq!(dfa.accepts("bbbabb".chars()), Ok(true));
}

#[test]
fn subset_construction_of_plain_nfa_is_total() {
    let dfa = third_from_last_is_b().to_dfa_design();
    assert_eq!(dfa.rulebook().check_deterministic(), Ok(()));
    for state in dfa.rulebook().rules().iter().map(|r| &r.state) {
        assert!(dfa.rulebook().next_state(state, &'a').is_ok());
        assert!(dfa.rulebook().next_state(state, &'b').is_ok());
    }
}

fn ab_strings() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b']), 0..12)
}

proptest! {
    #[test]
    fn subset_dfa_agrees_with_nfa(input in ab_strings()) {
        for nfa in [third_from_last_is_b(), looping_with_free_moves()] {
            let dfa = nfa.to_dfa_design();
            prop_assert_eq!(dfa.accepts(input.clone()), Ok(nfa.accepts(input.clone())));
        }
    }

    #[test]
    fn free_move_nfa_counts_runs(n in 0usize..30) {
        let input = std::iter::repeat('a').take(n);
        prop_assert_eq!(multiple_of_two_or_three().accepts(input), n % 2 == 0 || n % 3 == 0);
    }
}
