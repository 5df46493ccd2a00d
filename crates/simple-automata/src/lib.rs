//! Finite automaton simulators.
//!
//! A rulebook is an ordered list of [`FARule`]s. A design
//! ([`DFADesign`] / [`NFADesign`]) pairs a rulebook with a start state and a
//! set of accept states and manufactures a fresh simulator for every input
//! it is asked about, so designs and rulebooks are never mutated.
//!
//! States and input characters are generic; anything `Ord + Clone` works.
//! NFA state sets are `BTreeSet`s, which keeps iteration deterministic.

mod error;
mod rule;
mod subset;

pub mod dfa;
pub mod nfa;

pub use dfa::{DFADesign, DFARulebook, DFA};
pub use error::{AutomatonError, AutomatonResult};
pub use nfa::{NFADesign, NFARulebook, NFA};
pub use rule::FARule;
