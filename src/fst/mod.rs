//! A small finite-state transducer engine.
//!
//! [`Fst`] is an unweighted transducer whose transitions carry an input and
//! an output [`Label`] (`None` is epsilon). It provides the operations the
//! containers are built on: construction from string pairs, the rational
//! operations (union, concatenation, closure), composition, intersection,
//! difference, inversion, projection, equivalence, ordered path enumeration
//! and random path sampling.
//!
//! Every operation borrows its operands and returns a new automaton, so an
//! `Fst` can be shared behind an `Arc` by any number of containers.
//!
//! # Example
//!
//! ```
//! use fsmcontainers::fst::Fst;
//! use fsmcontainers::symbol::compile_track;
//!
//! let cat = Fst::acceptor(compile_track("cat").unwrap());
//! let dog = Fst::acceptor(compile_track("dog").unwrap());
//! let both = cat.union(&dog);
//!
//! assert_eq!(both.paths(None).unwrap().count(), 2);
//! assert!(!both.is_cyclic());
//! assert!(both.closure().is_cyclic());
//! ```

mod ops;
mod optimize;
mod paths;
mod product;
mod randgen;

pub use self::paths::{Path, Paths};

use crate::symbol::Symbol;
use smallvec::SmallVec;

/// Index of a state within an [`Fst`].
pub type StateId = usize;

/// A transition label; `None` is epsilon.
pub type Label = Option<Symbol>;

/// Which tape of a transducer an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tape {
    /// The upper (key) side
    Input,
    /// The lower (value) side
    Output,
}

/// A labelled transition to another state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Transition {
    /// Symbol read on the input tape
    pub ilabel: Label,
    /// Symbol written on the output tape
    pub olabel: Label,
    /// Target state
    pub next: StateId,
}

impl Transition {
    /// A transition with the given labels.
    pub fn new(ilabel: Label, olabel: Label, next: StateId) -> Self {
        Transition {
            ilabel,
            olabel,
            next,
        }
    }

    /// An epsilon:epsilon transition.
    pub fn epsilon(next: StateId) -> Self {
        Transition::new(None, None, next)
    }

    /// Whether both labels are epsilon.
    pub fn is_epsilon(&self) -> bool {
        self.ilabel.is_none() && self.olabel.is_none()
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
struct State {
    transitions: SmallVec<[Transition; 2]>,
    is_final: bool,
}

/// An unweighted finite-state transducer.
///
/// An acceptor is a transducer whose transitions carry equal input and
/// output labels.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Fst {
    states: Vec<State>,
    start: Option<StateId>,
}

impl Fst {
    /// An automaton with no states; it accepts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// An automaton accepting only the empty string on both tapes.
    pub fn epsilon_acceptor() -> Self {
        let mut fst = Fst::new();
        let start = fst.add_state();
        fst.set_start(start);
        fst.set_final(start, true);
        fst
    }

    /// An acceptor for exactly one symbol sequence.
    pub fn acceptor(symbols: Vec<Symbol>) -> Self {
        Fst::string_map([(symbols.clone(), symbols)])
    }

    /// A transducer accepting exactly the given (input, output) pairs.
    ///
    /// The two sides of each pair are aligned from the left; the shorter side
    /// is completed with epsilons. Pairs share prefixes, so the result is a
    /// trie over aligned label pairs and needs no further optimization.
    pub fn string_map<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Vec<Symbol>, Vec<Symbol>)>,
    {
        let mut fst = Fst::new();
        let start = fst.add_state();
        fst.set_start(start);

        let mut children: rustc_hash::FxHashMap<(StateId, Label, Label), StateId> =
            rustc_hash::FxHashMap::default();
        let mut any = false;

        for (input, output) in pairs {
            any = true;
            let mut state = start;
            for position in 0..input.len().max(output.len()) {
                let ilabel = input.get(position).cloned();
                let olabel = output.get(position).cloned();
                let key = (state, ilabel.clone(), olabel.clone());
                state = match children.get(&key) {
                    Some(&next) => next,
                    None => {
                        let next = fst.add_state();
                        fst.add_transition(state, Transition::new(ilabel, olabel, next));
                        children.insert(key, next);
                        next
                    }
                };
            }
            fst.set_final(state, true);
        }

        if any {
            fst
        } else {
            Fst::new()
        }
    }

    /// Add a fresh non-final state and return its id.
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Set the start state.
    pub fn set_start(&mut self, state: StateId) {
        self.start = Some(state);
    }

    /// Mark or unmark a state as final.
    ///
    /// # Panics
    ///
    /// Panics if `state >= num_states()`
    pub fn set_final(&mut self, state: StateId, is_final: bool) {
        self.states[state].is_final = is_final;
    }

    /// Add a transition leaving `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state >= num_states()`
    pub fn add_transition(&mut self, state: StateId, transition: Transition) {
        self.states[state].transitions.push(transition);
    }

    /// The start state, if any.
    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Total number of transitions.
    pub fn num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Transitions leaving `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state >= num_states()`
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.states[state].transitions
    }

    /// Whether `state` is final.
    ///
    /// # Panics
    ///
    /// Panics if `state >= num_states()`
    pub fn is_final(&self, state: StateId) -> bool {
        self.states[state].is_final
    }

    fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_final)
            .map(|(id, _)| id)
    }

    /// Copy every state of `other` into `self`, returning the id offset.
    fn append(&mut self, other: &Fst) -> StateId {
        let offset = self.states.len();
        self.states.extend(other.states.iter().map(|state| State {
            transitions: state
                .transitions
                .iter()
                .map(|t| Transition::new(t.ilabel.clone(), t.olabel.clone(), t.next + offset))
                .collect(),
            is_final: state.is_final,
        }));
        offset
    }

    /// Whether every transition carries equal input and output labels.
    pub fn is_acceptor(&self) -> bool {
        self.states
            .iter()
            .flat_map(|state| state.transitions.iter())
            .all(|t| t.ilabel == t.olabel)
    }
}
