//! Rational operations and tape manipulation.

use super::{Fst, Label, Tape, Transition};
use crate::symbol::Symbol;
use std::collections::BTreeSet;

impl Fst {
    /// Accept every pair accepted by `self` or by `other`.
    pub fn union(&self, other: &Fst) -> Fst {
        let mut result = Fst::new();
        let start = result.add_state();
        result.set_start(start);
        for operand in [self, other] {
            let offset = result.append(operand);
            if let Some(s) = operand.start {
                result.add_transition(start, Transition::epsilon(s + offset));
            }
        }
        result
    }

    /// Accept `xy:uv` for every `x:u` of `self` and `y:v` of `other`.
    pub fn concat(&self, other: &Fst) -> Fst {
        let mut result = self.clone();
        let finals: Vec<_> = self.final_states().collect();
        let offset = result.append(other);
        for state in finals {
            result.set_final(state, false);
            if let Some(s) = other.start {
                result.add_transition(state, Transition::epsilon(s + offset));
            }
        }
        result
    }

    /// Kleene star: zero or more repetitions.
    pub fn closure(&self) -> Fst {
        let mut result = Fst::epsilon_acceptor();
        let start = 0;
        let offset = result.append(self);
        if let Some(s) = self.start {
            result.add_transition(start, Transition::epsilon(s + offset));
            for state in self.final_states() {
                result.add_transition(state + offset, Transition::epsilon(s + offset));
            }
        }
        result
    }

    /// Kleene plus: one or more repetitions.
    pub fn plus(&self) -> Fst {
        self.concat(&self.closure())
    }

    /// Swap the input and output tapes.
    pub fn invert(&self) -> Fst {
        self.map_labels(|t| (t.olabel.clone(), t.ilabel.clone()))
    }

    /// Keep one tape, turning the transducer into an acceptor.
    pub fn project(&self, tape: Tape) -> Fst {
        self.map_labels(|t| {
            let label = match tape {
                Tape::Input => t.ilabel.clone(),
                Tape::Output => t.olabel.clone(),
            };
            (label.clone(), label)
        })
    }

    /// Cross product: map every input string of `self` to every output
    /// string of `other`.
    pub fn cross(&self, other: &Fst) -> Fst {
        let upper = self.map_labels(|t| (t.ilabel.clone(), None));
        let lower = other.map_labels(|t| (None, t.olabel.clone()));
        upper.concat(&lower)
    }

    /// Rewrite every transition's labels, keeping the topology.
    pub fn map_labels<F>(&self, f: F) -> Fst
    where
        F: Fn(&Transition) -> (Label, Label),
    {
        let mut result = self.clone();
        for state in &mut result.states {
            for transition in state.transitions.iter_mut() {
                let (ilabel, olabel) = f(transition);
                transition.ilabel = ilabel;
                transition.olabel = olabel;
            }
        }
        result
    }

    /// Every non-epsilon symbol on either tape.
    pub fn sigma(&self) -> BTreeSet<Symbol> {
        self.states
            .iter()
            .flat_map(|state| state.transitions.iter())
            .flat_map(|t| [t.ilabel.clone(), t.olabel.clone()])
            .flatten()
            .collect()
    }
}
