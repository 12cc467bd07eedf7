//! Epsilon removal, trimming and structural queries.

use super::{Fst, State, StateId, Transition};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

impl Fst {
    /// Remove epsilon:epsilon transitions without changing the relation.
    ///
    /// Transitions with epsilon on only one tape are kept.
    pub fn rm_epsilon(&self) -> Fst {
        let states = (0..self.num_states())
            .map(|state| {
                let closure = self.epsilon_closure(state);
                let mut seen = FxHashSet::default();
                let mut transitions = SmallVec::new();
                let mut is_final = false;
                for &member in &closure {
                    is_final |= self.is_final(member);
                    for t in self.transitions(member) {
                        if !t.is_epsilon() && seen.insert(t.clone()) {
                            transitions.push(t.clone());
                        }
                    }
                }
                State {
                    transitions,
                    is_final,
                }
            })
            .collect();

        Fst {
            states,
            start: self.start,
        }
    }

    fn epsilon_closure(&self, state: StateId) -> Vec<StateId> {
        let mut closure = vec![state];
        let mut seen: FxHashSet<StateId> = closure.iter().copied().collect();
        let mut i = 0;
        while i < closure.len() {
            let current = closure[i];
            i += 1;
            for t in self.transitions(current) {
                if t.is_epsilon() && seen.insert(t.next) {
                    closure.push(t.next);
                }
            }
        }
        closure
    }

    /// States reachable from the start that can also reach a final state.
    pub(crate) fn live_states(&self) -> Vec<bool> {
        let n = self.num_states();
        let mut accessible = vec![false; n];
        if let Some(start) = self.start {
            let mut stack = vec![start];
            accessible[start] = true;
            while let Some(state) = stack.pop() {
                for t in self.transitions(state) {
                    if !accessible[t.next] {
                        accessible[t.next] = true;
                        stack.push(t.next);
                    }
                }
            }
        }

        let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for state in 0..n {
            for t in self.transitions(state) {
                reverse[t.next].push(state);
            }
        }
        let mut coaccessible = vec![false; n];
        let mut stack: Vec<StateId> = self.final_states().collect();
        for &state in &stack {
            coaccessible[state] = true;
        }
        while let Some(state) = stack.pop() {
            for &prev in &reverse[state] {
                if !coaccessible[prev] {
                    coaccessible[prev] = true;
                    stack.push(prev);
                }
            }
        }

        accessible
            .into_iter()
            .zip(coaccessible)
            .map(|(a, c)| a && c)
            .collect()
    }

    /// Drop states that lie on no successful path and renumber the rest.
    pub fn connect(&self) -> Fst {
        let live = self.live_states();
        let start = match self.start {
            Some(start) if live[start] => start,
            _ => return Fst::new(),
        };

        let mut remap = vec![usize::MAX; self.num_states()];
        let mut next_id = 0;
        for (state, &alive) in live.iter().enumerate() {
            if alive {
                remap[state] = next_id;
                next_id += 1;
            }
        }

        let states = self
            .states
            .iter()
            .zip(&live)
            .filter(|(_, &alive)| alive)
            .map(|(state, _)| State {
                transitions: state
                    .transitions
                    .iter()
                    .filter(|t| live[t.next])
                    .map(|t| Transition::new(t.ilabel.clone(), t.olabel.clone(), remap[t.next]))
                    .collect(),
                is_final: state.is_final,
            })
            .collect();

        Fst {
            states,
            start: Some(remap[start]),
        }
    }

    /// Epsilon removal followed by trimming.
    pub fn optimize(&self) -> Fst {
        self.rm_epsilon().connect()
    }

    /// Whether no path leads from the start to a final state.
    pub fn is_empty(&self) -> bool {
        match self.start {
            Some(start) => !self.live_states()[start],
            None => true,
        }
    }

    /// Whether the automaton accepts infinitely many pairs.
    ///
    /// Only cycles through live states count, and epsilon:epsilon loops are
    /// ignored since they add no pairs.
    pub fn is_cyclic(&self) -> bool {
        self.optimize().has_cycle()
    }

    /// Cycle detection by iterative three-colour depth-first search.
    fn has_cycle(&self) -> bool {
        const WHITE: u8 = 0;
        const GREY: u8 = 1;
        const BLACK: u8 = 2;

        let mut colour = vec![WHITE; self.num_states()];
        for root in 0..self.num_states() {
            if colour[root] != WHITE {
                continue;
            }
            let mut stack = vec![(root, 0usize)];
            colour[root] = GREY;
            while let Some((state, edge)) = stack.last_mut() {
                let transitions = self.transitions(*state);
                if *edge == transitions.len() {
                    colour[*state] = BLACK;
                    stack.pop();
                    continue;
                }
                let next = transitions[*edge].next;
                *edge += 1;
                match colour[next] {
                    GREY => return true,
                    WHITE => {
                        colour[next] = GREY;
                        stack.push((next, 0));
                    }
                    _ => {}
                }
            }
        }
        false
    }
}
