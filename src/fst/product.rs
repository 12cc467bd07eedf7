//! Product constructions: composition, intersection, difference and
//! equivalence.

use super::{Fst, Label, StateId, Tape, Transition};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, VecDeque};
use std::hash::Hash;

/// Builds a product automaton lazily, one reachable state pair at a time.
struct ProductBuilder<K> {
    out: Fst,
    index: FxHashMap<K, StateId>,
    queue: VecDeque<K>,
}

impl<K: Clone + Eq + Hash> ProductBuilder<K> {
    fn new(start: K) -> Self {
        let mut builder = ProductBuilder {
            out: Fst::new(),
            index: FxHashMap::default(),
            queue: VecDeque::new(),
        };
        let id = builder.state(start);
        builder.out.set_start(id);
        builder
    }

    fn state(&mut self, key: K) -> StateId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.out.add_state();
        self.index.insert(key.clone(), id);
        self.queue.push_back(key);
        id
    }

    fn next(&mut self) -> Option<(StateId, K)> {
        let key = self.queue.pop_front()?;
        Some((self.index[&key], key))
    }

    fn arc(&mut self, from: StateId, ilabel: Label, olabel: Label, to: K) {
        let next = self.state(to);
        self.out
            .add_transition(from, Transition::new(ilabel, olabel, next));
    }

    fn finish(self) -> Fst {
        self.out.connect()
    }
}

/// Deterministic automaton over (input, output) label pairs.
///
/// Treating each pair as one letter turns a transducer into an acceptor over
/// pairs; the subset construction then applies unchanged.
#[derive(Debug)]
struct PairDfa {
    transitions: Vec<BTreeMap<(Label, Label), usize>>,
    finals: Vec<bool>,
}

impl PairDfa {
    /// Subset construction. `fst` must be free of epsilon:epsilon arcs.
    fn determinize(fst: &Fst) -> Option<Self> {
        let start = fst.start()?;
        let mut dfa = PairDfa {
            transitions: Vec::new(),
            finals: Vec::new(),
        };
        let mut index: FxHashMap<Vec<StateId>, usize> = FxHashMap::default();
        let mut queue = VecDeque::new();

        let initial = vec![start];
        index.insert(initial.clone(), 0);
        dfa.push(fst, &initial);
        queue.push_back(initial);

        while let Some(subset) = queue.pop_front() {
            let from = index[&subset];
            let mut moves: BTreeMap<(Label, Label), Vec<StateId>> = BTreeMap::new();
            for &state in &subset {
                for t in fst.transitions(state) {
                    moves
                        .entry((t.ilabel.clone(), t.olabel.clone()))
                        .or_default()
                        .push(t.next);
                }
            }
            for (label, mut targets) in moves {
                targets.sort_unstable();
                targets.dedup();
                let to = match index.get(&targets) {
                    Some(&to) => to,
                    None => {
                        let to = dfa.push(fst, &targets);
                        index.insert(targets.clone(), to);
                        queue.push_back(targets);
                        to
                    }
                };
                dfa.transitions[from].insert(label, to);
            }
        }
        Some(dfa)
    }

    fn push(&mut self, fst: &Fst, subset: &[StateId]) -> usize {
        self.transitions.push(BTreeMap::new());
        self.finals
            .push(subset.iter().any(|&state| fst.is_final(state)));
        self.finals.len() - 1
    }

    fn step(&self, state: Option<usize>, label: &(Label, Label)) -> Option<usize> {
        state.and_then(|s| self.transitions[s].get(label).copied())
    }

    fn is_final(&self, state: Option<usize>) -> bool {
        state.is_some_and(|s| self.finals[s])
    }
}

impl Fst {
    /// Relational composition: `x:z` for every `x:y` of `self` and `y:z` of
    /// `other`.
    pub fn compose(&self, other: &Fst) -> Fst {
        let (a, b) = (self.optimize(), other.optimize());
        let (Some(sa), Some(sb)) = (a.start(), b.start()) else {
            return Fst::new();
        };

        let mut builder = ProductBuilder::new((sa, sb));
        while let Some((from, (p, q))) = builder.next() {
            builder
                .out
                .set_final(from, a.is_final(p) && b.is_final(q));
            for ta in a.transitions(p) {
                match &ta.olabel {
                    None => builder.arc(from, ta.ilabel.clone(), None, (ta.next, q)),
                    Some(middle) => {
                        for tb in b.transitions(q) {
                            if tb.ilabel.as_ref() == Some(middle) {
                                builder.arc(
                                    from,
                                    ta.ilabel.clone(),
                                    tb.olabel.clone(),
                                    (ta.next, tb.next),
                                );
                            }
                        }
                    }
                }
            }
            for tb in b.transitions(q) {
                if tb.ilabel.is_none() {
                    builder.arc(from, None, tb.olabel.clone(), (p, tb.next));
                }
            }
        }
        builder.finish()
    }

    /// Composition that passes unmatched inputs through unchanged.
    ///
    /// Inputs of `self` whose outputs `other` cannot read keep their original
    /// mapping; every other input is composed as in [`Fst::compose`].
    pub fn lenient_compose(&self, other: &Fst) -> Fst {
        let strict = self.compose(other);
        let unmatched = self
            .project(Tape::Input)
            .difference(&strict.project(Tape::Input));
        let passthrough = unmatched.compose(self);
        strict.union(&passthrough).optimize()
    }

    /// Intersection of two acceptors.
    pub fn intersect(&self, other: &Fst) -> Fst {
        let (a, b) = (self.optimize(), other.optimize());
        let (Some(sa), Some(sb)) = (a.start(), b.start()) else {
            return Fst::new();
        };

        let mut builder = ProductBuilder::new((sa, sb));
        while let Some((from, (p, q))) = builder.next() {
            builder
                .out
                .set_final(from, a.is_final(p) && b.is_final(q));
            for ta in a.transitions(p) {
                for tb in b.transitions(q) {
                    if ta.ilabel == tb.ilabel && ta.olabel == tb.olabel {
                        builder.arc(
                            from,
                            ta.ilabel.clone(),
                            ta.olabel.clone(),
                            (ta.next, tb.next),
                        );
                    }
                }
            }
        }
        builder.finish()
    }

    /// Pairs accepted by `self` but not by `other` (acceptors).
    pub fn difference(&self, other: &Fst) -> Fst {
        let a = self.optimize();
        let Some(sa) = a.start() else {
            return Fst::new();
        };
        let Some(dfa) = PairDfa::determinize(&other.optimize()) else {
            return a;
        };

        let mut builder = ProductBuilder::new((sa, Some(0)));
        while let Some((from, (p, d))) = builder.next() {
            builder
                .out
                .set_final(from, a.is_final(p) && !dfa.is_final(d));
            for ta in a.transitions(p) {
                let label = (ta.ilabel.clone(), ta.olabel.clone());
                let next = dfa.step(d, &label);
                builder.arc(from, label.0, label.1, (ta.next, next));
            }
        }
        builder.finish()
    }

    /// Whether both automata accept the same set of pairs.
    ///
    /// Exact when both are acyclic. Otherwise the automata are compared as
    /// acceptors over aligned label pairs, which is exact for acceptors and
    /// for transducers that align their tapes the same way.
    pub fn equivalent(&self, other: &Fst) -> bool {
        let (a, b) = (self.optimize(), other.optimize());
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }

        if !a.is_cyclic() && !b.is_cyclic() {
            let collect = |fst: Fst| -> Option<FxHashSet<super::Path>> {
                fst.paths(None).ok().map(|paths| paths.collect())
            };
            return collect(a) == collect(b);
        }

        let (Some(da), Some(db)) = (PairDfa::determinize(&a), PairDfa::determinize(&b)) else {
            return false;
        };
        let mut seen: FxHashSet<(Option<usize>, Option<usize>)> = FxHashSet::default();
        let mut queue = VecDeque::from([(Some(0), Some(0))]);
        seen.insert((Some(0), Some(0)));
        while let Some((x, y)) = queue.pop_front() {
            if da.is_final(x) != db.is_final(y) {
                return false;
            }
            let labels = x
                .into_iter()
                .flat_map(|s| da.transitions[s].keys())
                .chain(y.into_iter().flat_map(|s| db.transitions[s].keys()));
            for label in labels {
                let pair = (da.step(x, label), db.step(y, label));
                if seen.insert(pair) {
                    queue.push_back(pair);
                }
            }
        }
        true
    }
}
