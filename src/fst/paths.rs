//! Ordered enumeration of accepted (input, output) pairs.

use super::{Fst, StateId};
use crate::error::{Error, Result};
use crate::symbol::{render_track, Symbol};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::debug;

/// One accepted pair, as symbol sequences without epsilons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    /// Symbols read on the input tape
    pub input: Vec<Symbol>,
    /// Symbols written on the output tape
    pub output: Vec<Symbol>,
}

impl Path {
    /// The input side as track text.
    pub fn input_track(&self) -> String {
        render_track(&self.input)
    }

    /// The output side as track text.
    pub fn output_track(&self) -> String {
        render_track(&self.output)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Partial {
    length: usize,
    input: Vec<Symbol>,
    output: Vec<Symbol>,
    state: StateId,
}

/// Iterator over the distinct pairs of an automaton.
///
/// Pairs come out ordered by the number of transitions on their shortest
/// path, then lexicographically by input and output. The search is a
/// best-first walk, so an automaton with infinitely many pairs can still be
/// consumed lazily up to a limit.
#[derive(Debug)]
pub struct Paths {
    fst: Arc<Fst>,
    heap: BinaryHeap<Reverse<Partial>>,
    seen: FxHashSet<Path>,
    remaining: Option<usize>,
}

impl Paths {
    /// Enumerate `fst`, which must already be epsilon-free and trimmed.
    pub(crate) fn new(fst: Arc<Fst>, limit: Option<usize>) -> Self {
        let mut heap = BinaryHeap::new();
        if let Some(start) = fst.start() {
            heap.push(Reverse(Partial {
                length: 0,
                input: Vec::new(),
                output: Vec::new(),
                state: start,
            }));
        }
        Paths {
            fst,
            heap,
            seen: FxHashSet::default(),
            remaining: limit,
        }
    }

    /// Like [`Paths::new`], but refuses unbounded enumeration of a cyclic
    /// automaton.
    pub(crate) fn checked(fst: Arc<Fst>, limit: Option<usize>) -> Result<Self> {
        if limit.is_none() && fst.is_cyclic() {
            debug!(states = fst.num_states(), "refusing unbounded enumeration");
            return Err(Error::UnboundedEnumeration);
        }
        Ok(Paths::new(fst, limit))
    }
}

impl Iterator for Paths {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        if self.remaining == Some(0) {
            return None;
        }
        while let Some(Reverse(partial)) = self.heap.pop() {
            for t in self.fst.transitions(partial.state) {
                let mut input = partial.input.clone();
                let mut output = partial.output.clone();
                input.extend(t.ilabel.iter().cloned());
                output.extend(t.olabel.iter().cloned());
                self.heap.push(Reverse(Partial {
                    length: partial.length + 1,
                    input,
                    output,
                    state: t.next,
                }));
            }

            if !self.fst.is_final(partial.state) {
                continue;
            }
            let path = Path {
                input: partial.input,
                output: partial.output,
            };
            if self.seen.insert(path.clone()) {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                return Some(path);
            }
        }
        None
    }
}

impl Fst {
    /// Enumerate the distinct accepted pairs, shortest first.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundedEnumeration`] if `limit` is `None` and the automaton
    /// accepts infinitely many pairs.
    pub fn paths(&self, limit: Option<usize>) -> Result<Paths> {
        Paths::checked(Arc::new(self.optimize()), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::compile_track;

    fn acceptor(track: &str) -> Fst {
        Fst::acceptor(compile_track(track).unwrap())
    }

    #[test]
    fn test_order_is_length_then_lexicographic() {
        let fst = acceptor("b")
            .union(&acceptor("aa"))
            .union(&acceptor("a"))
            .union(&acceptor(""));
        let order: Vec<String> = fst.paths(None).unwrap().map(|p| p.input_track()).collect();
        assert_eq!(order, vec!["", "a", "b", "aa"]);
    }

    #[test]
    fn test_duplicates_are_reported_once() {
        let fst = acceptor("x").union(&acceptor("x"));
        assert_eq!(fst.paths(None).unwrap().count(), 1);
    }

    #[test]
    fn test_unbounded_enumeration_refused() {
        let fst = acceptor("a").closure();
        assert!(matches!(fst.paths(None), Err(Error::UnboundedEnumeration)));
        assert_eq!(fst.paths(Some(4)).unwrap().count(), 4);
    }

    #[test]
    fn test_limit_zero_and_empty() {
        assert_eq!(acceptor("a").paths(Some(0)).unwrap().count(), 0);
        assert_eq!(Fst::new().paths(None).unwrap().count(), 0);
    }
}
