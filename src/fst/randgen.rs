//! Random path sampling.

use super::{Fst, Path};
use rand::Rng;

/// Walks abandoned per requested path before sampling gives up.
const ATTEMPTS_PER_PATH: usize = 16;

impl Fst {
    /// Sample up to `npath` accepted pairs by uniform random walks.
    ///
    /// At every state the walk picks uniformly among the outgoing transitions
    /// and, at a final state, stopping. Walks longer than `max_length`
    /// transitions are discarded. Duplicates are possible.
    pub fn randgen<R: Rng>(&self, npath: usize, max_length: usize, rng: &mut R) -> Vec<Path> {
        let fst = self.optimize();
        let Some(start) = fst.start() else {
            return Vec::new();
        };

        let mut paths = Vec::with_capacity(npath);
        let mut attempts = npath.saturating_mul(ATTEMPTS_PER_PATH);
        while paths.len() < npath && attempts > 0 {
            attempts -= 1;
            let mut path = Path {
                input: Vec::new(),
                output: Vec::new(),
            };
            let mut state = start;
            let mut steps = 0;
            loop {
                let transitions = fst.transitions(state);
                let choices = transitions.len() + usize::from(fst.is_final(state));
                if choices == 0 {
                    break;
                }
                let choice = rng.gen_range(0..choices);
                if choice == transitions.len() {
                    paths.push(path);
                    break;
                }
                if steps == max_length {
                    break;
                }
                let t = &transitions[choice];
                path.input.extend(t.ilabel.iter().cloned());
                path.output.extend(t.olabel.iter().cloned());
                state = t.next;
                steps += 1;
            }
        }
        paths
    }
}
