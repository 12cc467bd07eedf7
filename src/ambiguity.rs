//! Probabilistic search for keys with more than one value.
//!
//! A map `f` is a function exactly when `invert(f) ∘ f` is the identity on
//! its values. Rather than deciding that exactly, the checker samples random
//! paths of `invert(f) ∘ f` and reports the first one whose two sides decode
//! to different values. Such a pair is two values of one key.
//!
//! The check is one-sided. A reported pair is always a genuine witness, but
//! finding none only means no sampled path disagreed: a rarely reached
//! ambiguous key can be missed, and sampling an infinite map only explores
//! paths up to the length bound.

use crate::container::FsmMap;
use crate::error::Result;
use crate::value::Value;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Default number of sampled paths.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Seed used unless [`AmbiguityCheck::seed`] overrides it, so that repeated
/// checks of the same map agree.
pub const DEFAULT_SEED: u64 = 0x5eed_f57;

/// Configurable non-functionality check.
///
/// # Example
///
/// ```
/// use fsmcontainers::ambiguity::AmbiguityCheck;
/// use fsmcontainers::codec::CodecRegistry;
/// use fsmcontainers::container::FsmMap;
///
/// let registry = CodecRegistry::new();
/// let map = FsmMap::new(&registry, [("a", "1"), ("b", "2")]).unwrap();
///
/// let check = AmbiguityCheck::new().sample_size(50).seed(7);
/// assert_eq!(check.run(&map).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct AmbiguityCheck {
    sample_size: usize,
    max_length: Option<usize>,
    seed: u64,
}

impl Default for AmbiguityCheck {
    fn default() -> Self {
        AmbiguityCheck {
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_length: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl AmbiguityCheck {
    /// A check with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of random paths to sample.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Longest sampled path, in transitions. Defaults to the sample size.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Random seed for the sampler.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sample `map` for two values of one key.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Decode`] if a sampled track cannot be decoded by the
    /// map's value codec.
    pub fn run(&self, map: &FsmMap) -> Result<Option<(Value, Value)>> {
        let fst = map.fst();
        let round_trip = fst.invert().compose(fst);
        let max_length = self.max_length.unwrap_or(self.sample_size);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let codec = map.value_codec();

        for path in round_trip.randgen(self.sample_size, max_length, &mut rng) {
            let top = codec.decode(&path.input_track())?;
            let bottom = codec.decode(&path.output_track())?;
            if top != bottom {
                debug!(%top, %bottom, "map is not functional");
                return Ok(Some((top, bottom)));
            }
        }
        Ok(None)
    }
}

/// Sample `map` for a key with two different values.
///
/// Uses `sample_size` random paths, each at most `sample_size` transitions
/// long. `None` means no counterexample was found, which does not prove the
/// map is a function.
pub fn find_nonfunctional(map: &FsmMap, sample_size: usize) -> Result<Option<(Value, Value)>> {
    AmbiguityCheck::new().sample_size(sample_size).run(map)
}
