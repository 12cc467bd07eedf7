//! Set and map containers backed by automata.
//!
//! [`FsmSet`] wraps an acceptor and [`FsmMap`] a transducer. Both pair an
//! immutable, shared [`Fst`] with the interned codecs that wrote its tracks,
//! so every operation can check compatibility by codec identity and decode
//! the engine's paths back into [`Value`]s.
//!
//! Containers never mutate their automaton. Algebra returns a new container
//! holding a new `Arc<Fst>`; projections and views share the existing one.
//!
//! # Example
//!
//! ```
//! use fsmcontainers::codec::CodecRegistry;
//! use fsmcontainers::container::FsmSet;
//!
//! let registry = CodecRegistry::new();
//! let pets = FsmSet::new(&registry, ["cat", "dog"]).unwrap();
//! let birds = FsmSet::new(&registry, ["dog", "bird"]).unwrap();
//!
//! let common = pets.intersection(&birds).unwrap();
//! assert_eq!(common.to_vec(None).unwrap(), vec!["dog"]);
//! assert!(pets.contains("cat").unwrap());
//! ```

mod iter;
mod map;
mod set;

pub use self::iter::{Elements, Items};
pub use self::map::FsmMap;
pub use self::set::FsmSet;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::fst::{Fst, Paths};
use crate::symbol::{compile_track, Symbol};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Number of elements (or pairs) a container holds.
///
/// A cyclic automaton accepts infinitely many strings, so its length is
/// [`Cardinality::Infinite`], which compares greater than every finite count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cardinality {
    /// A finite number of distinct entries
    Finite(usize),
    /// Infinitely many entries
    Infinite,
}

impl Cardinality {
    /// Whether the container is infinite.
    pub fn is_infinite(&self) -> bool {
        matches!(self, Cardinality::Infinite)
    }

    /// The finite count, if there is one.
    pub fn finite(&self) -> Option<usize> {
        match self {
            Cardinality::Finite(n) => Some(*n),
            Cardinality::Infinite => None,
        }
    }
}

impl PartialEq<usize> for Cardinality {
    fn eq(&self, other: &usize) -> bool {
        *self == Cardinality::Finite(*other)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Finite(n) => write!(f, "{}", n),
            Cardinality::Infinite => f.write_str("infinitely many"),
        }
    }
}

/// How [`FsmMap::lookup`] treats a key with several values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Return one value, the first in path order
    #[default]
    One,
    /// Return a set of every value
    All,
    /// Return a set of at most this many values, the first in path order
    Only(usize),
}

/// Result of [`FsmMap::lookup`], shaped by the map's [`View`].
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The single value chosen under [`View::One`]
    One(Value),
    /// The matching values under [`View::All`] or [`View::Only`]
    Many(FsmSet),
}

/// One side of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The key (input) side
    Key,
    /// The value (output) side
    Value,
}

/// Encode `value` with `codec` and compile the track into engine symbols.
fn encode_symbols(codec: &Codec, value: &Value) -> Result<Vec<Symbol>> {
    let track = codec.encode(value)?;
    Ok(compile_track(&track)?)
}

/// Whether joining two tracks of `codec` joins the values they encode.
///
/// Text tracks concatenate like text. Tuple tracks are interleaved, so their
/// fields only line up again after re-encoding.
fn concatenates_on_track(codec: &Codec) -> bool {
    codec.arity().is_none()
}

/// Refuse an iterated concatenation over tuple tracks.
fn ensure_closable(codec: &Codec, operation: &'static str) -> Result<()> {
    if concatenates_on_track(codec) {
        Ok(())
    } else {
        Err(Error::Unsupported {
            operation,
            reason: "tuples concatenate field by field, which has no finite automaton over interleaved tracks",
        })
    }
}

/// Refuse a fieldwise concatenation with an infinite operand.
fn ensure_finite(fst: &Fst, operation: &'static str) -> Result<()> {
    if fst.is_cyclic() {
        Err(Error::Unsupported {
            operation,
            reason: "tuples concatenate field by field only when both operands are finite",
        })
    } else {
        Ok(())
    }
}

/// Count the distinct pairs of an optimized automaton.
fn cardinality(fst: &Arc<Fst>) -> Cardinality {
    if fst.is_cyclic() {
        Cardinality::Infinite
    } else {
        Cardinality::Finite(Paths::new(Arc::clone(fst), None).count())
    }
}

/// Compare the number of distinct pairs against `n` without counting past
/// `n + 1`.
fn cardinality_cmp(fst: &Arc<Fst>, n: usize) -> Ordering {
    Paths::new(Arc::clone(fst), Some(n.saturating_add(1)))
        .count()
        .cmp(&n)
}

/// Write the first three of the four shortest entries, sorted.
fn write_sample<T, F>(f: &mut fmt::Formatter<'_>, mut sample: Vec<T>, write: F) -> fmt::Result
where
    T: Ord,
    F: Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
{
    let more = sample.len() > 3;
    sample.sort();
    for (i, entry) in sample.iter().take(3).enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write(f, entry)?;
    }
    if more {
        f.write_str(", ... ")?;
    }
    Ok(())
}
