//! # fsmcontainers
//!
//! Set and map containers backed by finite-state automata.
//!
//! An [`FsmSet`](container::FsmSet) is an acceptor and an
//! [`FsmMap`](container::FsmMap) a transducer, but both read like ordinary
//! collections of [`Value`](value::Value)s: text, or fixed-arity tuples of
//! values. Structural [codecs](codec) flatten each value onto one automaton
//! track (tuples are interleaved symbol by symbol) and decode the engine's
//! paths back into values.
//!
//! Because the contents are automata, containers also support the rational
//! operations (concatenation, closure, cross product) and relational
//! composition, and may hold infinitely many elements. Enumeration of an
//! infinite container requires a limit.
//!
//! ## Example
//!
//! ```rust
//! use fsmcontainers::prelude::*;
//!
//! let registry = CodecRegistry::new();
//! let words = FsmSet::new(&registry, ["walk", "talk"]).unwrap();
//! let suffixes = FsmSet::new(&registry, ["", "s", "ed"]).unwrap();
//!
//! let forms = words.concat(&suffixes).unwrap();
//! assert_eq!(forms.len(), 6);
//! assert!(forms.contains("talked").unwrap());
//!
//! let plural = words.cross(&FsmSet::new(&registry, ["walks", "talks"]).unwrap());
//! assert_eq!(plural.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ambiguity;
pub mod codec;
pub mod container;
pub mod error;
pub mod fst;
pub mod symbol;
pub mod value;

pub use crate::error::{Error, Result};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::ambiguity::{find_nonfunctional, AmbiguityCheck};
    pub use crate::codec::{same_codec, Codec, CodecRegistry};
    pub use crate::container::{Cardinality, FsmMap, FsmSet, Lookup, Side, View};
    pub use crate::error::{Error, Result, ValidationError};
    pub use crate::value::{Shape, Value};
}
