//! Error types for codec, engine and container operations.

use crate::container::Cardinality;
use thiserror::Error;

/// Reasons a value cannot be written onto a single automaton track.
///
/// Validation always happens before any automaton is built, so a failed
/// construction never leaves a partially populated container behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The text contains one of the reserved sentinel characters
    /// (`'\0'`, used by the engine for epsilon, or `'\u{1}'`, the tuple pad).
    #[error("reserved character {0:?} cannot appear in a value")]
    ReservedSymbol(char),

    /// A `[` or `]` has no partner, or brackets are nested.
    ///
    /// Brackets delimit multi-character tokens. A literal bracket must be
    /// written as `\[` or `\]`.
    #[error("unbalanced '[' or ']' at byte {0}; write '\\[' or '\\]' for a literal bracket")]
    UnbalancedBrackets(usize),

    /// A backslash is not followed by `[`, `]` or `\`.
    #[error("invalid escape at byte {0}; only '\\[', '\\]' and '\\\\' are recognised")]
    InvalidEscape(usize),

    /// A bracketed token cannot be stored as one engine symbol and read back
    /// unchanged (too short, or spelled like an engine escape such as `<LF>`).
    #[error("invalid multi-character token {0:?}")]
    InvalidToken(String),

    /// A tuple has a different number of fields than its codec.
    #[error("expected a tuple of {expected} fields, found {found}")]
    ArityMismatch {
        /// Arity of the codec
        expected: usize,
        /// Arity of the rejected value
        found: usize,
    },

    /// The value is text where a tuple was expected, or the other way round.
    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        /// Kind the codec accepts
        expected: &'static str,
        /// Kind of the rejected value
        found: &'static str,
    },
}

/// Errors raised by this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value could not be encoded by the chosen codec.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A prototype value has no codec (for example, an empty tuple).
    #[error("unsupported prototype: {0}")]
    UnsupportedPrototype(String),

    /// Two containers' codecs are not the same interned instance.
    ///
    /// Codecs from different registries never match, even if they describe
    /// the same shape.
    #[error("incompatible containers for {operation}: {reason}")]
    Incompatible {
        /// Operation that was refused
        operation: &'static str,
        /// Which codecs differ
        reason: &'static str,
    },

    /// The operation has no automaton for this container's shape.
    ///
    /// Tuple tracks are interleaved, so tuples concatenate field by field
    /// only through enumeration, which needs finite operands.
    #[error("{operation} is not supported: {reason}")]
    Unsupported {
        /// Operation that was refused
        operation: &'static str,
        /// Why it cannot be built
        reason: &'static str,
    },

    /// A lookup composed to an empty result.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Enumeration was requested without a limit on an automaton accepting
    /// infinitely many paths.
    #[error("cannot enumerate a cyclic automaton without a limit")]
    UnboundedEnumeration,

    /// A track produced by the engine could not be decoded.
    #[error("cannot decode track {track:?}: {reason}")]
    Decode {
        /// The offending track text
        track: String,
        /// Why decoding failed
        reason: String,
    },

    /// `single()` was called on a set that does not hold exactly one element.
    #[error("expected exactly one element, found {0}")]
    NotSingleton(Cardinality),
}

impl Error {
    pub(crate) fn decode(track: &str, reason: impl Into<String>) -> Self {
        Error::Decode {
            track: track.to_string(),
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
