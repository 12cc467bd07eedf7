//! Structural codecs: values to tracks and back.
//!
//! A [`Codec`] is the encode/decode contract for one [`Shape`]. Codecs are
//! interned by a [`CodecRegistry`], so two containers can check that their
//! tracks were written the same way by comparing codec pointers
//! ([`same_codec`]) instead of walking codec trees.
//!
//! # Example
//!
//! ```
//! use fsmcontainers::codec::{same_codec, CodecRegistry};
//! use fsmcontainers::value::Value;
//!
//! let registry = CodecRegistry::new();
//! let codec = registry.codec_for(&Value::from(("a", "b"))).unwrap();
//!
//! let track = codec.encode(&Value::from(("hello", ""))).unwrap();
//! assert_eq!(codec.decode(&track).unwrap(), Value::from(("hello", "")));
//!
//! let again = registry.codec_for(&Value::from(("x", "y"))).unwrap();
//! assert!(same_codec(&codec, &again));
//! ```

mod registry;
pub(crate) mod text;
pub(crate) mod tuple;

pub use self::registry::CodecRegistry;

use crate::error::{Error, Result};
use crate::value::{Shape, Value};
use std::fmt;
use std::sync::Arc;

/// The encode/decode contract for one value shape.
///
/// Codecs are immutable. Obtain them from a [`CodecRegistry`]; a codec built
/// any other way never compares equal to a registry codec.
pub struct Codec {
    shape: Shape,
    kind: CodecKind,
}

enum CodecKind {
    Text,
    Tuple(Vec<Arc<Codec>>),
}

impl Codec {
    pub(crate) fn text() -> Self {
        Codec {
            shape: Shape::Text,
            kind: CodecKind::Text,
        }
    }

    pub(crate) fn tuple(fields: Vec<Arc<Codec>>) -> Self {
        Codec {
            shape: Shape::Tuple(fields.iter().map(|field| field.shape.clone()).collect()),
            kind: CodecKind::Tuple(fields),
        }
    }

    /// The shape this codec encodes.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Tuple arity, or `None` for the text codec.
    pub fn arity(&self) -> Option<usize> {
        self.shape.arity()
    }

    /// Per-field codecs of a tuple codec (empty for text).
    pub fn fields(&self) -> &[Arc<Codec>] {
        match &self.kind {
            CodecKind::Text => &[],
            CodecKind::Tuple(fields) => fields,
        }
    }

    /// Encode a value as a track.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the value has the wrong shape or arity, or
    /// contains text that cannot be stored losslessly.
    pub fn encode(&self, value: &Value) -> Result<String> {
        match &self.kind {
            CodecKind::Text => text::encode(value),
            CodecKind::Tuple(fields) => tuple::encode(fields, value),
        }
    }

    /// Decode a track produced by [`Codec::encode`].
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the track is malformed for this codec or is not
    /// exactly what [`Codec::encode`] writes for the decoded value.
    pub fn decode(&self, track: &str) -> Result<Value> {
        match &self.kind {
            CodecKind::Text => text::decode(track),
            CodecKind::Tuple(fields) => tuple::decode(fields, track),
        }
    }

    /// Decode one lane of an enclosing tuple track.
    fn decode_lane(&self, lane: &str) -> Result<Value> {
        match &self.kind {
            CodecKind::Text => text::decode(lane),
            CodecKind::Tuple(fields) => tuple::deinterleave(fields, lane),
        }
    }

    /// Whether `value` can be encoded by this codec.
    pub fn can_encode(&self, value: &Value) -> bool {
        self.encode(value).is_ok()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codec({})", self.shape)
    }
}

/// Whether two codec handles are the same interned instance.
pub fn same_codec(a: &Arc<Codec>, b: &Arc<Codec>) -> bool {
    Arc::ptr_eq(a, b)
}

pub(crate) fn ensure_same(
    a: &Arc<Codec>,
    b: &Arc<Codec>,
    operation: &'static str,
    reason: &'static str,
) -> Result<()> {
    if same_codec(a, b) {
        Ok(())
    } else {
        Err(Error::Incompatible { operation, reason })
    }
}
