//! Interning registry for codecs.

use super::Codec;
use crate::error::Result;
use crate::value::{Shape, Value};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Memoizing codec factory keyed by shape.
///
/// Every request for a given shape returns the same `Arc<Codec>`, including
/// requests racing on different threads: insertion goes through the map's
/// entry API, so the first insert wins and later callers observe it. Field
/// codecs of a tuple shape are interned first, without holding any lock.
///
/// The registry is an ordinary value rather than a global. Containers built
/// from different registries never interoperate, since their codecs are
/// different instances.
///
/// # Example
///
/// ```
/// use fsmcontainers::codec::{same_codec, CodecRegistry};
/// use fsmcontainers::value::Value;
///
/// let registry = CodecRegistry::new();
/// let a = registry.codec_for(&Value::from("cat")).unwrap();
/// let b = registry.codec_for(&Value::from("dog")).unwrap();
/// assert!(same_codec(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: DashMap<Shape, Arc<Codec>>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical codec for the shape of `prototype`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::UnsupportedPrototype`] if the prototype has no shape
    /// (an empty tuple anywhere inside it).
    pub fn codec_for(&self, prototype: &Value) -> Result<Arc<Codec>> {
        let shape = Shape::of(prototype)?;
        Ok(self.codec_for_shape(&shape))
    }

    /// The canonical codec for `shape`.
    pub fn codec_for_shape(&self, shape: &Shape) -> Arc<Codec> {
        if let Some(codec) = self.codecs.get(shape) {
            return Arc::clone(codec.value());
        }

        let codec = match shape {
            Shape::Text => Codec::text(),
            Shape::Tuple(fields) => Codec::tuple(
                fields
                    .iter()
                    .map(|field| self.codec_for_shape(field))
                    .collect(),
            ),
        };

        let entry = self.codecs.entry(shape.clone()).or_insert_with(|| {
            debug!(shape = %shape, "registered codec");
            Arc::new(codec)
        });
        Arc::clone(entry.value())
    }

    /// The text codec.
    pub fn text(&self) -> Arc<Codec> {
        self.codec_for_shape(&Shape::Text)
    }

    /// Number of interned shapes.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether no codec has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::same_codec;

    #[test]
    fn test_same_shape_same_instance() {
        let registry = CodecRegistry::new();
        let a = registry.codec_for(&Value::from(("a", "b"))).unwrap();
        let b = registry.codec_for(&Value::from(("", "long value"))).unwrap();
        assert!(same_codec(&a, &b));
    }

    #[test]
    fn test_different_shapes_differ() {
        let registry = CodecRegistry::new();
        let pair = registry.codec_for(&Value::from(("a", "b"))).unwrap();
        let triple = registry.codec_for(&Value::from(("a", "b", "c"))).unwrap();
        let nested = registry.codec_for(&Value::from((("a", "b"), "c"))).unwrap();
        assert!(!same_codec(&pair, &triple));
        assert!(!same_codec(&pair, &nested));
    }

    #[test]
    fn test_field_codecs_are_interned() {
        let registry = CodecRegistry::new();
        let nested = registry.codec_for(&Value::from((("a", "b"), "c"))).unwrap();
        let pair = registry.codec_for(&Value::from(("x", "y"))).unwrap();
        assert!(same_codec(&nested.fields()[0], &pair));
        assert!(same_codec(&nested.fields()[1], &registry.text()));
        // text, pair, nested
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registries_are_independent() {
        let first = CodecRegistry::new();
        let second = CodecRegistry::new();
        assert!(!same_codec(&first.text(), &second.text()));
    }
}
