//! Decoding iterators over container paths.

use crate::codec::Codec;
use crate::error::Result;
use crate::fst::Paths;
use crate::value::Value;
use std::sync::Arc;

/// Decoded elements of a set, or the keys or values of a map.
///
/// Each item is decoded from the input tape of one path. Decoding only fails
/// if the automaton holds a track its codec never wrote, for example after
/// [`crate::container::FsmSet::from_fst`] with a mismatched codec.
#[derive(Debug)]
pub struct Elements {
    paths: Paths,
    codec: Arc<Codec>,
}

impl Elements {
    pub(crate) fn new(paths: Paths, codec: Arc<Codec>) -> Self {
        Elements { paths, codec }
    }
}

impl Iterator for Elements {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(self.codec.decode(&path.input_track()))
    }
}

/// Decoded `(key, value)` pairs of a map.
#[derive(Debug)]
pub struct Items {
    paths: Paths,
    key_codec: Arc<Codec>,
    value_codec: Arc<Codec>,
}

impl Items {
    pub(crate) fn new(paths: Paths, key_codec: Arc<Codec>, value_codec: Arc<Codec>) -> Self {
        Items {
            paths,
            key_codec,
            value_codec,
        }
    }
}

impl Iterator for Items {
    type Item = Result<(Value, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let key = match self.key_codec.decode(&path.input_track()) {
            Ok(key) => key,
            Err(err) => return Some(Err(err)),
        };
        Some(
            self.value_codec
                .decode(&path.output_track())
                .map(|value| (key, value)),
        )
    }
}
