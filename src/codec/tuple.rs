//! Tuple codec: fixed-arity tuples interleaved onto one track.
//!
//! Each field is encoded by its own codec and right-padded with [`PAD`] to
//! the width of the longest field, counted in track units. The padded fields
//! are then interleaved one unit at a time:
//!
//! ```text
//! ("hello", "")  ->  h\1e\1l\1l\1o\1
//! ("ab", "xyz")  ->  axby\1z
//! ```
//!
//! Decoding deals the units back into `arity` lanes, strips trailing pads
//! from each lane and decodes each lane with its field codec. A lane for a
//! nested tuple may lose trailing pads to the outer strip; the nested decode
//! treats missing units at the end of its track as pads, so nothing is lost.
//!
//! Only canonical tracks decode. A track that is not the encoding of the
//! tuple it would decode to (interior pads, extra all-pad positions, or two
//! tracks joined end to end) is a decode error.

use super::Codec;
use crate::error::{Error, Result, ValidationError};
use crate::symbol::{self, PAD};
use crate::value::Value;
use std::sync::Arc;

pub(crate) fn encode(fields: &[Arc<Codec>], value: &Value) -> Result<String> {
    let items = match value {
        Value::Tuple(items) => items,
        Value::Text(_) => {
            return Err(ValidationError::ShapeMismatch {
                expected: "tuple",
                found: value.kind(),
            }
            .into())
        }
    };
    if items.len() != fields.len() {
        return Err(ValidationError::ArityMismatch {
            expected: fields.len(),
            found: items.len(),
        }
        .into());
    }

    let encoded = fields
        .iter()
        .zip(items)
        .map(|(codec, item)| codec.encode(item))
        .collect::<Result<Vec<_>>>()?;
    let lanes = encoded
        .iter()
        .map(|track| symbol::split_units(track))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let width = lanes.iter().map(Vec::len).max().unwrap_or(0);
    let mut track = String::with_capacity(width * lanes.len());
    for position in 0..width {
        for lane in &lanes {
            match lane.get(position) {
                Some(unit) => track.push_str(unit),
                None => track.push(PAD),
            }
        }
    }
    Ok(track)
}

pub(crate) fn decode(fields: &[Arc<Codec>], track: &str) -> Result<Value> {
    let value = deinterleave(fields, track)?;
    // Each tuple has exactly one accepted track.
    match encode(fields, &value) {
        Ok(canonical) if canonical == track => Ok(value),
        _ => Err(Error::decode(track, "not the canonical track of any tuple")),
    }
}

/// Deal the units of `track` into lanes and decode each lane.
///
/// Lanes of nested tuples arrive without the trailing pads the outer strip
/// removed, so no canonical check happens at this level.
pub(super) fn deinterleave(fields: &[Arc<Codec>], track: &str) -> Result<Value> {
    let arity = fields.len();
    if arity == 0 {
        return Err(Error::decode(track, "tuple codec without fields"));
    }
    let units = symbol::split_units(track).map_err(|err| Error::decode(track, err.to_string()))?;

    let mut lanes: Vec<Vec<&str>> = vec![Vec::with_capacity(units.len() / arity + 1); arity];
    for (i, unit) in units.into_iter().enumerate() {
        lanes[i % arity].push(unit);
    }

    fields
        .iter()
        .zip(lanes)
        .map(|(codec, mut lane)| {
            while lane.last().is_some_and(|unit| is_pad(unit)) {
                lane.pop();
            }
            codec.decode_lane(&lane.concat())
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Tuple)
}

fn is_pad(unit: &str) -> bool {
    let mut chars = unit.chars();
    chars.next() == Some(PAD) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecRegistry;

    fn codec_for(prototype: impl Into<Value>) -> Arc<Codec> {
        CodecRegistry::new().codec_for(&prototype.into()).unwrap()
    }

    #[test]
    fn test_interleaving() {
        let codec = codec_for(("", ""));
        assert_eq!(
            codec.encode(&Value::from(("ab", "xyz"))).unwrap(),
            "axby\u{1}z"
        );
        assert_eq!(
            codec.encode(&Value::from(("hello", ""))).unwrap(),
            "h\u{1}e\u{1}l\u{1}l\u{1}o\u{1}"
        );
    }

    #[test]
    fn test_width_counts_units_not_bytes() {
        let codec = codec_for(("", ""));
        let track = codec.encode(&Value::from(("[ab]c", "é"))).unwrap();
        assert_eq!(track, "[ab]éc\u{1}");
        assert_eq!(
            codec.decode(&track).unwrap(),
            Value::from(("[ab]c", "é"))
        );
    }

    #[test]
    fn test_empty_field_survives() {
        let codec = codec_for(("a", "b"));
        let value = Value::from(("hello", ""));
        let decoded = codec.decode(&codec.encode(&value).unwrap()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_empty_track_decodes_to_empty_fields() {
        let codec = codec_for(("", "", ""));
        assert_eq!(codec.decode("").unwrap(), Value::from(("", "", "")));
    }

    #[test]
    fn test_nested_tuple_round_trip() {
        let codec = codec_for((("", ""), ""));
        for value in [
            Value::from((("ab", "c"), "")),
            Value::from((("", "a"), "xyz")),
            Value::from((("abc", ""), "q")),
            Value::from((("", ""), "")),
        ] {
            let track = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(&track).unwrap(), value, "track {track:?}");
        }
    }

    #[test]
    fn test_arity_mismatch() {
        let codec = codec_for(("", ""));
        assert_eq!(
            codec.encode(&Value::from(("a", "b", "c"))),
            Err(ValidationError::ArityMismatch {
                expected: 2,
                found: 3
            }
            .into())
        );
    }

    #[test]
    fn test_field_validation_propagates() {
        let codec = codec_for(("", ""));
        assert!(codec.encode(&Value::from(("ok", "bad["))).is_err());
        assert!(codec.encode(&Value::from("text")).is_err());
    }

    #[test]
    fn test_only_canonical_tracks_decode() {
        let codec = codec_for(("", ""));
        assert_eq!(codec.decode("a\u{1}").unwrap(), Value::from(("a", "")));

        // Two tracks joined end to end do not line their fields up.
        let left = codec.encode(&Value::from(("a", "bb"))).unwrap();
        let right = codec.encode(&Value::from(("c", "d"))).unwrap();
        let joined = format!("{left}{right}");
        assert!(matches!(codec.decode(&joined), Err(Error::Decode { .. })));

        // Trailing all-pad positions would give ("a", "") a second track.
        assert!(matches!(
            codec.decode("a\u{1}\u{1}\u{1}"),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_nested_decode_after_outer_strip() {
        let codec = codec_for((("", ""), ""));
        let value = Value::from((("ab", "c"), ""));
        let track = codec.encode(&value).unwrap();
        assert_eq!(track, "a\u{1}c\u{1}b\u{1}\u{1}\u{1}");
        assert_eq!(codec.decode(&track).unwrap(), value);
    }
}
