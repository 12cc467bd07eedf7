//! Scalar text codec.
//!
//! Encoding is the identity on text, after checking that the text can be
//! stored on a track and read back unchanged.

use crate::error::{Error, Result, ValidationError};
use crate::symbol::{self, NUL, PAD};
use crate::value::Value;

/// Check that `text` can be stored on a track and read back unchanged.
pub(crate) fn validate(text: &str) -> std::result::Result<(), ValidationError> {
    if let Some(reserved) = text.chars().find(|&c| c == NUL || c == PAD) {
        return Err(ValidationError::ReservedSymbol(reserved));
    }
    symbol::split_units(text).map(|_| ())
}

pub(crate) fn encode(value: &Value) -> Result<String> {
    match value {
        Value::Text(text) => {
            validate(text)?;
            Ok(text.clone())
        }
        Value::Tuple(_) => Err(ValidationError::ShapeMismatch {
            expected: "text",
            found: value.kind(),
        }
        .into()),
    }
}

pub(crate) fn decode(track: &str) -> Result<Value> {
    validate(track).map_err(|err| Error::decode(track, err.to_string()))?;
    Ok(Value::Text(track.to_string()))
}
