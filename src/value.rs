//! Application values stored in containers, and their shapes.
//!
//! A [`Value`] is either text or a fixed-arity tuple of values. Its
//! [`Shape`] is decided once from a prototype and selects the codec used to
//! put every other value of that container onto a track.
//!
//! # Examples
//!
//! ```
//! use fsmcontainers::value::{Shape, Value};
//!
//! let pair = Value::from(("hello", ""));
//! assert_eq!(Shape::of(&pair).unwrap(), Shape::Tuple(vec![Shape::Text, Shape::Text]));
//! assert_eq!(pair.to_string(), "('hello', '')");
//! ```

use crate::error::{Error, Result, ValidationError};
use std::fmt;

/// A text value or a tuple of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Value {
    /// Scalar text
    Text(String),
    /// Fixed-arity tuple; each field is itself a value
    Tuple(Vec<Value>),
}

impl Value {
    /// Build a tuple value from its fields.
    pub fn tuple<I, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(fields.into_iter().map(Into::into).collect())
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Tuple(_) => None,
        }
    }

    /// The fields, if this is a tuple value.
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Text(_) => None,
            Value::Tuple(fields) => Some(fields),
        }
    }

    /// Concatenate text with text, and tuples field by field.
    pub(crate) fn concat(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Text(left), Value::Text(right)) => Ok(Value::Text(format!("{left}{right}"))),
            (Value::Tuple(left), Value::Tuple(right)) if left.len() == right.len() => left
                .iter()
                .zip(right)
                .map(|(l, r)| l.concat(r))
                .collect::<Result<Vec<_>>>()
                .map(Value::Tuple),
            _ => Err(ValidationError::ShapeMismatch {
                expected: self.kind(),
                found: other.kind(),
            }
            .into()),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Tuple(_) => "tuple",
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

macro_rules! impl_tuple_value {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Value::Tuple(vec![$($name.into()),+])
            }
        }
    };
}

impl_tuple_value!(A);
impl_tuple_value!(A, B);
impl_tuple_value!(A, B, C);
impl_tuple_value!(A, B, C, D);
impl_tuple_value!(A, B, C, D, E);

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "'{}'", text.escape_debug()),
            Value::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                if fields.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// The shape of a value: what a codec needs to know to encode it.
///
/// Two values have the same shape when both are text, or both are tuples of
/// the same arity whose fields have pairwise equal shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Shape {
    /// Scalar text
    Text,
    /// Tuple with one sub-shape per field
    Tuple(Vec<Shape>),
}

impl Shape {
    /// Derive the shape of a prototype value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPrototype`] for an empty tuple (at any
    /// nesting depth), which has no track representation.
    pub fn of(prototype: &Value) -> Result<Shape> {
        match prototype {
            Value::Text(_) => Ok(Shape::Text),
            Value::Tuple(fields) if fields.is_empty() => Err(Error::UnsupportedPrototype(
                "tuples must have at least one field".to_string(),
            )),
            Value::Tuple(fields) => fields
                .iter()
                .map(Shape::of)
                .collect::<Result<Vec<_>>>()
                .map(Shape::Tuple),
        }
    }

    /// Number of fields for a tuple shape.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Shape::Text => None,
            Shape::Tuple(fields) => Some(fields.len()),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Text => f.write_str("text"),
            Shape::Tuple(fields) => {
                f.write_str("(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_conversion() {
        let value = Value::from(("a", "b", "c"));
        assert_eq!(value.as_tuple().map(<[Value]>::len), Some(3));
        assert_eq!(value, Value::tuple(["a", "b", "c"]));
    }

    #[test]
    fn test_shape_of_nested_tuple() {
        let value = Value::from((("a", "b"), "c"));
        let shape = Shape::of(&value).unwrap();
        assert_eq!(
            shape,
            Shape::Tuple(vec![
                Shape::Tuple(vec![Shape::Text, Shape::Text]),
                Shape::Text
            ])
        );
        assert_eq!(shape.arity(), Some(2));
        assert_eq!(shape.to_string(), "((text, text), text)");
    }

    #[test]
    fn test_empty_tuple_is_unsupported() {
        let empty = Value::Tuple(Vec::new());
        assert!(matches!(
            Shape::of(&empty),
            Err(Error::UnsupportedPrototype(_))
        ));

        let nested = Value::Tuple(vec![Value::from("a"), Value::Tuple(Vec::new())]);
        assert!(Shape::of(&nested).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("cat").to_string(), "'cat'");
        assert_eq!(Value::from("a\nb").to_string(), "'a\\nb'");
        assert_eq!(Value::from(("x",)).to_string(), "('x',)");
        assert_eq!(Value::from(("x", ("y", "z"))).to_string(), "('x', ('y', 'z'))");
    }

    #[test]
    fn test_concat_is_fieldwise() {
        let left = Value::from(("a", ("b", "")));
        let right = Value::from(("[xy]", ("", "c")));
        assert_eq!(
            left.concat(&right).unwrap(),
            Value::from(("a[xy]", ("b", "c")))
        );
        assert!(Value::from("a").concat(&Value::from(("a",))).is_err());
        assert!(Value::from(("a",)).concat(&Value::from(("a", "b"))).is_err());
    }

    #[test]
    fn test_compare_with_str() {
        assert_eq!(Value::from("dog"), "dog");
        assert_ne!(Value::from(("dog",)), "dog");
    }
}
