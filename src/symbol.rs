//! Transition symbols and the translation between engine tokens and tracks.
//!
//! The engine labels transitions with [`Symbol`]s and reports paths as raw
//! tokens in an AT&T-like vocabulary (`a`, `<LF>`, `<0x85>`, `foo`).
//! [`decode_token`] turns each raw token back into track text, and
//! [`compile_track`] is its inverse: it splits a track into units and maps
//! each unit to the symbol the engine stores.
//!
//! # Track units
//!
//! | Track text | Unit | Symbol |
//! |------------|------|--------|
//! | `a` | single character | `Char('a')` |
//! | `\[` `\]` `\\` | escaped literal | `Char('[')`, `Char(']')`, `Char('\\')` |
//! | `[foo]` | multi-character token | `Token("foo")` |

use crate::error::ValidationError;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Pad sentinel used by the tuple codec to right-align fields.
pub const PAD: char = '\u{1}';

/// Reserved by the engine for epsilon; never allowed on a track.
pub const NUL: char = '\0';

/// Mnemonics for code points `0..=32`, indexed by code point.
const CONTROL_MNEMONICS: [&str; 33] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB",
    "ESC", "FS", "GS", "RS", "US", "SPACE",
];

/// A transition label: one character, or one multi-character token.
///
/// Ordering places characters (by code point) before tokens (by text); path
/// enumeration uses it to break ties between equally long paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Symbol {
    /// A single character
    Char(char),
    /// A multi-character token, written `[text]` on a track
    Token(Arc<str>),
}

impl Symbol {
    /// The raw token the engine reports for this symbol.
    pub fn raw_token(&self) -> Cow<'_, str> {
        match self {
            Symbol::Char(c) => {
                let code = *c as u32;
                if code < CONTROL_MNEMONICS.len() as u32 {
                    Cow::Owned(format!("<{}>", CONTROL_MNEMONICS[code as usize]))
                } else if code == 0x7f {
                    Cow::Borrowed("<DEL>")
                } else if c.is_control() {
                    Cow::Owned(format!("<0x{:02x}>", code))
                } else {
                    Cow::Owned(c.to_string())
                }
            }
            Symbol::Token(text) => Cow::Borrowed(text),
        }
    }

    /// Track text for this symbol.
    pub fn to_track(&self) -> String {
        decode_token(&self.raw_token())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_token())
    }
}

fn mnemonic_char(name: &str) -> Option<char> {
    match name {
        "" | "epsilon" => Some(NUL),
        "DEL" => Some('\u{7f}'),
        _ => CONTROL_MNEMONICS
            .iter()
            .position(|&m| m == name)
            .and_then(|code| char::from_u32(code as u32)),
    }
}

fn escape_char(c: char) -> String {
    match c {
        '[' => "\\[".to_string(),
        ']' => "\\]".to_string(),
        '\\' => "\\\\".to_string(),
        _ => c.to_string(),
    }
}

/// Convert one raw engine token into track text.
///
/// - `<0xHH>` decodes to the code point `HH`
/// - `<LF>`, `<SPACE>`, `<DEL>` and the other control mnemonics decode to
///   their control character
/// - any other token longer than one character is a multi-character symbol
///   and is re-bracketed as `[token]`
/// - `[`, `]` and `\` are escaped so they cannot be mistaken for brackets
/// - anything else is returned unchanged
///
/// # Examples
///
/// ```
/// use fsmcontainers::symbol::decode_token;
///
/// assert_eq!(decode_token("<0x41>"), "A");
/// assert_eq!(decode_token("<LF>"), "\n");
/// assert_eq!(decode_token("foo"), "[foo]");
/// assert_eq!(decode_token("["), "\\[");
/// assert_eq!(decode_token("x"), "x");
/// ```
pub fn decode_token(raw: &str) -> String {
    if let Some(inner) = raw.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        let decoded = match inner.strip_prefix("0x") {
            Some(hex) => u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32),
            None => mnemonic_char(inner),
        };
        if let Some(c) = decoded {
            return escape_char(c);
        }
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => escape_char(c),
        (Some(_), Some(_)) => format!("[{}]", raw),
        (None, _) => String::new(),
    }
}

/// Render a symbol sequence as track text.
pub fn render_track<'a, I>(symbols: I) -> String
where
    I: IntoIterator<Item = &'a Symbol>,
{
    symbols.into_iter().map(Symbol::to_track).collect()
}

/// Split a track into units.
///
/// The pad sentinel is an ordinary unit here; only [`NUL`] is rejected.
///
/// # Errors
///
/// Fails on unbalanced or nested brackets, unknown escapes, and bracketed
/// tokens that could not be read back unchanged.
pub fn split_units(track: &str) -> Result<Vec<&str>, ValidationError> {
    let mut units = Vec::with_capacity(track.len());
    let mut chars = track.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            NUL => return Err(ValidationError::ReservedSymbol(NUL)),
            '\\' => match chars.next() {
                Some((i, '[' | ']' | '\\')) => units.push(&track[start..i + 1]),
                _ => return Err(ValidationError::InvalidEscape(start)),
            },
            '[' => {
                let mut end = None;
                for (i, inner) in chars.by_ref() {
                    match inner {
                        ']' => {
                            end = Some(i);
                            break;
                        }
                        '[' => return Err(ValidationError::UnbalancedBrackets(i)),
                        '\\' | NUL => {
                            return Err(ValidationError::InvalidToken(
                                track[start..].to_string(),
                            ))
                        }
                        _ => {}
                    }
                }
                let end = end.ok_or(ValidationError::UnbalancedBrackets(start))?;
                let content = &track[start + 1..end];
                if !is_token_representable(content) {
                    return Err(ValidationError::InvalidToken(content.to_string()));
                }
                units.push(&track[start..end + 1]);
            }
            ']' => return Err(ValidationError::UnbalancedBrackets(start)),
            _ => units.push(&track[start..start + c.len_utf8()]),
        }
    }

    Ok(units)
}

/// A bracketed token survives a round trip through the engine only if the
/// decoder would re-bracket it: two or more characters, not an escape.
fn is_token_representable(content: &str) -> bool {
    content.chars().nth(1).is_some()
        && !(content.starts_with('<') && content.ends_with('>'))
        && !content.contains(PAD)
}

/// Map a single track unit to its symbol.
pub(crate) fn unit_symbol(unit: &str) -> Symbol {
    let mut chars = unit.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some(escaped)) => Symbol::Char(escaped),
        (Some('['), Some(_)) => Symbol::Token(Arc::from(&unit[1..unit.len() - 1])),
        (Some(c), _) => Symbol::Char(c),
        (None, _) => Symbol::Char(NUL),
    }
}

/// Compile a track into the symbol sequence the engine stores.
///
/// # Errors
///
/// Same as [`split_units`].
pub fn compile_track(track: &str) -> Result<Vec<Symbol>, ValidationError> {
    Ok(split_units(track)?.into_iter().map(unit_symbol).collect())
}
