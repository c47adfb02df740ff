//! Rendering of decoded MessagePack values as JSON-like text.
//!
//! The output follows a fixed grammar rather than strict JSON:
//!
//! | value          | text                                            |
//! |----------------|-------------------------------------------------|
//! | nil            | `null`                                          |
//! | boolean        | `true` / `false`                                |
//! | integer        | decimal                                         |
//! | float32/64     | fixed notation, six fraction digits (`1.500000`) |
//! | str / bin      | the bytes between `"` quotes, **not escaped**   |
//! | array          | `[a, b]`                                        |
//! | map            | `{k:v, k:v}`                                    |
//! | extension      | `#<UNKNOWN {type} {payload length}>`            |
//!
//! String contents are copied without escaping, so a string holding `"`
//! produces text that a JSON parser rejects. Bytes that are not UTF-8 are
//! replaced with U+FFFD.

use core::fmt;

use bstr::ByteSlice;
use rmpv::ValueRef;
use tracing::debug;

use crate::{EncoderOptions, Error};

/// [`fmt::Display`] adapter rendering a [`ValueRef`] in the text grammar
/// described in the [module documentation](self).
///
/// # Examples
///
/// ```
/// use jsonmsgpack::JsonText;
/// use rmpv::ValueRef;
///
/// let value = ValueRef::Array(vec![ValueRef::Integer(1.into()), ValueRef::Nil]);
/// assert_eq!(JsonText(&value).to_string(), "[1, null]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonText<'a>(pub &'a ValueRef<'a>);

impl fmt::Display for JsonText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &ValueRef<'_>) -> fmt::Result {
    match value {
        ValueRef::Nil => f.write_str("null"),
        ValueRef::Boolean(true) => f.write_str("true"),
        ValueRef::Boolean(false) => f.write_str("false"),
        ValueRef::Integer(n) => write!(f, "{n}"),
        ValueRef::F32(x) => write_float(f, f64::from(*x)),
        ValueRef::F64(x) => write_float(f, *x),
        ValueRef::String(s) => write_quoted(f, s.as_bytes()),
        ValueRef::Binary(bytes) => write_quoted(f, bytes),
        ValueRef::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str("]")
        }
        ValueRef::Map(entries) => {
            f.write_str("{")?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, key)?;
                f.write_str(":")?;
                write_value(f, value)?;
            }
            f.write_str("}")
        }
        ValueRef::Ext(ty, data) => write!(f, "#<UNKNOWN {ty} {}>", data.len()),
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str(if x.is_sign_negative() { "-nan" } else { "nan" })
    } else if x.is_infinite() {
        f.write_str(if x.is_sign_negative() { "-inf" } else { "inf" })
    } else {
        write!(f, "{x:.6}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    f.write_str(&bytes.to_str_lossy())?;
    f.write_str("\"")
}

/// Depth budget handed to rmpv. Each container level costs two units (the
/// container value and its entries) and the innermost scalar one more.
pub(crate) const DECODE_MAX_DEPTH: usize = 2 * EncoderOptions::DEFAULT_MAX_DEPTH + 1;

/// Reads the first MessagePack value of `bytes`; trailing bytes are ignored.
pub(crate) fn leading_value(bytes: &[u8]) -> Result<ValueRef<'_>, Error> {
    rmpv::decode::read_value_ref_with_max_depth(&mut &bytes[..], DECODE_MAX_DEPTH).map_err(|err| {
        debug!(len = bytes.len(), error = %err, "no decodable leading value");
        Error::EmptyOrMalformedInput
    })
}

/// Decodes the leading MessagePack value of `bytes` and renders it as text.
///
/// # Errors
///
/// Returns [`Error::EmptyOrMalformedInput`] when `bytes` does not start with
/// a complete MessagePack value.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::{decode_to_text, encode};
///
/// let bytes = encode(r#"{"a": [1, -2, 0.5], "b": null}"#).unwrap();
/// assert_eq!(decode_to_text(&bytes).unwrap(), r#"{"a":[1, -2, 0.500000], "b":null}"#);
/// ```
pub fn decode_to_text(bytes: &[u8]) -> Result<String, Error> {
    let value = leading_value(bytes)?;
    let text = JsonText(&value).to_string();
    debug!(bytes = bytes.len(), text = text.len(), "rendered MessagePack as text");
    Ok(text)
}
