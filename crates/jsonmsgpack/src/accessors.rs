//! Child lookup on encoded documents.
//!
//! [`field`] and [`index`] decode the leading value of a buffer, locate one
//! direct child and re-encode only that child. A lookup that finds nothing,
//! or is asked of the wrong container kind, is not an error.

use rmpv::ValueRef;
use tracing::debug;

use crate::{Error, packer::repack, stringify::leading_value};

fn kind_name(value: &ValueRef<'_>) -> &'static str {
    match value {
        ValueRef::Nil => "nil",
        ValueRef::Boolean(_) => "boolean",
        ValueRef::Integer(_) => "integer",
        ValueRef::F32(_) | ValueRef::F64(_) => "float",
        ValueRef::String(_) => "string",
        ValueRef::Binary(_) => "binary",
        ValueRef::Array(_) => "array",
        ValueRef::Map(_) => "map",
        ValueRef::Ext(..) => "extension",
    }
}

/// Finds the value of the first map entry whose string key equals `name`.
///
/// Entries with non-string keys are skipped.
///
/// # Errors
///
/// [`Error::TypeMismatch`] if `value` is not a map.
pub fn find_field<'a, 'v>(
    value: &'a ValueRef<'v>,
    name: &str,
) -> Result<Option<&'a ValueRef<'v>>, Error> {
    let ValueRef::Map(entries) = value else {
        return Err(Error::TypeMismatch {
            expected: "map",
            found: kind_name(value),
        });
    };
    Ok(entries.iter().find_map(|(key, value)| match key {
        ValueRef::String(key) if key.as_bytes() == name.as_bytes() => Some(value),
        _ => None,
    }))
}

/// Finds the array element at `i`. Negative and out-of-range positions find
/// nothing.
///
/// # Errors
///
/// [`Error::TypeMismatch`] if `value` is not an array.
pub fn find_element<'a, 'v>(
    value: &'a ValueRef<'v>,
    i: i64,
) -> Result<Option<&'a ValueRef<'v>>, Error> {
    let ValueRef::Array(items) = value else {
        return Err(Error::TypeMismatch {
            expected: "array",
            found: kind_name(value),
        });
    };
    Ok(usize::try_from(i).ok().and_then(|i| items.get(i)))
}

fn recover<T>(result: Result<Option<T>, Error>) -> Result<Option<T>, Error> {
    match result {
        Err(err) if err.is_lookup_miss() => {
            debug!(%err, "lookup miss");
            Ok(None)
        }
        other => other,
    }
}

/// Returns the encoding of the member `name` of the map at the start of
/// `bytes`, or `None` if there is no such member or the value is not a map.
///
/// When a name repeats, the first entry wins.
///
/// # Errors
///
/// Fails with [`Error::EmptyOrMalformedInput`] if `bytes` does not start
/// with a complete MessagePack value.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::{encode, field};
///
/// let doc = encode(r#"{"a": 1, "a": 2}"#).unwrap();
/// assert_eq!(field(&doc, "a").unwrap(), Some(encode("1").unwrap()));
/// assert_eq!(field(&doc, "b").unwrap(), None);
/// ```
pub fn field(bytes: &[u8], name: &str) -> Result<Option<Vec<u8>>, Error> {
    let value = leading_value(bytes)?;
    let found = recover(find_field(&value, name))?;
    debug!(field = name, found = found.is_some(), "field lookup");
    found.map(repack).transpose()
}

/// Returns the encoding of element `i` of the array at the start of `bytes`,
/// or `None` if `i` is out of range or the value is not an array.
///
/// # Errors
///
/// Fails with [`Error::EmptyOrMalformedInput`] if `bytes` does not start
/// with a complete MessagePack value.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::{encode, index};
///
/// let doc = encode("[10, 20, 30]").unwrap();
/// assert_eq!(index(&doc, 1).unwrap(), Some(encode("20").unwrap()));
/// assert_eq!(index(&doc, 3).unwrap(), None);
/// assert_eq!(index(&doc, -1).unwrap(), None);
/// ```
pub fn index(bytes: &[u8], i: i64) -> Result<Option<Vec<u8>>, Error> {
    let value = leading_value(bytes)?;
    let found = recover(find_element(&value, i))?;
    debug!(index = i, found = found.is_some(), "element lookup");
    found.map(repack).transpose()
}
