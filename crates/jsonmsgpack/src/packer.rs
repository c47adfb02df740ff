//! Serialization of scalars, pre-encoded spans and decoded values into
//! MessagePack bytes.

use std::io::Write as _;

use rmp::encode;
use rmpv::ValueRef;

use crate::{
    Error, TokenKind,
    number::{Number, parse_number},
};

/// A leaf value waiting in a container slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A lexer token and its kind.
    Token { text: String, kind: TokenKind },
    /// The packed bytes of a closed object or array.
    PreEncoded(Vec<u8>),
}

/// Append-only MessagePack writer.
#[derive(Debug, Default)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    /// Creates a packer with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Packs `scalar`. Pre-encoded spans are spliced in byte for byte.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NumericConversion`] for number tokens that do not
    /// fit their class.
    pub fn pack_scalar(&mut self, scalar: &Scalar) -> Result<(), Error> {
        match scalar {
            Scalar::Token { text, kind } => self.pack_token(text, *kind),
            Scalar::PreEncoded(bytes) => {
                self.buf.extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    /// Packs one lexer token according to its kind.
    ///
    /// # Errors
    ///
    /// See [`Packer::pack_scalar`].
    pub fn pack_token(&mut self, text: &str, kind: TokenKind) -> Result<(), Error> {
        match kind {
            TokenKind::String => self.pack_str(text),
            TokenKind::Number => self.pack_number(text),
            TokenKind::True => Ok(encode::write_bool(&mut self.buf, true)?),
            TokenKind::False => Ok(encode::write_bool(&mut self.buf, false)?),
            TokenKind::Null => Ok(encode::write_nil(&mut self.buf)?),
        }
    }

    /// # Errors
    ///
    /// Fails if `text` is longer than a MessagePack string header allows.
    pub fn pack_str(&mut self, text: &str) -> Result<(), Error> {
        encode::write_str(&mut self.buf, text)?;
        Ok(())
    }

    /// Packs a number literal as the smallest unsigned or signed integer
    /// encoding, or as float64.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NumericConversion`] when the literal does not fit
    /// its class.
    pub fn pack_number(&mut self, token: &str) -> Result<(), Error> {
        self.write_number(parse_number(token)?)
    }

    fn write_number(&mut self, number: Number) -> Result<(), Error> {
        match number {
            Number::Unsigned(value) => {
                encode::write_uint(&mut self.buf, value)?;
            }
            Number::Signed(value) => {
                encode::write_sint(&mut self.buf, value)?;
            }
            Number::Float(value) => encode::write_f64(&mut self.buf, value)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails with [`Error::ContainerTooLarge`] above `u32::MAX` entries.
    pub fn pack_map_header(&mut self, len: usize) -> Result<(), Error> {
        let len = header_len("map", len)?;
        encode::write_map_len(&mut self.buf, len)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails with [`Error::ContainerTooLarge`] above `u32::MAX` entries.
    pub fn pack_array_header(&mut self, len: usize) -> Result<(), Error> {
        let len = header_len("array", len)?;
        encode::write_array_len(&mut self.buf, len)?;
        Ok(())
    }

    /// Re-encodes a decoded value.
    ///
    /// String payloads are written back as-is, even when they are not valid
    /// UTF-8.
    ///
    /// # Errors
    ///
    /// Fails if a length does not fit its MessagePack header.
    pub fn pack_value_ref(&mut self, value: &ValueRef<'_>) -> Result<(), Error> {
        match value {
            ValueRef::Nil => encode::write_nil(&mut self.buf)?,
            ValueRef::Boolean(b) => encode::write_bool(&mut self.buf, *b)?,
            ValueRef::Integer(n) => self.write_number(decoded_integer(n.as_u64(), n.as_i64())?)?,
            ValueRef::F32(f) => encode::write_f32(&mut self.buf, *f)?,
            ValueRef::F64(f) => encode::write_f64(&mut self.buf, *f)?,
            ValueRef::String(s) => {
                let bytes = s.as_bytes();
                encode::write_str_len(&mut self.buf, header_len("string", bytes.len())?)?;
                self.buf.write_all(bytes)?;
            }
            ValueRef::Binary(bytes) => encode::write_bin(&mut self.buf, bytes)?,
            ValueRef::Array(items) => {
                self.pack_array_header(items.len())?;
                for item in items {
                    self.pack_value_ref(item)?;
                }
            }
            ValueRef::Map(entries) => {
                self.pack_map_header(entries.len())?;
                for (key, value) in entries {
                    self.pack_value_ref(key)?;
                    self.pack_value_ref(value)?;
                }
            }
            ValueRef::Ext(ty, data) => {
                encode::write_ext_meta(&mut self.buf, header_len("extension", data.len())?, *ty)?;
                self.buf.write_all(data)?;
            }
        }
        Ok(())
    }
}

fn header_len(kind: &'static str, len: usize) -> Result<u32, Error> {
    u32::try_from(len).map_err(|_| Error::ContainerTooLarge { kind, len })
}

/// Packs a single decoded value into a fresh buffer.
///
/// # Errors
///
/// See [`Packer::pack_value_ref`].
pub fn repack(value: &ValueRef<'_>) -> Result<Vec<u8>, Error> {
    let mut packer = Packer::new();
    packer.pack_value_ref(value)?;
    Ok(packer.into_inner())
}

/// Picks the unsigned reading of a decoded integer when it has one.
fn decoded_integer(unsigned: Option<u64>, signed: Option<i64>) -> Result<Number, Error> {
    match (unsigned, signed) {
        (Some(value), _) => Ok(Number::Unsigned(value)),
        (None, Some(value)) => Ok(Number::Signed(value)),
        (None, None) => Err(Error::EmptyOrMalformedInput),
    }
}
