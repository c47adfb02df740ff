//! Conversion between JSON text and MessagePack.
//!
//! Two independent pipelines share this crate:
//!
//! - **Encoding** ([`encode`], [`Encoder`]): a strict, chunked JSON
//!   [`Lexer`] reports structural events to a [`TreeBuilder`], which packs
//!   every object and array as soon as it closes and splices the bytes into
//!   its parent. Numbers are classified by their spelling: `5` is an
//!   unsigned integer, `-5` a signed integer and `5.0` a float64.
//! - **Decoding** ([`decode_to_text`]): the leading MessagePack value of a
//!   buffer is rendered as JSON-like text. See [`JsonText`] for the exact
//!   grammar, which does not escape string contents.
//!
//! [`field`] and [`index`] extract one child of an encoded map or array
//! without rendering the document, and [`parse_input`] is the entry point
//! for text that may also carry a backslash-prefixed binary literal.
//!
//! ```
//! use jsonmsgpack::{decode_to_text, encode, field};
//!
//! let bytes = encode(r#"{"name": "Ada", "tags": ["x", "y"]}"#).unwrap();
//! assert_eq!(decode_to_text(&bytes).unwrap(), r#"{"name":"Ada", "tags":["x", "y"]}"#);
//!
//! let tags = field(&bytes, "tags").unwrap().unwrap();
//! assert_eq!(decode_to_text(&tags).unwrap(), r#"["x", "y"]"#);
//! ```

#![allow(missing_docs)]

mod accessors;
mod binary_literal;
mod encoder;
mod error;
mod event;
mod lexer;
mod number;
mod options;
mod packer;
mod stringify;
mod tree_builder;

#[cfg(test)]
mod tests;

pub use accessors::{field, find_element, find_field, index};
pub use binary_literal::decode_binary_literal;
pub use encoder::{Encoder, encode, encode_with, parse_input};
pub use error::{Error, SyntaxError};
pub use event::{EventSink, StructuralEvent, TokenKind};
pub use lexer::Lexer;
pub use number::{Number, NumberClass, NumericConversionError, classify, parse_number};
pub use options::EncoderOptions;
pub use packer::{Packer, Scalar, repack};
pub use stringify::{JsonText, decode_to_text};
pub use tree_builder::TreeBuilder;
