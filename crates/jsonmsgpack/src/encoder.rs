//! JSON text → MessagePack bytes.

use tracing::debug;

use crate::{EncoderOptions, Error, Lexer, TreeBuilder, binary_literal};

/// Incremental JSON → MessagePack encoder.
///
/// Text may arrive in any number of chunks; the encoded document is
/// returned by [`Encoder::finish`]. Objects and arrays are packed as soon as
/// they close, so the encoder only holds the containers that are still open.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::{EncoderOptions, Encoder};
///
/// let mut encoder = Encoder::new(EncoderOptions::default());
/// encoder.feed(r#"{"a": [1, tr"#).unwrap();
/// encoder.feed("ue]}").unwrap();
/// assert_eq!(
///     encoder.finish().unwrap(),
///     [0x81, 0xa1, b'a', 0x92, 0x01, 0xc3]
/// );
/// ```
#[derive(Debug)]
pub struct Encoder {
    lexer: Lexer,
    builder: TreeBuilder,
    fed: usize,
}

impl Encoder {
    /// Creates an encoder configured by `options`.
    #[must_use]
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            lexer: Lexer::new(&options),
            builder: TreeBuilder::with_max_depth(options.max_depth),
            fed: 0,
        }
    }

    /// Feeds the next chunk of JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON and on numbers that do not fit their
    /// MessagePack class. Once a call has failed, every later call fails
    /// too, reporting the position where lexing stopped.
    pub fn feed(&mut self, text: &str) -> Result<(), Error> {
        self.fed += text.len();
        self.lexer.feed(text, &mut self.builder)
    }

    /// Ends the input and returns the encoded document.
    ///
    /// # Errors
    ///
    /// Fails if the text is not a complete JSON document, in addition to the
    /// errors of [`Encoder::feed`].
    pub fn finish(mut self) -> Result<Vec<u8>, Error> {
        self.lexer.finish(&mut self.builder)?;
        let bytes = self.builder.finish()?;
        debug!(text = self.fed, encoded = bytes.len(), "encoded JSON document");
        Ok(bytes)
    }
}

/// Encodes a complete JSON document with default options.
///
/// # Errors
///
/// See [`Encoder::feed`] and [`Encoder::finish`].
///
/// # Examples
///
/// ```
/// use jsonmsgpack::encode;
///
/// assert_eq!(encode("[]").unwrap(), [0x90]);
/// assert_eq!(encode("-5").unwrap(), [0xfb]);
/// assert_eq!(encode("5.0").unwrap()[0], 0xcb);
/// ```
pub fn encode(text: &str) -> Result<Vec<u8>, Error> {
    encode_with(text, &EncoderOptions::default())
}

/// Encodes a complete JSON document.
///
/// # Errors
///
/// See [`Encoder::feed`] and [`Encoder::finish`].
pub fn encode_with(text: &str, options: &EncoderOptions) -> Result<Vec<u8>, Error> {
    let mut encoder = Encoder::new(*options);
    encoder.feed(text)?;
    encoder.finish()
}

/// Converts text input into stored bytes.
///
/// Empty text has no value. Text starting with `\` is a binary literal
/// returned byte for byte (see [`decode_binary_literal`]); anything else is
/// encoded as JSON.
///
/// # Errors
///
/// Fails with the errors of [`encode`] or [`decode_binary_literal`].
///
/// # Examples
///
/// ```
/// use jsonmsgpack::parse_input;
///
/// assert_eq!(parse_input("").unwrap(), None);
/// assert_eq!(parse_input(r"\x9101").unwrap(), Some(vec![0x91, 0x01]));
/// assert_eq!(parse_input("[1]").unwrap(), Some(vec![0x91, 0x01]));
/// ```
///
/// [`decode_binary_literal`]: crate::decode_binary_literal
pub fn parse_input(text: &str) -> Result<Option<Vec<u8>>, Error> {
    if text.is_empty() {
        return Ok(None);
    }
    if text.starts_with('\\') {
        debug!(len = text.len(), "decoding binary literal");
        return binary_literal::decode_binary_literal(text).map(Some);
    }
    encode(text).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxError;

    #[test]
    fn encoder_is_poisoned_after_a_failure() {
        let mut encoder = Encoder::new(EncoderOptions::default());
        assert!(encoder.feed("[1,\n 2,]").is_err());
        assert!(matches!(
            encoder.feed("2"),
            Err(Error::Syntax {
                source: SyntaxError::Poisoned,
                line: 2,
                column,
            }) if column > 0
        ));
        assert!(matches!(
            encoder.finish(),
            Err(Error::Syntax {
                source: SyntaxError::Poisoned,
                line: 2,
                ..
            })
        ));
    }

    #[test]
    fn numeric_errors_poison_the_encoder() {
        let mut encoder = Encoder::new(EncoderOptions::default());
        assert!(matches!(
            encoder.feed("[99999999999999999999]"),
            Err(Error::NumericConversion(_))
        ));
        assert!(encoder.feed("").is_err());
    }

    #[test]
    fn incomplete_document_fails_on_finish() {
        let mut encoder = Encoder::new(EncoderOptions::default());
        encoder.feed(r#"{"a": [1"#).unwrap();
        assert!(matches!(
            encoder.finish(),
            Err(Error::Syntax {
                source: SyntaxError::UnexpectedEndOfInput,
                ..
            })
        ));
    }

    #[test]
    fn top_level_number_is_resolved_on_finish() {
        let mut encoder = Encoder::new(EncoderOptions::default());
        encoder.feed("-1").unwrap();
        encoder.feed("29").unwrap();
        assert_eq!(encoder.finish().unwrap(), [0xd1, 0xff, 0x7f]);
    }

    #[test]
    fn parse_input_dispatch() {
        assert_eq!(parse_input("").unwrap(), None);
        assert_eq!(parse_input(r"\\").unwrap(), Some(vec![b'\\']));
        assert!(matches!(
            parse_input(r"\x1"),
            Err(Error::InvalidBinaryLiteral(_))
        ));
        assert_eq!(parse_input(" null ").unwrap(), Some(vec![0xc0]));
        assert!(matches!(parse_input("   "), Err(Error::Syntax { .. })));
    }
}
