use thiserror::Error;

use crate::number::NumericConversionError;

/// Every failure the codec can report.
///
/// Encoding faults (`Syntax`, `StructuralMismatch`, `NumericConversion`,
/// `ContainerTooLarge`) abort the call. `TypeMismatch` only surfaces from the
/// fallible lookup helpers; [`field`](crate::field) and
/// [`index`](crate::index) recover it into `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("syntax error: {source} at {line}:{column}")]
    Syntax {
        source: SyntaxError,
        line: usize,
        column: usize,
    },
    #[error("structural mismatch: {0}")]
    StructuralMismatch(&'static str),
    #[error(transparent)]
    NumericConversion(#[from] NumericConversionError),
    #[error("input does not start with a well-formed MessagePack value")]
    EmptyOrMalformedInput,
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid binary literal: {0}")]
    InvalidBinaryLiteral(&'static str),
    #[error("{kind} with {len} entries does not fit a MessagePack header")]
    ContainerTooLarge { kind: &'static str, len: usize },
    #[error("MessagePack write failed: {0}")]
    Write(#[from] rmp::encode::ValueWriteError),
    #[error("MessagePack write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Lexical errors raised while scanning JSON text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid unicode escape sequence at character '{0}'")]
    InvalidUnicodeEscapeChar(char),
    #[error("unpaired UTF-16 surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("\\u0000 cannot be represented in a string")]
    NulEscape,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("no further input is accepted after an error")]
    Poisoned,
}

impl Error {
    /// Returns `true` for the lookup outcomes that `field`/`index` turn into
    /// `None`.
    #[must_use]
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}
