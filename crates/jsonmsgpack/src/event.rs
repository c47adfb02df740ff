//! Structural events exchanged between a JSON lexer and the tree builder.
//!
//! Any lexer can drive a [`TreeBuilder`](crate::TreeBuilder) as long as it
//! reports JSON syntax through [`EventSink::event`]: an `ElementStart` before
//! every array element, a `FieldStart` before every member value, and one
//! `Scalar` (or a nested start/end pair) per value.
//!
//! # Examples
//!
//! ```
//! use jsonmsgpack::{EncoderOptions, Lexer, StructuralEvent, TokenKind};
//!
//! let mut events: Vec<StructuralEvent> = Vec::new();
//! let mut lexer = Lexer::new(&EncoderOptions::default());
//! lexer.feed(r#"["a"]"#, &mut events).unwrap();
//! lexer.finish(&mut events).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         StructuralEvent::ArrayStart,
//!         StructuralEvent::ElementStart,
//!         StructuralEvent::Scalar {
//!             token: "a".to_string(),
//!             kind: TokenKind::String,
//!         },
//!         StructuralEvent::ArrayEnd,
//!     ]
//! );
//! ```

use crate::Error;

/// Lexical class of a scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub enum TokenKind {
    String,
    Number,
    True,
    False,
    Null,
}

/// One callback from the lexer describing JSON syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize),
    serde(tag = "event")
)]
pub enum StructuralEvent {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    /// A member name; the member's value follows.
    FieldStart { name: String },
    ElementStart,
    /// A leaf value. `token` holds decoded string content for strings and the
    /// exact source text for numbers.
    Scalar { token: String, kind: TokenKind },
}

/// Receiver of structural events.
pub trait EventSink {
    /// Consumes one event.
    ///
    /// # Errors
    ///
    /// Implementations reject events that violate their structural contract.
    fn event(&mut self, event: StructuralEvent) -> Result<(), Error>;
}

impl EventSink for Vec<StructuralEvent> {
    fn event(&mut self, event: StructuralEvent) -> Result<(), Error> {
        self.push(event);
        Ok(())
    }
}
