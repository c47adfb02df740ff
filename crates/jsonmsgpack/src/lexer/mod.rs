//! Strict, chunked JSON lexer.
//!
//! The lexer accepts input through any number of [`Lexer::feed`] calls
//! followed by [`Lexer::finish`], and reports JSON syntax to an
//! [`EventSink`] as soon as each token is complete. A token split across two
//! chunks (a string, a number or a literal) is kept in the lexer's scratch
//! buffer until its end is seen.
//!
//! The grammar is RFC 8259: a single value per document, no trailing commas,
//! no comments. Number tokens are forwarded as their exact source text so the
//! consumer decides how to classify them.
//!
//! # Examples
//!
//! ```rust
//! use jsonmsgpack::{EncoderOptions, Lexer, StructuralEvent};
//!
//! let mut events: Vec<StructuralEvent> = Vec::new();
//! let mut lexer = Lexer::new(&EncoderOptions::default());
//! lexer.feed(r#"{"n": 1"#, &mut events).unwrap();
//! lexer.feed("2}", &mut events).unwrap();
//! lexer.finish(&mut events).unwrap();
//! assert_eq!(events.len(), 4);
//! ```
#![allow(clippy::enum_glob_use)]

mod buffer;
mod escape_buffer;
mod literal_buffer;

use buffer::Buffer;
use escape_buffer::UnicodeEscapeBuffer;
use literal_buffer::ExpectedLiteralBuffer;

use crate::{EncoderOptions, Error, EventSink, StructuralEvent, SyntaxError, TokenKind};

// ------------------------------------------------------------------------------------------------
// Tokens & states
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// End of the available input. Partial when more input may follow.
    Eof,
    PropertyName(String),
    String(String),
    Boolean(bool),
    Null,
    Number(String),
    /// One of `{` `}` `[` `]` `:` `,`
    Punctuator(u8),
}

impl Token {
    fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeekedChar {
    /// The current chunk is exhausted.
    Empty,
    Char(char),
    /// `finish` was called and nothing is left.
    EndOfInput,
}

use PeekedChar::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Value,
    ValueLiteral,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
    String,
    StringEscape,
    StringEscapeUnicode,
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Error,
}

impl From<ParseState> for LexState {
    fn from(state: ParseState) -> Self {
        match state {
            ParseState::Start => LexState::Start,
            ParseState::BeforeFirstPropertyName => LexState::BeforeFirstPropertyName,
            ParseState::BeforePropertyName => LexState::BeforePropertyName,
            ParseState::AfterPropertyName => LexState::AfterPropertyName,
            ParseState::BeforePropertyValue => LexState::BeforePropertyValue,
            ParseState::BeforeFirstArrayValue => LexState::BeforeFirstArrayValue,
            ParseState::BeforeArrayValue => LexState::BeforeArrayValue,
            ParseState::AfterPropertyValue => LexState::AfterPropertyValue,
            ParseState::AfterArrayValue => LexState::AfterArrayValue,
            ParseState::End => LexState::End,
            ParseState::Error => LexState::Error,
        }
    }
}

/// One open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Array,
    Object,
}

// ------------------------------------------------------------------------------------------------
// Lexer
// ------------------------------------------------------------------------------------------------

/// The JSON lexer.
#[derive(Debug)]
pub struct Lexer {
    source: Buffer,
    end_of_input: bool,

    line: usize,
    column: usize,

    parse_state: ParseState,
    lex_state: LexState,

    /// Scratch space for the token in flight.
    buffer: String,
    unicode_escape_buffer: UnicodeEscapeBuffer,
    high_surrogate: Option<u16>,
    expected_literal: ExpectedLiteralBuffer,
    partial_lex: bool,

    frames: Vec<Frame>,

    allow_unicode_whitespace: bool,
    max_depth: usize,
}

impl Lexer {
    /// Creates a lexer configured by `options`.
    #[must_use]
    pub fn new(options: &EncoderOptions) -> Self {
        Self {
            source: Buffer::new(),
            end_of_input: false,

            line: 1,
            column: 1,

            parse_state: ParseState::Start,
            lex_state: LexState::Default,

            buffer: String::new(),
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
            high_surrogate: None,
            expected_literal: ExpectedLiteralBuffer::none(),
            partial_lex: false,

            frames: Vec::with_capacity(16),

            allow_unicode_whitespace: options.allow_unicode_whitespace,
            max_depth: options.max_depth,
        }
    }

    /// Lexes `text`, reporting every token completed by it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed JSON and forwards any error
    /// raised by `sink`. After an error the lexer rejects further input.
    pub fn feed<S: EventSink + ?Sized>(&mut self, text: &str, sink: &mut S) -> Result<(), Error> {
        self.source.push(text);
        self.run(sink)
    }

    /// Marks the end of input and reports the remaining tokens.
    ///
    /// # Errors
    ///
    /// Fails if the document is incomplete, in addition to the errors of
    /// [`Lexer::feed`].
    pub fn finish<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), Error> {
        self.end_of_input = true;
        self.run(sink)
    }

    fn run<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), Error> {
        if self.parse_state == ParseState::Error {
            return Err(self.syntax_error(SyntaxError::Poisoned));
        }

        let result = self.run_until_eof(sink);
        if result.is_err() {
            self.parse_state = ParseState::Error;
            self.lex_state = LexState::Error;
        }
        result
    }

    fn run_until_eof<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), Error> {
        loop {
            let token = self.lex().map_err(|err| self.syntax_error(err))?;
            let is_eof = token.is_eof();
            self.dispatch_parse_state(token, sink)?;
            if is_eof {
                return Ok(());
            }
        }
    }

    fn lex(&mut self) -> Result<Token, SyntaxError> {
        if !self.partial_lex {
            self.lex_state = LexState::Default;
        }

        loop {
            let next_char = self.peek_char();
            if let Some(token) = self.lex_state_step(self.lex_state, next_char)? {
                return Ok(token);
            }
        }
    }

    fn peek_char(&self) -> PeekedChar {
        if let Some(c) = self.source.peek() {
            return Char(c);
        }
        if self.end_of_input {
            return EndOfInput;
        }
        Empty
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.source.next() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn new_token(&mut self, token: Token, partial: bool) -> Token {
        self.partial_lex = partial;
        token
    }

    fn produce_string(&mut self) -> Result<Token, SyntaxError> {
        if let Some(high) = self.high_surrogate.take() {
            return Err(SyntaxError::UnpairedSurrogate(high));
        }
        let value = core::mem::take(&mut self.buffer);
        let token = match self.parse_state {
            ParseState::BeforeFirstPropertyName | ParseState::BeforePropertyName => {
                Token::PropertyName(value)
            }
            _ => Token::String(value),
        };
        Ok(self.new_token(token, false))
    }

    fn is_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r') || (self.allow_unicode_whitespace && c.is_whitespace())
    }

    /// Consumes `c` into the scratch buffer and moves to `next`.
    fn accept(&mut self, c: char, next: LexState) {
        self.advance_char();
        self.buffer.push(c);
        self.lex_state = next;
    }

    fn copy_digits(&mut self) {
        let copied = self
            .source
            .copy_while(&mut self.buffer, |d| d.is_ascii_digit());
        self.column += copied;
    }

    fn finish_number(&mut self) -> Token {
        let text = core::mem::take(&mut self.buffer);
        self.new_token(Token::Number(text), false)
    }

    fn push_code_unit(&mut self, unit: u16) -> Result<(), SyntaxError> {
        let is_high = (0xD800..=0xDBFF).contains(&unit);
        let is_low = (0xDC00..=0xDFFF).contains(&unit);
        match self.high_surrogate.take() {
            Some(high) if is_low => {
                let c = char::decode_utf16([high, unit])
                    .next()
                    .and_then(Result::ok)
                    .ok_or(SyntaxError::UnpairedSurrogate(high))?;
                self.buffer.push(c);
                Ok(())
            }
            Some(high) => Err(SyntaxError::UnpairedSurrogate(high)),
            None if is_high => {
                self.high_surrogate = Some(unit);
                Ok(())
            }
            None if is_low => Err(SyntaxError::UnpairedSurrogate(unit)),
            None if unit == 0 => Err(SyntaxError::NulEscape),
            None => {
                let c = char::from_u32(u32::from(unit))
                    .ok_or(SyntaxError::UnpairedSurrogate(unit))?;
                self.buffer.push(c);
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn lex_state_step(
        &mut self,
        lex_state: LexState,
        next_char: PeekedChar,
    ) -> Result<Option<Token>, SyntaxError> {
        use LexState::*;
        match lex_state {
            LexState::Error => Err(SyntaxError::Poisoned),
            Default => match next_char {
                Char(c) if self.is_whitespace(c) => {
                    self.advance_char();
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => Ok(Some(self.new_token(Token::Eof, false))),
                Char(_) => self.lex_state_step(self.parse_state.into(), next_char),
            },

            // -------------------------- VALUE entry --------------------------
            Value => match next_char {
                Char(c @ ('{' | '[')) => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                Char(c @ ('n' | 't' | 'f')) => {
                    self.buffer.clear();
                    self.expected_literal = ExpectedLiteralBuffer::new(c);
                    self.accept(c, ValueLiteral);
                    Ok(None)
                }
                Char(c @ '-') => {
                    self.buffer.clear();
                    self.accept(c, Sign);
                    Ok(None)
                }
                Char(c @ '0') => {
                    self.buffer.clear();
                    self.accept(c, Zero);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.buffer.clear();
                    self.accept(c, DecimalInteger);
                    Ok(None)
                }
                Char('"') => {
                    self.advance_char();
                    self.buffer.clear();
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            // -------------------------- LITERALS -----------------------------
            ValueLiteral => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) => match self.expected_literal.step(c) {
                    literal_buffer::Step::NeedMore => {
                        self.accept(c, ValueLiteral);
                        Ok(None)
                    }
                    literal_buffer::Step::Done(token) => {
                        self.advance_char();
                        self.buffer.clear();
                        Ok(Some(self.new_token(token, false)))
                    }
                    literal_buffer::Step::Reject => Err(invalid_char(Char(c))),
                },
                EndOfInput => Err(SyntaxError::UnexpectedEndOfInput),
            },

            // -------------------------- NUMBERS -----------------------------
            Sign => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '0') => {
                    self.accept(c, Zero);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalInteger);
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            Zero => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '.') => {
                    self.accept(c, DecimalPoint);
                    Ok(None)
                }
                Char(c @ ('e' | 'E')) => {
                    self.accept(c, DecimalExponent);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => Err(invalid_char(Char(c))),
                _ => Ok(Some(self.finish_number())),
            },

            DecimalInteger => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '.') => {
                    self.accept(c, DecimalPoint);
                    Ok(None)
                }
                Char(c @ ('e' | 'E')) => {
                    self.accept(c, DecimalExponent);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalInteger);
                    self.copy_digits();
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number())),
            },

            DecimalPoint => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalFraction);
                    self.copy_digits();
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            DecimalFraction => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ ('e' | 'E')) => {
                    self.accept(c, DecimalExponent);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalFraction);
                    self.copy_digits();
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number())),
            },

            DecimalExponent => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ ('+' | '-')) => {
                    self.accept(c, DecimalExponentSign);
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalExponentInteger);
                    self.copy_digits();
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            DecimalExponentSign => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalExponentInteger);
                    self.copy_digits();
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            DecimalExponentInteger => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.accept(c, DecimalExponentInteger);
                    self.copy_digits();
                    Ok(None)
                }
                _ => Ok(Some(self.finish_number())),
            },

            // -------------------------- STRING -----------------------------
            LexState::String => match next_char {
                Char(c) if self.high_surrogate.is_some() && c != '\\' => {
                    Err(SyntaxError::UnpairedSurrogate(self.high_surrogate.unwrap_or_default()))
                }
                Char('\\') => {
                    self.advance_char();
                    self.lex_state = StringEscape;
                    Ok(None)
                }
                Char('"') => {
                    self.advance_char();
                    self.produce_string().map(Some)
                }
                Char(c @ '\0'..='\x1F') => Err(invalid_char(Char(c))),
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(_) => {
                    // Runs of plain characters cannot contain a newline, so only
                    // the column moves.
                    let copied = self.source.copy_while(&mut self.buffer, |c| {
                        c != '\\' && c != '"' && c >= '\u{20}'
                    });
                    self.column += copied;
                    Ok(None)
                }
                EndOfInput => Err(SyntaxError::UnexpectedEndOfInput),
            },

            StringEscape => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if self.high_surrogate.is_some() && c != 'u' => {
                    Err(SyntaxError::UnpairedSurrogate(self.high_surrogate.unwrap_or_default()))
                }
                Char(c) => {
                    let unescaped = match c {
                        '"' | '\\' | '/' => c,
                        'b' => '\u{0008}',
                        'f' => '\u{000C}',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'u' => {
                            self.advance_char();
                            self.unicode_escape_buffer.reset();
                            self.lex_state = StringEscapeUnicode;
                            return Ok(None);
                        }
                        _ => return Err(invalid_char(Char(c))),
                    };
                    self.accept(unescaped, LexState::String);
                    Ok(None)
                }
                EndOfInput => Err(SyntaxError::UnexpectedEndOfInput),
            },

            StringEscapeUnicode => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) => {
                    self.advance_char();
                    if let Some(unit) = self.unicode_escape_buffer.feed(c)? {
                        self.push_code_unit(unit)?;
                        self.lex_state = LexState::String;
                    }
                    Ok(None)
                }
                EndOfInput => Err(SyntaxError::UnexpectedEndOfInput),
            },

            // -------------------------- STRUCTURE ---------------------------
            Start => match next_char {
                Char(c @ ('{' | '[')) => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                _ => {
                    self.lex_state = Value;
                    Ok(None)
                }
            },

            BeforeFirstPropertyName | BeforePropertyName => match next_char {
                Char('}') if lex_state == BeforeFirstPropertyName => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(b'}'), false)))
                }
                Char('"') => {
                    self.advance_char();
                    self.buffer.clear();
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                c => Err(invalid_char(c)),
            },

            AfterPropertyName => match next_char {
                Char(':') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(b':'), false)))
                }
                c => Err(invalid_char(c)),
            },

            BeforePropertyValue | BeforeArrayValue => {
                self.lex_state = Value;
                Ok(None)
            }

            BeforeFirstArrayValue => match next_char {
                Char(']') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(b']'), false)))
                }
                _ => {
                    self.lex_state = Value;
                    Ok(None)
                }
            },

            AfterPropertyValue => match next_char {
                Char(c @ (',' | '}')) => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                c => Err(invalid_char(c)),
            },

            AfterArrayValue => match next_char {
                Char(c @ (',' | ']')) => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                c => Err(invalid_char(c)),
            },

            End => Err(invalid_char(next_char)),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Parse state dispatcher
    // ------------------------------------------------------------------------------------------------

    fn dispatch_parse_state<S: EventSink + ?Sized>(
        &mut self,
        token: Token,
        sink: &mut S,
    ) -> Result<(), Error> {
        use ParseState::*;

        if token.is_eof() {
            return if self.end_of_input && !matches!(self.parse_state, End | ParseState::Error) {
                Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput))
            } else {
                Ok(())
            };
        }

        match self.parse_state {
            Start | BeforePropertyValue | BeforeArrayValue => self.push(token, sink)?,

            BeforeFirstPropertyName | BeforePropertyName => match token {
                Token::PropertyName(name) => {
                    sink.event(StructuralEvent::FieldStart { name })?;
                    self.parse_state = AfterPropertyName;
                }
                Token::Punctuator(b'}') => self.pop(sink)?,
                _ => (),
            },

            AfterPropertyName => {
                if token == Token::Punctuator(b':') {
                    self.parse_state = BeforePropertyValue;
                }
            }

            BeforeFirstArrayValue => match token {
                Token::Punctuator(b']') => self.pop(sink)?,
                _ => self.push(token, sink)?,
            },

            AfterPropertyValue => match token {
                Token::Punctuator(b',') => self.parse_state = BeforePropertyName,
                Token::Punctuator(b'}') => self.pop(sink)?,
                _ => (),
            },

            AfterArrayValue => match token {
                Token::Punctuator(b',') => self.parse_state = BeforeArrayValue,
                Token::Punctuator(b']') => self.pop(sink)?,
                _ => (),
            },

            End | ParseState::Error => (),
        }

        Ok(())
    }

    fn pop<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), Error> {
        match self.frames.pop() {
            Some(Frame::Array) => sink.event(StructuralEvent::ArrayEnd)?,
            Some(Frame::Object) => sink.event(StructuralEvent::ObjectEnd)?,
            None => (),
        }
        self.parse_state = self.state_after_value();
        Ok(())
    }

    fn push<S: EventSink + ?Sized>(&mut self, token: Token, sink: &mut S) -> Result<(), Error> {
        if self.frames.last() == Some(&Frame::Array) {
            sink.event(StructuralEvent::ElementStart)?;
        }

        let event = match token {
            Token::Punctuator(b'{') => return self.open(Frame::Object, sink),
            Token::Punctuator(b'[') => return self.open(Frame::Array, sink),
            Token::Null => scalar("null", TokenKind::Null),
            Token::Boolean(true) => scalar("true", TokenKind::True),
            Token::Boolean(false) => scalar("false", TokenKind::False),
            Token::Number(token) => StructuralEvent::Scalar {
                token,
                kind: TokenKind::Number,
            },
            Token::String(token) => StructuralEvent::Scalar {
                token,
                kind: TokenKind::String,
            },
            Token::Eof | Token::PropertyName(_) | Token::Punctuator(_) => return Ok(()),
        };
        sink.event(event)?;
        self.parse_state = self.state_after_value();
        Ok(())
    }

    fn open<S: EventSink + ?Sized>(&mut self, frame: Frame, sink: &mut S) -> Result<(), Error> {
        if self.frames.len() >= self.max_depth {
            return Err(self.syntax_error(SyntaxError::DepthExceeded(self.max_depth)));
        }
        self.frames.push(frame);
        match frame {
            Frame::Object => {
                sink.event(StructuralEvent::ObjectStart)?;
                self.parse_state = ParseState::BeforeFirstPropertyName;
            }
            Frame::Array => {
                sink.event(StructuralEvent::ArrayStart)?;
                self.parse_state = ParseState::BeforeFirstArrayValue;
            }
        }
        Ok(())
    }

    fn state_after_value(&self) -> ParseState {
        match self.frames.last() {
            None => ParseState::End,
            Some(Frame::Array) => ParseState::AfterArrayValue,
            Some(Frame::Object) => ParseState::AfterPropertyValue,
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------------------------------

    fn syntax_error(&self, source: SyntaxError) -> Error {
        Error::Syntax {
            source,
            line: self.line,
            column: self.column,
        }
    }
}

fn scalar(token: &str, kind: TokenKind) -> StructuralEvent {
    StructuralEvent::Scalar {
        token: token.to_string(),
        kind,
    }
}

fn invalid_char(c: PeekedChar) -> SyntaxError {
    match c {
        Char(c) => SyntaxError::InvalidCharacter(c),
        Empty | EndOfInput => SyntaxError::UnexpectedEndOfInput,
    }
}
