//! Accumulates the four hexadecimal digits of a `\uXXXX` escape.
//!
//! The buffer yields UTF-16 code units rather than `char`s: surrogate halves
//! are only meaningful in pairs, and pairing is the lexer's job.

use crate::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.code = 0;
        self.len = 0;
    }

    /// Feeds one hex digit; returns the code unit once four have been seen.
    pub(crate) fn feed(&mut self, c: char) -> Result<Option<u16>, SyntaxError> {
        let digit = c
            .to_digit(16)
            .ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;
        // `to_digit(16)` is at most 15.
        #[allow(clippy::cast_possible_truncation)]
        let digit = digit as u16;
        self.code = (self.code << 4) | digit;
        self.len += 1;

        if self.len == 4 {
            let code = self.code;
            self.reset();
            Ok(Some(code))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UnicodeEscapeBuffer;
    use crate::SyntaxError;

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('0'), Ok(None));
        assert_eq!(buf.feed('0'), Ok(None));
        assert_eq!(buf.feed('4'), Ok(None));
        assert_eq!(buf.feed('1'), Ok(Some(0x41)));
    }

    #[test]
    fn surrogates_are_returned_as_code_units() {
        let mut buf = UnicodeEscapeBuffer::new();
        let units: Vec<_> = "D83D".chars().map(|c| buf.feed(c)).collect();
        assert_eq!(units.last(), Some(&Ok(Some(0xD83D))));
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('F'), Ok(None));
        buf.reset();
        for c in "004".chars() {
            assert_eq!(buf.feed(c), Ok(None));
        }
        assert_eq!(buf.feed('2'), Ok(Some(0x42)));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('G'), Err(SyntaxError::InvalidUnicodeEscapeChar('G')));
    }
}
