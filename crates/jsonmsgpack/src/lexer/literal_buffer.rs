use super::Token;

/// What happened after feeding one more character into the literal matcher?
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched and completed the literal.
    Done(Token),
    /// Character did not match the expected byte.
    Reject,
}

/// Remaining bytes of `null`, `true` or `false` while one is being matched.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    token: Option<fn() -> Token>,
}

impl ExpectedLiteralBuffer {
    pub(crate) fn none() -> Self {
        Self {
            rest: &[],
            token: None,
        }
    }

    /// Starts matching after the first character (`n`, `t`, or `f`).
    pub(crate) fn new(first: char) -> Self {
        let (rest, token): (&'static [u8], fn() -> Token) = match first {
            'n' => (b"ull", || Token::Null),
            't' => (b"rue", || Token::Boolean(true)),
            'f' => (b"alse", || Token::Boolean(false)),
            _ => return Self::none(),
        };
        Self {
            rest,
            token: Some(token),
        }
    }

    pub(crate) fn step(&mut self, c: char) -> Step {
        let Some(token) = self.token else {
            return Step::Reject;
        };
        match self.rest.split_first() {
            Some((&expected, rest)) if char::from(expected) == c => {
                if rest.is_empty() {
                    *self = Self::none();
                    Step::Done(token())
                } else {
                    self.rest = rest;
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
