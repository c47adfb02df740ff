/// Unread input carried between `feed` calls.
///
/// Consumed characters are discarded lazily: the next `push` compacts the
/// string before appending.
#[derive(Debug, Default)]
pub(crate) struct Buffer {
    text: String,
    offset: usize,
}

impl Buffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, text: &str) {
        if self.offset >= self.text.len() {
            self.text.clear();
        } else if self.offset > 0 {
            self.text.drain(..self.offset);
        }
        self.offset = 0;
        self.text.push_str(text);
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    /// Appends the longest prefix whose characters satisfy `keep` to `out`
    /// and returns the number of characters copied.
    pub(crate) fn copy_while(&mut self, out: &mut String, keep: impl Fn(char) -> bool) -> usize {
        let rest = &self.text[self.offset..];
        let end = rest
            .char_indices()
            .find(|&(_, c)| !keep(c))
            .map_or(rest.len(), |(i, _)| i);
        let copied = &rest[..end];
        out.push_str(copied);
        self.offset += end;
        copied.chars().count()
    }
}

impl Iterator for Buffer {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::Buffer;

    #[test]
    fn carries_unread_text_across_pushes() {
        let mut buf = Buffer::new();
        buf.push("ab");
        assert_eq!(buf.next(), Some('a'));
        buf.push("cd");
        assert_eq!(buf.collect::<String>(), "bcd");
    }

    #[test]
    fn copy_while_counts_chars_not_bytes() {
        let mut buf = Buffer::new();
        buf.push("héllo\"rest");
        let mut out = String::new();
        assert_eq!(buf.copy_while(&mut out, |c| c != '"'), 5);
        assert_eq!(out, "héllo");
        assert_eq!(buf.peek(), Some('"'));
    }
}
