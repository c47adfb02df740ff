//! Decoding of backslash-prefixed binary literals.
//!
//! Text input whose first character is `\` carries raw bytes instead of JSON,
//! in one of two notations:
//!
//! - hex: `\x` followed by pairs of hex digits, optionally separated by
//!   whitespace (`\x 81a1 61 01`);
//! - escape: every byte stands for itself except `\`, which must start
//!   either `\\` (a backslash) or a three-digit octal escape `\ooo` whose
//!   first digit is 0–3.
//!
//! The bytes are returned as written; they are not checked to be
//! MessagePack.

use crate::Error;

/// Decodes a binary literal. `text` must start with `\`.
///
/// # Errors
///
/// Returns [`Error::InvalidBinaryLiteral`] for malformed hex or escape
/// sequences.
///
/// # Examples
///
/// ```
/// use jsonmsgpack::decode_binary_literal;
///
/// assert_eq!(decode_binary_literal(r"\x91 01").unwrap(), [0x91, 0x01]);
/// assert_eq!(decode_binary_literal(r"\221\001").unwrap(), [0x91, 0x01]);
/// ```
pub fn decode_binary_literal(text: &str) -> Result<Vec<u8>, Error> {
    let bytes = text.as_bytes();
    match bytes {
        [b'\\', b'x', hex @ ..] => decode_hex(hex),
        [b'\\', ..] => decode_escaped(bytes),
        _ => Err(Error::InvalidBinaryLiteral("literal must start with a backslash")),
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode_hex(hex: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(hex.len() / 2);
    let mut i = 0;
    while i < hex.len() {
        if matches!(hex[i], b' ' | b'\t' | b'\n' | b'\r') {
            i += 1;
            continue;
        }
        let high = hex_value(hex[i]).ok_or(Error::InvalidBinaryLiteral("invalid hexadecimal digit"))?;
        let low = match hex.get(i + 1) {
            None => return Err(Error::InvalidBinaryLiteral("odd number of hexadecimal digits")),
            Some(&b) => hex_value(b).ok_or(Error::InvalidBinaryLiteral("invalid hexadecimal digit"))?,
        };
        out.push((high << 4) | low);
        i += 2;
    }
    Ok(out)
}

fn octal_digit(b: u8, max: u8) -> Option<u8> {
    (b'0'..=max).contains(&b).then(|| b - b'0')
}

fn decode_escaped(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while let Some((&b, tail)) = rest.split_first() {
        if b != b'\\' {
            out.push(b);
            rest = tail;
            continue;
        }
        match tail {
            [b'\\', tail @ ..] => {
                out.push(b'\\');
                rest = tail;
            }
            [a, b, c, tail @ ..] => {
                let (Some(a), Some(b), Some(c)) =
                    (octal_digit(*a, b'3'), octal_digit(*b, b'7'), octal_digit(*c, b'7'))
                else {
                    return Err(Error::InvalidBinaryLiteral("invalid escape sequence"));
                };
                out.push((a << 6) | (b << 3) | c);
                rest = tail;
            }
            _ => return Err(Error::InvalidBinaryLiteral("invalid escape sequence")),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r"\x", &[])]
    #[case(r"\x00ff", &[0x00, 0xff])]
    #[case(r"\xDEADbeef", &[0xde, 0xad, 0xbe, 0xef])]
    #[case("\\x 91 01\n", &[0x91, 0x01])]
    #[case(r"\\", &[b'\\'])]
    #[case(r"\\abc", &[b'\\', b'a', b'b', b'c'])]
    #[case(r"\000", &[0x00])]
    #[case(r"\377", &[0xff])]
    #[case(r"\221\001tail", &[0x91, 0x01, b't', b'a', b'i', b'l'])]
    fn valid_literals(#[case] text: &str, #[case] expected: &[u8]) {
        assert_eq!(decode_binary_literal(text).unwrap(), expected);
    }

    #[rstest]
    #[case(r"\x0")]
    #[case(r"\x0g")]
    #[case(r"\xzz")]
    #[case(r"\x0 1")]
    #[case(r"\400")]
    #[case(r"\08")]
    #[case(r"\1")]
    #[case(r"\abc")]
    #[case("plain")]
    fn invalid_literals(#[case] text: &str) {
        assert!(matches!(
            decode_binary_literal(text),
            Err(Error::InvalidBinaryLiteral(_))
        ));
    }
}
