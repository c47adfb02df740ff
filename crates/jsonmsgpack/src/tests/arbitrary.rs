use core::fmt::{self, Write as _};

use quickcheck::{Arbitrary, Gen};

/// A JSON document restricted to what the text renderer reproduces
/// faithfully: strings need no escaping, floats are multiples of 1/8 so
/// six fraction digits are exact, and keys are unique.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JsonDoc {
    Null,
    Boolean(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    String(String),
    Array(Vec<JsonDoc>),
    Object(Vec<(String, JsonDoc)>),
}

fn plain_string(g: &mut Gen) -> String {
    String::arbitrary(g)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn gen_scalar(g: &mut Gen) -> JsonDoc {
    match usize::arbitrary(g) % 6 {
        0 => JsonDoc::Null,
        1 => JsonDoc::Boolean(bool::arbitrary(g)),
        2 => JsonDoc::Unsigned(u64::arbitrary(g)),
        3 => JsonDoc::Signed(-1 - i64::arbitrary(g).checked_abs().unwrap_or(i64::MAX)),
        4 => JsonDoc::Float(f64::from(i32::from(i16::arbitrary(g))) / 8.0),
        _ => JsonDoc::String(plain_string(g)),
    }
}

fn gen_doc(g: &mut Gen, depth: usize) -> JsonDoc {
    if depth == 0 {
        return gen_scalar(g);
    }
    match usize::arbitrary(g) % 4 {
        0 | 1 => gen_scalar(g),
        2 => {
            let len = usize::arbitrary(g) % 4;
            JsonDoc::Array((0..len).map(|_| gen_doc(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            JsonDoc::Object(
                (0..len)
                    .map(|i| (format!("k{i}{}", plain_string(g)), gen_doc(g, depth - 1)))
                    .collect(),
            )
        }
    }
}

impl Arbitrary for JsonDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        gen_doc(g, depth)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            JsonDoc::Array(items) => Box::new(items.clone().into_iter()),
            JsonDoc::Object(fields) => Box::new(
                fields
                    .clone()
                    .into_iter()
                    .map(|(_, value)| value),
            ),
            _ => Box::new(core::iter::empty()),
        }
    }
}

/// Compact JSON text.
impl fmt::Display for JsonDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonDoc::Null => f.write_str("null"),
            JsonDoc::Boolean(b) => write!(f, "{b}"),
            JsonDoc::Unsigned(n) => write!(f, "{n}"),
            JsonDoc::Signed(n) => write!(f, "{n}"),
            // `{:?}` always keeps a `.` so the literal stays a float.
            JsonDoc::Float(x) => write!(f, "{x:?}"),
            JsonDoc::String(s) => write!(f, "\"{s}\""),
            JsonDoc::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            JsonDoc::Object(fields) => {
                f.write_char('{')?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "\"{key}\":{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

impl JsonDoc {
    /// The text `decode_to_text` is expected to produce for this document.
    pub(crate) fn rendered(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            JsonDoc::Float(x) => {
                let _ = write!(out, "{x:.6}");
            }
            JsonDoc::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.render_into(out);
                }
                out.push(']');
            }
            JsonDoc::Object(fields) => {
                out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "\"{key}\":");
                    value.render_into(out);
                }
                out.push('}');
            }
            scalar => {
                let _ = write!(out, "{scalar}");
            }
        }
    }
}
