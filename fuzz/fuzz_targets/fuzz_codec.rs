#![no_main]
use arbitrary::Arbitrary;
use jsonmsgpack::{
    EncoderOptions, Encoder, Error, SyntaxError, decode_to_text, encode_with, field, index,
    parse_input,
};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => Value::from(u.arbitrary::<u64>()?),
            3 => Value::from(u.arbitrary::<i64>()?),
            4 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            5..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

#[derive(Debug, Arbitrary)]
enum Input {
    /// Arbitrary text through the host entry point.
    Text {
        text: String,
        split_seed: u64,
        unicode_whitespace: bool,
    },
    /// Well-formed JSON; only number ranges, `\u0000` and nesting may fail.
    Json(ArbitraryValue),
    /// Arbitrary bytes through the decoding side.
    Bytes { bytes: Vec<u8>, name: String, i: i64 },
}

/// Split a UTF-8 `&str` into boundary-safe chunks of at least one byte.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = text.len();

    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < len && !text.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&text[start..start + size]);
        start += size;
    }

    chunks
}

fn check_encoded(bytes: &[u8]) {
    decode_to_text(bytes).expect("encoded output must decode");
}

fn text(text: &str, split_seed: u64, unicode_whitespace: bool) {
    let options = EncoderOptions {
        allow_unicode_whitespace: unicode_whitespace,
        ..Default::default()
    };
    let whole = encode_with(text, &options);

    let mut encoder = Encoder::new(options);
    let chunked = split_into_safe_chunks(text, split_seed)
        .into_iter()
        .try_for_each(|chunk| encoder.feed(chunk))
        .and_then(|()| encoder.finish());

    assert_eq!(whole.is_ok(), chunked.is_ok(), "chunking changed the outcome");
    if let (Ok(whole), Ok(chunked)) = (&whole, &chunked) {
        assert_eq!(whole, chunked);
        check_encoded(whole);
    }

    if let Ok(Some(bytes)) = parse_input(text) {
        let _ = decode_to_text(&bytes);
    }
}

fn json(value: &Value) {
    let text = value.to_string();
    match encode_with(&text, &EncoderOptions::default()) {
        Ok(bytes) => check_encoded(&bytes),
        Err(Error::NumericConversion(_)) => {}
        Err(Error::Syntax {
            source: SyntaxError::NulEscape | SyntaxError::DepthExceeded(_),
            ..
        }) => {}
        Err(err) => panic!("serde_json output rejected: {err}\n{text}"),
    }
}

fn bytes(bytes: &[u8], name: &str, i: i64) {
    let rendered = decode_to_text(bytes);
    let by_name = field(bytes, name);
    let by_index = index(bytes, i);
    assert_eq!(rendered.is_ok(), by_name.is_ok());
    assert_eq!(rendered.is_ok(), by_index.is_ok());
    for child in [by_name, by_index].into_iter().flatten().flatten() {
        check_encoded(&child);
    }
}

fuzz_target!(|input: Input| match input {
    Input::Text {
        text: t,
        split_seed,
        unicode_whitespace,
    } => text(&t, split_seed, unicode_whitespace),
    Input::Json(ArbitraryValue(value)) => json(&value),
    Input::Bytes { bytes: b, name, i } => bytes(&b, &name, i),
});
