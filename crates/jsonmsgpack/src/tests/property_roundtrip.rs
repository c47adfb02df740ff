use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;

use super::arbitrary::JsonDoc;
use crate::{EncoderOptions, Encoder, decode_to_text, encode, field, index};

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: rendering an encoded document reproduces the document, and the
/// rendering parses to the same JSON value as the source text.
#[test]
fn encode_then_render_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc) -> bool {
        let text = doc.to_string();
        let bytes = encode(&text).unwrap();
        let rendered = decode_to_text(&bytes).unwrap();

        let source: serde_json::Value = serde_json::from_str(&text).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        rendered == doc.rendered() && source == reparsed
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(JsonDoc) -> bool);
}

/// Property: the encoding does not depend on how the text is chunked.
#[test]
fn partition_invariance_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, splits: Vec<usize>) -> bool {
        let text = doc.to_string();
        let expected = encode(&text).unwrap();

        let chars: Vec<char> = text.chars().collect();
        let mut encoder = Encoder::new(EncoderOptions::default());
        let mut idx = 0;
        for s in splits {
            let remaining = chars.len() - idx;
            if remaining == 0 {
                break;
            }
            let end = idx + 1 + s % remaining;
            let chunk: String = chars[idx..end].iter().collect();
            encoder.feed(&chunk).unwrap();
            idx = end;
        }
        let rest: String = chars[idx..].iter().collect();
        encoder.feed(&rest).unwrap();

        encoder.finish().unwrap() == expected
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(JsonDoc, Vec<usize>) -> bool);
}

/// Property: every member and element can be looked up and equals the
/// separately encoded child.
#[test]
fn lookup_matches_child_encoding_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc) -> TestResult {
        let bytes = encode(&doc.to_string()).unwrap();
        match &doc {
            JsonDoc::Object(fields) => TestResult::from_bool(fields.iter().all(|(key, value)| {
                field(&bytes, key).unwrap() == Some(encode(&value.to_string()).unwrap())
            })),
            JsonDoc::Array(items) => TestResult::from_bool(
                items.iter().zip(0_i64..).all(|(item, i)| {
                    index(&bytes, i).unwrap() == Some(encode(&item.to_string()).unwrap())
                }) && index(&bytes, i64::try_from(items.len()).unwrap()).unwrap().is_none(),
            ),
            _ => TestResult::discard(),
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(JsonDoc) -> TestResult);
}

#[quickcheck]
fn unsigned_integers_round_trip(n: u64) -> bool {
    decode_to_text(&encode(&n.to_string()).unwrap()).unwrap() == n.to_string()
}

#[quickcheck]
fn signed_integers_round_trip(n: i64) -> bool {
    decode_to_text(&encode(&n.to_string()).unwrap()).unwrap() == n.to_string()
}
