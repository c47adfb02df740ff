//! A `TreeBuilder` driven by events derived from a `serde_json::Value`
//! produces the same bytes as the built-in lexer.
#![allow(missing_docs)]

use jsonmsgpack::{Error, EventSink, StructuralEvent, TokenKind, TreeBuilder, encode};
use serde_json::Value;

fn emit(value: &Value, sink: &mut impl EventSink) -> Result<(), Error> {
    let scalar = |token: String, kind| StructuralEvent::Scalar { token, kind };
    match value {
        Value::Null => sink.event(scalar("null".into(), TokenKind::Null)),
        Value::Bool(true) => sink.event(scalar("true".into(), TokenKind::True)),
        Value::Bool(false) => sink.event(scalar("false".into(), TokenKind::False)),
        Value::Number(n) => sink.event(scalar(n.to_string(), TokenKind::Number)),
        Value::String(s) => sink.event(scalar(s.clone(), TokenKind::String)),
        Value::Array(items) => {
            sink.event(StructuralEvent::ArrayStart)?;
            for item in items {
                sink.event(StructuralEvent::ElementStart)?;
                emit(item, sink)?;
            }
            sink.event(StructuralEvent::ArrayEnd)
        }
        Value::Object(map) => {
            sink.event(StructuralEvent::ObjectStart)?;
            for (name, value) in map {
                sink.event(StructuralEvent::FieldStart { name: name.clone() })?;
                emit(value, sink)?;
            }
            sink.event(StructuralEvent::ObjectEnd)
        }
    }
}

fn build(value: &Value) -> Result<Vec<u8>, Error> {
    let mut builder = TreeBuilder::new();
    emit(value, &mut builder)?;
    builder.finish()
}

#[test]
fn serde_json_events_match_the_lexer() {
    for text in [
        r#"{"a":{"b":1},"c":[2,3]}"#,
        r#"[null,true,false,-7,0.5,"s",[],{}]"#,
        r#"{"nested":[[{"deep":["x"]}]],"n":18446744073709551615}"#,
        r#""just a string""#,
    ] {
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(build(&value).unwrap(), encode(text).unwrap(), "{text}");
    }
}

#[test]
fn numbers_serde_json_prints_without_a_point_follow_the_integer_rule() {
    // serde_json prints 1e300 as "1e300", which has no `.` and is therefore
    // an integer literal that does not parse.
    let value = serde_json::json!([1e300]);
    assert!(matches!(build(&value), Err(Error::NumericConversion(_))));
}

#[test]
fn builder_reports_unbalanced_streams() {
    let mut builder = TreeBuilder::new();
    builder.event(StructuralEvent::ObjectStart).unwrap();
    assert!(matches!(
        builder.event(StructuralEvent::ArrayEnd),
        Err(Error::StructuralMismatch(_))
    ));
}
