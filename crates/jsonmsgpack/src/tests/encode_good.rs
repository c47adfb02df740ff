use rstest::rstest;

use crate::{decode_to_text, encode, field, index, parse_input};

#[rstest]
#[case("[]", &[0x90])]
#[case("{}", &[0x80])]
#[case("null", &[0xc0])]
#[case("5", &[0x05])]
#[case("-5", &[0xfb])]
#[case("5.0", &[0xcb, 0x40, 0x14, 0, 0, 0, 0, 0, 0])]
#[case(r#""""#, &[0xa0])]
#[case("[[], {}]", &[0x92, 0x90, 0x80])]
#[case(r#"{"a": [true, false]}"#, &[0x81, 0xa1, b'a', 0x92, 0xc3, 0xc2])]
#[case(" \t\r\n[ 1 , 2 ]\n", &[0x92, 0x01, 0x02])]
fn wire_format(#[case] text: &str, #[case] expected: &[u8]) {
    assert_eq!(encode(text).unwrap(), expected);
}

#[test]
fn closed_children_are_spliced_verbatim() {
    let doc = encode(r#"{"a":{"b":1},"c":[2,3]}"#).unwrap();
    let a = encode(r#"{"b":1}"#).unwrap();
    let c = encode("[2,3]").unwrap();

    let mut expected = vec![0x82, 0xa1, b'a'];
    expected.extend_from_slice(&a);
    expected.extend_from_slice(&[0xa1, b'c']);
    expected.extend_from_slice(&c);
    assert_eq!(doc, expected);

    assert_eq!(field(&doc, "a").unwrap(), Some(a));
    assert_eq!(field(&doc, "c").unwrap(), Some(c));
}

#[test]
fn duplicate_keys_are_kept_in_order() {
    let doc = encode(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(doc, [0x82, 0xa1, b'a', 0x01, 0xa1, b'a', 0x02]);
    assert_eq!(field(&doc, "a").unwrap(), Some(encode("1").unwrap()));
    assert_eq!(decode_to_text(&doc).unwrap(), r#"{"a":1, "a":2}"#);
}

#[test]
fn lookups_that_miss() {
    let array = encode("[10,20,30]").unwrap();
    assert_eq!(index(&array, 3).unwrap(), None);
    assert_eq!(index(&array, -1).unwrap(), None);
    assert_eq!(index(&array, 2).unwrap(), Some(encode("30").unwrap()));

    let small = encode("[1,2]").unwrap();
    assert_eq!(field(&small, "x").unwrap(), None);
}

#[test]
fn strings_are_decoded_before_packing() {
    let doc = encode(r#""tab\there é 😀""#).unwrap();
    assert_eq!(decode_to_text(&doc).unwrap(), "\"tab\there é 😀\"");
}

#[test]
fn rendering_does_not_escape_strings() {
    let doc = encode(r#"["say \"hi\"", "back\\slash"]"#).unwrap();
    assert_eq!(
        decode_to_text(&doc).unwrap(),
        r#"["say "hi"", "back\slash"]"#
    );
}

#[test]
fn float_rendering_uses_six_fraction_digits() {
    let doc = encode("[0.1, -2.5, 1.0e3, 123456789.123]").unwrap();
    assert_eq!(
        decode_to_text(&doc).unwrap(),
        "[0.100000, -2.500000, 1000.000000, 123456789.123000]"
    );
}

#[test]
fn negative_zero_is_a_signed_integer() {
    assert_eq!(encode("-0").unwrap(), [0x00]);
    assert_eq!(decode_to_text(&encode("-0.0").unwrap()).unwrap(), "-0.000000");
}

#[test]
fn binary_literals_bypass_json() {
    let bytes = parse_input(r"\x82a16101a162c0").unwrap().unwrap();
    assert_eq!(decode_to_text(&bytes).unwrap(), r#"{"a":1, "b":null}"#);

    // Not valid JSON, and not valid MessagePack either: stored as written.
    assert_eq!(parse_input(r"\xc1").unwrap(), Some(vec![0xc1]));
}
