use apipool_core::{decode, is_valid, DecodedValue};

#[test]
fn compact_json_reencodes_byte_for_byte() {
    let inputs: [&[u8]; 5] = [
        br#"{"a":1}"#,
        br#"{"zeta":true,"alpha":[1,2.5,"x"],"mid":null}"#,
        br#"[{"b":{"c":"d"}},{"a":-3}]"#,
        br#""plain string""#,
        b"42",
    ];
    for input in inputs {
        assert!(is_valid(input));
        let decoded = decode(input);
        let value = decoded.as_structured().expect("structured");
        let reencoded = serde_json::to_vec(value).unwrap();
        assert_eq!(reencoded, input, "{}", String::from_utf8_lossy(input));
    }
}

#[test]
fn invalid_payloads_decode_to_raw_text() {
    let decoded = decode(b"<html>oops</html>");
    assert_eq!(decoded, DecodedValue::Raw("<html>oops</html>".to_string()));
    assert!(!decoded.is_structured());
}
