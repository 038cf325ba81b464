use crate::json::{JsonTokenizer, JsonValue, ParseError, SyntaxError, Token, materialize};

fn materialize_str(raw: &str, max_depth: Option<usize>) -> Result<JsonValue, ParseError> {
    let mut tokens = JsonTokenizer::new(raw.as_bytes());
    materialize(&mut tokens, max_depth)
}

fn encode(value: &JsonValue) -> String {
    serde_json::to_string(value).expect("encode")
}

fn number_text(value: Option<&JsonValue>) -> &str {
    match value {
        Some(JsonValue::Number(number)) => number.as_str(),
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn materializes_nested_value() {
    let raw = r#"{"type":"setRoute","tags":["a",null,false],"nested":{"x":{"y":[]}}}"#;
    let value = materialize_str(raw, None).expect("materialize");
    let object = value.as_object().expect("object");
    assert_eq!(object.len(), 3);
    assert_eq!(
        object.get("tags"),
        Some(&JsonValue::Array(vec![
            JsonValue::String("a".to_string()),
            JsonValue::Null,
            JsonValue::Bool(false),
        ]))
    );
    assert_eq!(encode(&value), raw);
}

#[test]
fn object_keeps_field_order_and_number_text() {
    let value = materialize_str(r#"{"z": 1.50, "a": 2e3, "m": -0.0, "b": 2E+3, "c": 5E-1}"#, None)
        .expect("materialize");
    let object = value.as_object().expect("object");
    let keys: Vec<&str> = object.keys().collect();
    assert_eq!(keys, ["z", "a", "m", "b", "c"]);
    assert_eq!(number_text(object.get("z")), "1.50");
    assert_eq!(number_text(object.get("a")), "2e3");
    assert_eq!(number_text(object.get("m")), "-0.0");
    assert_eq!(number_text(object.get("b")), "2E+3");
    assert_eq!(number_text(object.get("c")), "5E-1");
    assert_eq!(encode(&value), r#"{"z":1.50,"a":2e3,"m":-0.0,"b":2E+3,"c":5E-1}"#);
}

#[test]
fn duplicate_field_keeps_last_value_in_first_position() {
    let value = materialize_str(r#"{"type":"a","x":1,"type":"b"}"#, None).expect("materialize");
    let object = value.as_object().expect("object");
    assert_eq!(object.len(), 2);
    assert_eq!(object.get("type"), Some(&JsonValue::String("b".to_string())));
    assert_eq!(encode(&value), r#"{"type":"b","x":1}"#);
}

#[test]
fn consumes_exactly_one_value() {
    let mut tokens = JsonTokenizer::new(&br#"[{"a":[1,2]}, 3]"#[..]);
    assert_eq!(tokens.next_token().expect("begin"), Some(Token::BeginArray));
    let first = materialize(&mut tokens, None).expect("first");
    assert_eq!(encode(&first), r#"{"a":[1,2]}"#);
    let second = materialize(&mut tokens, None).expect("second");
    assert_eq!(number_text(Some(&second)), "3");
    assert_eq!(tokens.next_token().expect("end"), Some(Token::EndArray));
}

#[test]
fn rejects_non_value_start() {
    let mut tokens = JsonTokenizer::new(&b"[]"[..]);
    tokens.next_token().expect("begin");
    let err = materialize(&mut tokens, None).expect_err("end of array is not a value");
    assert_eq!(
        err.syntax(),
        Some(&SyntaxError::UnexpectedToken {
            expected: "a value",
            found: "']'"
        })
    );
}

#[test]
fn depth_limit_counts_containers() {
    let raw = r#"{"location":{"lon":1,"lat":2}}"#;
    assert!(materialize_str(raw, Some(2)).is_ok());
    let err = materialize_str(raw, Some(1)).expect_err("too deep");
    assert_eq!(err.syntax(), Some(&SyntaxError::DepthLimit(1)));
    // 标量不受限制
    assert!(materialize_str("12", Some(0)).is_ok());
}
