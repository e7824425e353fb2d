// tests/value_tests.rs

use groq_lang::{Context, Reference, Value, query, to_json, to_json_pretty};
use serde_json::json;

fn v(value: serde_json::Value) -> Value {
    Value::from(value)
}

// ============================================================================
// JSON conversion
// ============================================================================

#[test]
fn test_json_conversion_keeps_key_order() {
    let value = v(json!({"b": 1, "a": [true, null, "x"]}));
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(
        serde_json::Value::from(value),
        json!({"b": 1, "a": [true, null, "x"]})
    );
}

#[test]
fn test_whole_numbers_serialize_as_integers() {
    assert_eq!(serde_json::to_string(&Value::Number(14.0)).unwrap(), "14");
    assert_eq!(serde_json::to_string(&Value::Number(-0.25)).unwrap(), "-0.25");
    assert_eq!(serde_json::to_string(&Value::Number(f64::NAN)).unwrap(), "null");
}

#[test]
fn test_datetime_serializes_as_iso_string() {
    let value = query("dateTime('2024-03-01T12:30:00+01:00')", &Context::default()).unwrap();
    assert!(matches!(value, Value::DateTime(_)));
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        "\"2024-03-01T11:30:00Z\""
    );
}

// ============================================================================
// Views
// ============================================================================

#[test]
fn test_reference_view() {
    let strong = v(json!({"_type": "reference", "_ref": "author-1"}));
    assert_eq!(
        strong.as_reference(),
        Some(Reference {
            id: "author-1",
            weak: false
        })
    );

    let weak = v(json!({"_ref": "x", "_weak": true}));
    assert!(weak.as_reference().unwrap().weak);

    assert_eq!(v(json!({"_ref": 3})).as_reference(), None);
    assert_eq!(Value::from("x").as_reference(), None);
}

#[test]
fn test_as_integer() {
    assert_eq!(Value::Number(3.0).as_integer(), Some(3));
    assert_eq!(Value::Number(-2.0).as_integer(), Some(-2));
    assert_eq!(Value::Number(2.5).as_integer(), None);
    assert_eq!(Value::from("3").as_integer(), None);
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(v(json!([1])).type_name(), "array");
    assert_eq!(v(json!({"a": 1})).type_name(), "object");
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_output_keeps_object_key_order() {
    let value = v(json!({"z": 1, "a": {"y": true, "b": null}}));
    assert_eq!(to_json(&value), r#"{"z":1,"a":{"y":true,"b":null}}"#);
}

#[test]
fn test_output_numbers() {
    assert_eq!(to_json(&Value::Number(262144.0)), "262144");
    assert_eq!(to_json(&Value::Number(-0.25)), "-0.25");
    assert_eq!(to_json(&Value::Number(f64::INFINITY)), "null");
}

#[test]
fn test_output_string_escaping() {
    assert_eq!(to_json(&Value::from("a\"b\n")), r#""a\"b\n""#);
}

#[test]
fn test_output_pretty() {
    let value = v(json!({"a": [1]}));
    assert_eq!(to_json_pretty(&value), "{\n  \"a\": [\n    1\n  ]\n}");
}
