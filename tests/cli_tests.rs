// tests/cli_tests.rs

#![cfg(feature = "cli")]

use groq_lang::cli::{
    CheckOptions, CheckResult, CliError, execute_check, load_dataset, parse_param,
};
use groq_lang::{ParseError, QueryLimits, Value};
use serde_json::json;

// ============================================================================
// Dataset loading
// ============================================================================

#[test]
fn test_load_json_array() {
    let dataset = load_dataset(r#"[{"_id": "a"}, {"_id": "b"}]"#).unwrap();
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_load_ndjson() {
    let dataset = load_dataset("{\"_id\": \"a\"}\n\n{\"_id\": \"b\"}\n").unwrap();
    assert_eq!(dataset[1], Value::from(json!({"_id": "b"})));
}

#[test]
fn test_load_single_pretty_document() {
    let dataset = load_dataset("{\n  \"_id\": \"a\"\n}\n").unwrap();
    assert_eq!(dataset, vec![Value::from(json!({"_id": "a"}))]);
}

#[test]
fn test_load_empty_input() {
    assert!(load_dataset("  \n").unwrap().is_empty());
}

#[test]
fn test_load_ndjson_reports_line() {
    let err = load_dataset("{\"_id\": \"a\"}\n{oops}\n").unwrap_err();
    assert!(matches!(err, CliError::Dataset { line: 2, .. }));
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_parse_param() {
    assert_eq!(
        parse_param("limit=10").unwrap(),
        ("limit".to_string(), Value::from(10))
    );
    assert_eq!(
        parse_param("slug=hello").unwrap(),
        ("slug".to_string(), Value::from("hello"))
    );
    assert!(matches!(parse_param("nope"), Err(CliError::Param(_))));
    assert!(matches!(parse_param("=1"), Err(CliError::Param(_))));
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_execute_check() {
    let options = CheckOptions {
        query: "*[_type == $t] | order(n desc).n".to_string(),
        input: Some(
            r#"[{"_type": "a", "n": 1}, {"_type": "b", "n": 5}, {"_type": "a", "n": 3}]"#
                .to_string(),
        ),
        params: vec!["t=\"a\"".to_string()],
        ..Default::default()
    };
    match execute_check(&options).unwrap() {
        CheckResult::Success(value) => assert_eq!(value, Value::from(json!([3, 1]))),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_syntax_only() {
    let options = CheckOptions {
        query: "*[".to_string(),
        syntax_only: true,
        ..Default::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::Parse(_))));

    let options = CheckOptions {
        query: "count(*)".to_string(),
        syntax_only: true,
        ..Default::default()
    };
    assert!(matches!(
        execute_check(&options),
        Ok(CheckResult::SyntaxValid(_))
    ));
}

#[test]
fn test_check_reports_nesting_limit() {
    let options = CheckOptions {
        query: format!("a{}", "[0]".repeat(5_000)),
        limits: QueryLimits::uniform(32),
        ..Default::default()
    };
    assert!(matches!(
        execute_check(&options),
        Err(CliError::Parse(ParseError::DepthExceeded(32)))
    ));
}
