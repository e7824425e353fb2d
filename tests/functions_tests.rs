// tests/functions_tests.rs

use groq_lang::functions::{is_defined, is_pipe_defined, unknown_functions};
use groq_lang::{Context, Value, parse, query};
use serde_json::json;

fn v(value: serde_json::Value) -> Value {
    Value::from(value)
}

fn eval(q: &str) -> Value {
    query(q, &Context::default()).unwrap()
}

fn eval_with(q: &str, name: &str, value: serde_json::Value) -> Value {
    query(q, &Context::default().with_parameter(name, v(value))).unwrap()
}

// ============================================================================
// global
// ============================================================================

#[test]
fn test_coalesce() {
    assert_eq!(eval("coalesce(null, missing, 2, 3)"), Value::from(2));
    assert_eq!(eval("coalesce(null)"), Value::Null);
    assert_eq!(eval("coalesce()"), Value::Null);
}

#[test]
fn test_count_and_length() {
    assert_eq!(eval("count([1, 2, 3])"), Value::from(3));
    assert_eq!(eval("count('abc')"), Value::Null);
    assert_eq!(eval("length('héllo')"), Value::from(5));
    assert_eq!(eval("length([1, 2])"), Value::from(2));
    assert_eq!(eval("length(1)"), Value::Null);
}

#[test]
fn test_defined() {
    assert_eq!(eval("defined(1)"), Value::Boolean(true));
    assert_eq!(eval("defined(missing)"), Value::Boolean(false));
    assert_eq!(eval("defined()"), Value::Null);
}

#[test]
fn test_lower_upper() {
    assert_eq!(eval("lower('AbC')"), Value::from("abc"));
    assert_eq!(eval("upper('AbC')"), Value::from("ABC"));
    assert_eq!(eval("string::upper('x')"), Value::from("X"));
    assert_eq!(eval("upper(1)"), Value::Null);
}

#[test]
fn test_round() {
    assert_eq!(eval("round(2.5)"), Value::from(3));
    assert_eq!(eval("round(-2.5)"), Value::from(-3));
    assert_eq!(eval("round(3.14159, 2)"), Value::from(3.14));
    assert_eq!(eval("round(1.5, -1)"), Value::Null);
    assert_eq!(eval("round('1')"), Value::Null);
}

#[test]
fn test_string() {
    assert_eq!(eval("string(3)"), Value::from("3"));
    assert_eq!(eval("string(2.5)"), Value::from("2.5"));
    assert_eq!(eval("string(true)"), Value::from("true"));
    assert_eq!(eval("string([1])"), Value::Null);
}

#[test]
fn test_date_time() {
    assert_eq!(
        eval("string(dateTime('2024-03-01T10:00:00+02:00'))"),
        Value::from("2024-03-01T08:00:00Z")
    );
    assert_eq!(eval("dateTime('yesterday')"), Value::Null);
    assert_eq!(eval("dateTime(1)"), Value::Null);
}

#[test]
fn test_operation_without_delta_is_null() {
    assert_eq!(eval("operation()"), Value::Null);
}

#[test]
fn test_operation_kinds() {
    let doc = v(json!({"_id": "a"}));
    let update = Context::default().with_delta(doc.clone(), doc.clone());
    assert_eq!(query("operation()", &update).unwrap(), Value::from("update"));

    let delete = Context::default().with_delta(doc, Value::Null);
    assert_eq!(query("operation()", &delete).unwrap(), Value::from("delete"));
}

#[test]
fn test_geo_and_pt_guards() {
    assert_eq!(
        eval_with("geo($p)", "p", json!({"type": "Point", "coordinates": [1, 2]})),
        v(json!({"type": "Point", "coordinates": [1, 2]}))
    );
    assert_eq!(eval_with("geo($p)", "p", json!({"lat": 1})), Value::Null);
    assert_eq!(
        eval_with("pt($p)", "p", json!([{"_type": "block"}])),
        v(json!([{"_type": "block"}]))
    );
    assert_eq!(eval("pt('text')"), Value::Null);
}

#[test]
fn test_geo_accepts_geometries_and_geopoints() {
    let polygon = json!({"type": "Polygon", "coordinates": []});
    assert_eq!(eval_with("geo($p)", "p", polygon.clone()), v(polygon));
    assert_eq!(
        eval_with("geo($p)", "p", json!({"type": "Circle", "coordinates": []})),
        Value::Null
    );

    let geopoint = json!({"_type": "geopoint", "lat": 59.9, "lng": 10.0});
    assert_eq!(eval_with("geo($p)", "p", geopoint.clone()), v(geopoint));
    assert_eq!(
        eval_with("geo($p)", "p", json!({"_type": "geopoint", "lat": "north"})),
        Value::Null
    );
}

// ============================================================================
// array
// ============================================================================

#[test]
fn test_array_functions() {
    assert_eq!(eval("array::compact([1, null, 2])"), v(json!([1, 2])));
    assert_eq!(eval("array::join(['a', 1, true], '-')"), Value::from("a-1-true"));
    assert_eq!(eval("array::join([[1]], ',')"), Value::Null);
    assert_eq!(
        eval("array::unique([1, 1, {'a': 1}, {'a': 1}, '1'])"),
        v(json!([1, {"a": 1}, "1"]))
    );
    assert_eq!(eval("array::intersects([1, 2], [3, 2])"), Value::Boolean(true));
    assert_eq!(eval("array::intersects([1], [])"), Value::Boolean(false));
    assert_eq!(eval("array::compact('x')"), Value::Null);
}

// ============================================================================
// string
// ============================================================================

#[test]
fn test_string_functions() {
    assert_eq!(eval("string::split('a,b,c', ',')"), v(json!(["a", "b", "c"])));
    assert_eq!(eval("string::split('abc', '')"), v(json!(["a", "b", "c"])));
    assert_eq!(eval("string::startsWith('groq', 'gr')"), Value::Boolean(true));
    assert_eq!(eval("string::startsWith('groq', 1)"), Value::Null);
}

// ============================================================================
// math
// ============================================================================

#[test]
fn test_math_functions() {
    assert_eq!(eval("math::sum([1, 2, null, 3])"), Value::from(6));
    assert_eq!(eval("math::sum([])"), Value::from(0));
    assert_eq!(eval("math::avg([1, 2, 3, 4])"), Value::from(2.5));
    assert_eq!(eval("math::avg([])"), Value::Null);
    assert_eq!(eval("math::min([3, 1, 2])"), Value::from(1));
    assert_eq!(eval("math::max([3, 1, 2])"), Value::from(3));
    assert_eq!(eval("math::max([1, 'a'])"), Value::Null);
    assert_eq!(eval("math::sum(1)"), Value::Null);
}

// ============================================================================
// geo
// ============================================================================

#[test]
fn test_lat_lng_and_distance() {
    assert_eq!(
        eval("geo::latLng(59.91, 10.75)"),
        v(json!({"type": "Point", "coordinates": [10.75, 59.91]}))
    );
    assert_eq!(eval("geo::latLng(100, 0)"), Value::Null);
    assert_eq!(
        eval("geo::distance(geo::latLng(1, 1), geo::latLng(1, 1))"),
        Value::from(0)
    );

    let one_degree = eval("geo::distance(geo::latLng(0, 0), geo::latLng(0, 1))");
    let metres = one_degree.as_f64().unwrap();
    assert!((metres - 111_195.0).abs() < 10.0, "{metres}");
    assert_eq!(eval("geo::distance(1, 2)"), Value::Null);
}

#[test]
fn test_distance_between_point_shapes() {
    let context = Context::default()
        .with_parameter(
            "a",
            v(json!({"type": "Point", "coordinates": [10.0, 59.9]})),
        )
        .with_parameter(
            "b",
            v(json!({"_type": "geopoint", "lat": 59.9, "lng": 10.0})),
        );
    assert_eq!(query("geo::distance($a, $b)", &context).unwrap(), Value::from(0));
    assert_eq!(
        query("geo::distance($a, {'type': 'LineString', 'coordinates': []})", &context).unwrap(),
        Value::Null
    );
}

// ============================================================================
// pt
// ============================================================================

#[test]
fn test_pt_text() {
    let body = json!([
        {"_type": "block", "children": [{"_type": "span", "text": "One"}]},
        {"_type": "block", "children": [{"_type": "span", "text": "Two"}]}
    ]);
    assert_eq!(eval_with("pt::text($body)", "body", body), Value::from("One\n\nTwo"));
}

#[test]
fn test_pt_text_skips_non_text_blocks() {
    let body = json!([
        {"_type": "block", "children": [
            {"_type": "span", "text": "Hello "},
            {"_type": "span", "text": "world"}
        ]},
        {"_type": "image", "asset": {"_ref": "img"}},
        {"_type": "block", "children": [{"_type": "span", "text": "Bye"}]}
    ]);
    assert_eq!(
        eval_with("pt::text($body)", "body", body),
        Value::from("Hello world\n\nBye")
    );
    assert_eq!(eval("pt::text('plain')"), Value::Null);
}

// ============================================================================
// order
// ============================================================================

#[test]
fn test_order_by_several_keys() {
    let items = json!([
        {"a": 1, "b": "y"},
        {"a": 2, "b": "x"},
        {"a": 1, "b": "x"},
    ]);
    assert_eq!(
        eval_with("$items | order(a desc, b)", "items", items),
        v(json!([
            {"a": 2, "b": "x"},
            {"a": 1, "b": "x"},
            {"a": 1, "b": "y"},
        ]))
    );
}

#[test]
fn test_order_is_stable() {
    let items = json!([{"k": 1, "n": "first"}, {"k": 0}, {"k": 1, "n": "second"}]);
    assert_eq!(
        eval_with("($items | order(k)).n", "items", items),
        v(json!([null, "first", "second"]))
    );
}

#[test]
fn test_order_edge_cases() {
    assert_eq!(eval("1 | order(@)"), Value::Null);
    assert_eq!(eval("[2, 1] | order()"), Value::Null);
    assert_eq!(eval("[2, null, 1] | order(@ desc)"), v(json!([2, 1, null])));
}

#[test]
fn test_order_ranks_types_and_keeps_nulls_last() {
    let items = json!(["a", 2, null, true, 1]);
    assert_eq!(
        eval_with("$items | order(@)", "items", items.clone()),
        v(json!([true, 1, 2, "a", null]))
    );
    assert_eq!(
        eval_with("$items | order(@ desc)", "items", items),
        v(json!(["a", 2, 1, true, null]))
    );
}

#[test]
fn test_unknown_pipe_function_is_null() {
    assert_eq!(eval("[1] | shuffle()"), Value::Null);
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_lookup() {
    for (namespace, name) in [
        ("global", "references"),
        ("array", "unique"),
        ("string", "split"),
        ("math", "avg"),
        ("dateTime", "now"),
        ("geo", "distance"),
        ("pt", "text"),
        ("sanity", "dataset"),
    ] {
        assert!(is_defined(namespace, name), "{namespace}::{name}");
    }
    assert!(!is_defined("global", "sum"));
    assert!(!is_defined("nope", "count"));
    assert!(is_defined("string", "startsWith"));
    assert!(is_defined("sanity", "projectId"));
    assert!(is_pipe_defined("order"));
    assert!(!is_pipe_defined("score"));
}

#[test]
fn test_unknown_functions_report() {
    let ast = parse("*[defined(a)]{'x': array::flatten(b)} | score(c)").unwrap();
    assert_eq!(unknown_functions(&ast), vec!["|score", "array::flatten"]);
    assert!(unknown_functions(&parse("count(*)").unwrap()).is_empty());

    let ast = parse("*[defined(x) && nope(y)] | score(z) {\"a\": math::median(b)}").unwrap();
    assert_eq!(
        unknown_functions(&ast),
        vec!["|score", "global::nope", "math::median"]
    );
}

// ============================================================================
// references
// ============================================================================

#[test]
fn test_references_looks_inside_nested_values() {
    let context = Context::new(vec![
        v(json!({
            "_id": "post", "_type": "post",
            "body": [{"_type": "block", "markDefs": [{"_ref": "b"}]}],
            "author": {"_ref": "a", "_type": "reference"}
        })),
        v(json!({"_id": "a", "_type": "author"})),
    ]);
    for (q, expected) in [
        ("*[references('a')]._id", json!(["post"])),
        ("*[references('b')]._id", json!(["post"])),
        ("*[references('c')]._id", json!([])),
        ("*[references(['c', 'b'])]._id", json!(["post"])),
    ] {
        assert_eq!(query(q, &context).unwrap(), v(expected), "{q}");
    }
    assert_eq!(query("*[references(['a', 1])]", &context).unwrap(), v(json!([])));
}
