use chrono::{TimeZone, Utc};
use groq_lang::{
    Client, Context, EvalError, GroqError, QueryLimits, Value, query, query_with_limits,
};
use serde_json::json;

fn v(value: serde_json::Value) -> Value {
    Value::from(value)
}

fn dataset() -> Vec<Value> {
    vec![
        v(json!({"_id": "p1", "_type": "person", "name": "Ridley Scott"})),
        v(json!({"_id": "p2", "_type": "person", "name": "James Cameron"})),
        v(json!({
            "_id": "m1", "_type": "movie", "title": "Alien", "year": 1979,
            "director": {"_type": "reference", "_ref": "p1"},
            "tags": ["space", "horror"], "rating": 8.5
        })),
        v(json!({
            "_id": "m2", "_type": "movie", "title": "Aliens", "year": 1986,
            "director": {"_type": "reference", "_ref": "p2"},
            "tags": ["space", "action"], "rating": 8.4
        })),
        v(json!({
            "_id": "m3", "_type": "movie", "title": "Blade Runner", "year": 1982,
            "director": {"_type": "reference", "_ref": "p1"},
            "tags": ["noir"]
        })),
        v(json!({
            "_id": "m4", "_type": "movie", "title": "Ghost", "year": 1990,
            "director": {"_type": "reference", "_ref": "gone", "_weak": true}
        })),
    ]
}

fn run(q: &str) -> Value {
    query(q, &Context::new(dataset())).unwrap()
}

fn run_with(q: &str, context: &Context) -> Value {
    query(q, context).unwrap()
}

// ============================================================================
// Filters and projections
// ============================================================================

#[test]
fn test_count_documents_of_a_type() {
    assert_eq!(run("count(*[_type == 'movie'])"), Value::from(4));
}

#[test]
fn test_filter_then_project() {
    assert_eq!(
        run("*[_type == 'movie' && year < 1985]{title}"),
        v(json!([{"title": "Alien"}, {"title": "Blade Runner"}]))
    );
}

#[test]
fn test_attribute_on_array_maps() {
    assert_eq!(
        run("*[_type == 'person'].name"),
        v(json!(["Ridley Scott", "James Cameron"]))
    );
}

#[test]
fn test_filter_with_membership() {
    assert_eq!(run("*['space' in tags].title"), v(json!(["Alien", "Aliens"])));
}

#[test]
fn test_filter_with_text_match() {
    assert_eq!(run("*[title match 'alien*'].title"), v(json!(["Alien", "Aliens"])));
}

#[test]
fn test_projection_keeps_key_order() {
    let result = run("*[_id == 'm1'][0]{year, title}");
    assert_eq!(
        groq_lang::to_json(&result),
        r#"{"year":1979,"title":"Alien"}"#
    );
}

#[test]
fn test_object_splat_in_projection() {
    let result = run("*[_id == 'm3'][0]{..., 'classic': year < 1985}");
    assert_eq!(result.get("title"), Some(&Value::from("Blade Runner")));
    assert_eq!(result.get("classic"), Some(&Value::Boolean(true)));
}

#[test]
fn test_projection_of_missing_document_is_null() {
    assert_eq!(run("*[_id == 'nope'][0]{title}"), Value::Null);
}

// ============================================================================
// Ordering and slicing
// ============================================================================

#[test]
fn test_order_descending() {
    assert_eq!(
        run("*[_type == 'movie'] | order(year desc).title"),
        v(json!(["Ghost", "Aliens", "Blade Runner", "Alien"]))
    );
}

#[test]
fn test_order_then_slice() {
    assert_eq!(
        run("*[_type == 'movie'] | order(year asc) [0..1].title"),
        v(json!(["Alien", "Blade Runner"]))
    );
    assert_eq!(
        run("*[_type == 'movie'] | order(year asc) [0...1].title"),
        v(json!(["Alien"]))
    );
}

#[test]
fn test_order_puts_missing_keys_last() {
    assert_eq!(
        run("*[_type == 'movie'] | order(rating desc).title"),
        v(json!(["Alien", "Aliens", "Blade Runner", "Ghost"]))
    );
}

#[test]
fn test_negative_index() {
    assert_eq!(run("*[_type == 'movie'][-1].title"), Value::from("Ghost"));
}

// ============================================================================
// References
// ============================================================================

#[test]
fn test_dereference() {
    assert_eq!(
        run("*[_id == 'm1'][0].director->name"),
        Value::from("Ridley Scott")
    );
}

#[test]
fn test_dereference_in_projection() {
    assert_eq!(
        run("*[_type == 'movie'] | order(year asc){title, 'director': director->name}"),
        v(json!([
            {"title": "Alien", "director": "Ridley Scott"},
            {"title": "Blade Runner", "director": "Ridley Scott"},
            {"title": "Aliens", "director": "James Cameron"},
            {"title": "Ghost", "director": null},
        ]))
    );
}

#[test]
fn test_parent_scope_join() {
    assert_eq!(
        run(
            "*[_type == 'person']{name, 'movies': *[_type == 'movie' && director._ref == ^._id].title}"
        ),
        v(json!([
            {"name": "Ridley Scott", "movies": ["Alien", "Blade Runner"]},
            {"name": "James Cameron", "movies": ["Aliens"]},
        ]))
    );
}

#[test]
fn test_references_function() {
    assert_eq!(
        run("*[references('p1')].title"),
        v(json!(["Alien", "Blade Runner"]))
    );
    assert_eq!(
        run("count(*[references(['p2', 'gone'])])"),
        Value::from(2)
    );
}

// ============================================================================
// Parameters and context
// ============================================================================

#[test]
fn test_parameters() {
    let context = Context::new(dataset())
        .with_parameter("type", "movie")
        .with_parameter("from", 1985);
    assert_eq!(
        run_with("*[_type == $type && year >= $from].title", &context),
        v(json!(["Aliens", "Ghost"]))
    );
}

#[test]
fn test_missing_parameter_is_null() {
    assert_eq!(run("$nothing"), Value::Null);
}

#[test]
fn test_delta_functions() {
    let context = Context::default().with_delta(Value::Null, v(json!({"title": "New"})));
    assert_eq!(run_with("operation()", &context), Value::from("create"));
    assert_eq!(run_with("after().title", &context), Value::from("New"));
    assert_eq!(run_with("before()", &context), Value::Null);
}

#[test]
fn test_client_functions() {
    let context = Context::default().with_client(Client {
        project_id: "abc123".into(),
        dataset: "production".into(),
    });
    assert_eq!(
        run_with("[sanity::projectId(), sanity::dataset()]", &context),
        v(json!(["abc123", "production"]))
    );
}

#[test]
fn test_pinned_now() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let context = Context::default().with_now(now);
    assert_eq!(run_with("now()", &context), Value::from("2024-05-01T12:00:00Z"));
    assert_eq!(
        run_with("dateTime::now() - dateTime('2024-05-01T11:59:00Z')", &context),
        Value::from(60)
    );
}

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn test_math_over_projection() {
    assert_eq!(run("math::sum(*[_type == 'movie'].year)"), Value::from(7937));
    assert_eq!(run("math::max(*[_type == 'movie'].year)"), Value::from(1990));
}

#[test]
fn test_coalesce_per_document() {
    assert_eq!(
        run("*[_type == 'movie']{'r': coalesce(rating, 0)}.r"),
        v(json!([8.5, 8.4, 0, 0]))
    );
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_scope_limit_is_an_error() {
    let limits = QueryLimits {
        max_scope_depth: 1,
        ..QueryLimits::default()
    };
    let result = query_with_limits(
        "*[_type == 'person']{'m': *[true]}",
        &Context::new(dataset()),
        limits,
    );
    assert_eq!(
        result,
        Err(GroqError::Eval(EvalError::ScopeDepthExceeded(1)))
    );
}

#[test]
fn test_parse_errors_surface() {
    assert!(matches!(
        query("*[", &Context::default()),
        Err(GroqError::Parse(_))
    ));
}
