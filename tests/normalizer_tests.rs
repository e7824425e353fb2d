// tests/normalizer_tests.rs

use groq_lang::{NormalizeError, normalize};

fn normalized(query: &str) -> String {
    normalize(query).unwrap()
}

// ============================================================================
// Whitespace
// ============================================================================

#[test]
fn test_removes_insignificant_whitespace() {
    assert_eq!(
        normalized("*[ _type == 'movie' ] {\n\ttitle,\n\tyear\n}"),
        "*[_type=='movie']{title,year}"
    );
}

#[test]
fn test_whitespace_inside_strings_is_kept() {
    assert_eq!(normalized("title == 'a\t b'"), "title=='a\t b'");
}

// ============================================================================
// Keyword operators
// ============================================================================

#[test]
fn test_in_after_identifier() {
    assert_eq!(normalized("_type   in ['a', 'b']"), "_type in ['a','b']");
}

#[test]
fn test_in_after_closing_bracket() {
    assert_eq!(normalized("(a) in $list"), "(a) in $list");
    assert_eq!(normalized("tags[] in [\"x\"]"), "tags[] in [\"x\"]");
}

#[test]
fn test_match_after_string() {
    assert_eq!(normalized("'hello world' match 'hel*'"), "'hello world' match 'hel*'");
}

#[test]
fn test_sort_directions() {
    assert_eq!(
        normalized("* | order(_createdAt desc)"),
        "*|order(_createdAt desc )"
    );
    assert_eq!(normalized("* | order(a asc, b)"), "*|order(a asc ,b)");
}

#[test]
fn test_keyword_prefixes_are_identifiers() {
    assert_eq!(normalized("inStock && matches"), "inStock&&matches");
    assert_eq!(normalized("description"), "description");
    assert_eq!(normalized("fooasc"), "fooasc");
}

#[test]
fn test_keyword_in_operand_position() {
    assert_eq!(normalized("{asc, desc}"), "{asc,desc}");
    assert_eq!(normalized("*[in == 1]"), "*[in==1]");
    assert_eq!(normalized("x.in"), "x.in");
    assert_eq!(normalized("$match"), "$match");
}

#[test]
fn test_keyword_inside_identifier_is_untouched() {
    assert_eq!(normalized("index + inside"), "index+inside");
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_comments_are_removed() {
    assert_eq!(normalized("count(*) // how many\n + 1"), "count(*)+1");
    assert_eq!(normalized("\"// not a comment\""), "\"// not a comment\"");
}

// ============================================================================
// Strings and escapes
// ============================================================================

#[test]
fn test_escaped_quotes_round_trip() {
    let query = r#"name == "say \"hi\"" && nick == 'it\'s'"#;
    assert_eq!(normalized(query), r#"name=="say \"hi\""&&nick=='it\'s'"#);
}

#[test]
fn test_other_quote_kind_inside_string() {
    assert_eq!(normalized(r#""it's""#), r#""it's""#);
    assert_eq!(normalized(r#"'say "x"'"#), r#"'say "x"'"#);
}

#[test]
fn test_unterminated_string_fails() {
    assert!(matches!(
        normalize("*[title == 'abc]"),
        Err(NormalizeError::UnterminatedString(11))
    ));
}

#[test]
fn test_unterminated_string_positions() {
    assert_eq!(
        normalize("title == \"abc"),
        Err(NormalizeError::UnterminatedString(9))
    );
    assert_eq!(
        normalize("'abc\\"),
        Err(NormalizeError::UnterminatedString(0))
    );
}

#[test]
fn test_unicode_escape_fails() {
    assert_eq!(
        normalize(r#""caf\u00e9""#),
        Err(NormalizeError::UnsupportedEscape(4))
    );
    assert!(matches!(
        normalize(r"'\u2603'"),
        Err(NormalizeError::UnsupportedEscape(1))
    ));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_normalizing_twice_changes_nothing() {
    let queries = [
        "*",
        "*[_type == 'movie' && year in 1980..1989]",
        "*[title match 'star*'] | order(year desc, title asc) [0...5]",
        "{ 'a': [1, 2, ...rest], ...@, \"b\": x->y }",
        "count(*[references(^._id)])  // trailing comment",
        "'  spaced  ' + \"in\"",
    ];
    for query in queries {
        let once = normalized(query);
        assert_eq!(normalized(&once), once, "not idempotent for {query}");
    }
}
