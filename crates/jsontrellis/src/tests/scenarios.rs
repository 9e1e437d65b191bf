//! End-to-end sessions over small documents.
use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{DEFAULT_MAX_DEPTH, FeedMode, Map, NodeKind, Schema, Session, SessionOptions, Value};

fn object(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<Map>(),
    )
}

#[test]
fn streaming_title_appears_once_its_key_is_known() {
    let schema =
        Schema::object("Doc", [("title", Schema::string("Title").streaming())]).streaming();
    let mut session = Session::new(schema);

    let update = session.feed(r#"{"tit"#);
    assert_eq!(update.value, Some(object(vec![])));
    assert!(!update.state.is_complete);

    let update = session.feed(r#"{"title":"ab"#);
    assert_eq!(update.value, Some(object(vec![("title", "ab".into())])));
    assert!(!update.state.is_complete);

    let update = session.feed(r#"{"title":"ab"}"#);
    assert_eq!(update.value, Some(object(vec![("title", "ab".into())])));
    assert!(update.state.is_complete);
}

#[test]
fn non_streaming_array_waits_for_its_bracket() {
    let schema = Schema::object(
        "Doc",
        [("values", Schema::array("Values", Schema::number("Value")))],
    )
    .streaming();
    let mut session = Session::new(schema);

    let update = session.feed(r#"{"values":[1,2"#);
    assert_eq!(update.value, Some(object(vec![])));

    let update = session.feed(r#"{"values":[1,2]}"#);
    assert_eq!(
        update.value,
        Some(object(vec![(
            "values",
            vec![Value::Number(1.0), Value::Number(2.0)].into()
        )]))
    );
    assert!(update.state.is_complete);
}

#[test]
fn truncated_literal_is_not_an_error_until_it_diverges() {
    let schema = Schema::object("Doc", [("a", Schema::boolean("Flag"))]);
    let mut session = Session::new(schema);

    let update = session.feed(r#"{"a": tru"#);
    assert_eq!(update.state.error, None);
    assert_eq!(update.state.nodes.len(), 1);

    let update = session.feed(r#"{"a": truX"#);
    let error = update.state.error.clone().unwrap();
    assert_eq!((error.line, error.column), (1, 9));
    assert_eq!(error.message, "invalid character 'X'");
}

#[test]
fn ids_are_stable_across_feeds() {
    let schema = Schema::object(
        "Reply",
        [
            ("response", Schema::string("Text").streaming()),
            ("followUps", Schema::array("Questions", Schema::string("Q")).streaming()),
        ],
    );
    let mut session = Session::new(schema);
    let doc = r#"{"response":"Sure","followUps":["Why?","How?"]}"#;

    let mut seen = Vec::new();
    for end in 1..=doc.len() {
        let update = session.feed(&doc[..end]);
        for node in &update.state.nodes {
            match seen.get(node.id.get() as usize) {
                Some(kind) => assert_eq!(*kind, node.kind),
                None => seen.push(node.kind),
            }
        }
    }

    assert_eq!(
        seen,
        [
            NodeKind::Object,
            NodeKind::String,
            NodeKind::Array,
            NodeKind::String,
            NodeKind::String,
        ]
    );
    assert_eq!(
        session.value(),
        Some(object(vec![
            ("response", "Sure".into()),
            ("followUps", vec![Value::from("Why?"), Value::from("How?")].into()),
        ]))
    );
}

#[rstest]
#[case::escape(r#"{"s":"a\"#, "a")]
#[case::unicode_escape(r#"{"s":"a\u00e"#, "a")]
#[case::complete_escape(r#"{"s":"a\u00e9"#, "a\u{e9}")]
#[case::high_surrogate(r#"{"s":"\ud83d"#, "")]
#[case::surrogate_backslash(r#"{"s":"\ud83d\"#, "")]
#[case::surrogate_pair(r#"{"s":"\ud83d\ude00!"#, "\u{1F600}!")]
fn streaming_strings_hold_back_partial_escapes(#[case] prefix: &str, #[case] expected: &str) {
    let schema = Schema::object("Doc", [("s", Schema::string("S").streaming())]).streaming();
    let mut session = Session::new(schema);
    let update = session.feed(prefix);
    assert_eq!(update.state.error, None);
    assert_eq!(update.value, Some(object(vec![("s", expected.into())])));
}

#[rstest]
#[case::nested_error("[1, {\"a\": }]", 1, 10)]
#[case::second_line("{\n  \"a\" 1}", 2, 6)]
#[case::trailing_comma("[1,]", 1, 3)]
#[case::garbage_after_root("{} x", 1, 3)]
fn errors_report_the_last_accepted_position(
    #[case] doc: &str,
    #[case] line: usize,
    #[case] column: usize,
) {
    let mut session = Session::new(Schema::array("", Schema::number("")));
    let update = session.feed(doc);
    let error = update.state.error.clone().unwrap();
    assert_eq!((error.line, error.column), (line, column), "{error}");
}

#[test]
fn nullable_accent_and_optional_fields() {
    let theme = Schema::object(
        "Theme",
        [
            ("primary", Schema::string("Primary color")),
            ("accent", Schema::nullable(Schema::string("Accent"))),
            ("muted", Schema::string("Muted color").optional()),
        ],
    )
    .streaming();
    let mut session = Session::with_options(
        theme,
        SessionOptions {
            feed_mode: FeedMode::Delta,
            ..Default::default()
        },
    );

    session.feed(r##"{"primary":"#6366f1","accent":nu"##);
    assert_eq!(
        session.value(),
        Some(object(vec![("primary", "#6366f1".into())]))
    );

    let update = session.feed("ll}");
    assert_eq!(
        update.value,
        Some(object(vec![("primary", "#6366f1".into()), ("accent", Value::Null)]))
    );
    assert!(update.state.is_complete);
}

#[test]
fn depth_limit_is_recorded_as_an_error() {
    let mut session = Session::with_options(
        Schema::array("", Schema::array("", Schema::number(""))),
        SessionOptions {
            max_depth: Some(2),
            ..Default::default()
        },
    );
    let update = session.feed("[[[1]]]");
    let error = update.state.error.clone().unwrap();
    assert_eq!(error.message, "maximum nesting depth of 2 exceeded");
    assert_eq!(update.state.nodes.len(), 2);
}

#[rstest]
#[case::shallow(DEFAULT_MAX_DEPTH, None)]
#[case::one_too_deep(DEFAULT_MAX_DEPTH + 1, Some(DEFAULT_MAX_DEPTH))]
#[case::ten_thousand(10_000, Some(DEFAULT_MAX_DEPTH))]
fn deep_nesting_stops_at_the_default_limit(#[case] depth: usize, #[case] nodes: Option<usize>) {
    let doc = "[".repeat(depth) + &"]".repeat(depth);
    let mut session = Session::new(Schema::null(""));
    let update = session.feed(&doc);

    match nodes {
        None => {
            assert_eq!(update.state.error, None);
            assert_eq!(update.state.nodes.len(), depth);
            assert!(update.state.root().unwrap().closed);
        }
        Some(nodes) => {
            let error = update.state.error.clone().unwrap();
            assert_eq!(
                error.message,
                alloc::format!("maximum nesting depth of {DEFAULT_MAX_DEPTH} exceeded")
            );
            assert_eq!(update.state.nodes.len(), nodes);
        }
    }
}
