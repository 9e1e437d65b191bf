#![no_main]
//! Differential fuzzing of `jsontrellis::Session`.
//!
//! Every input is fed twice, once as cumulative prefixes and once as deltas,
//! cut at the same arbitrary points. Both sessions must end in the same state.
//! Whenever `serde_json` accepts the text, the session must accept it too and
//! its root must decode to the same value.

use arbitrary::Arbitrary;
use jsontrellis::{FeedMode, Map, Schema, Session, SessionOptions, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    splits: Vec<u8>,
    allow_unicode_whitespace: bool,
}

fn session(feed_mode: FeedMode, allow_unicode_whitespace: bool) -> Session {
    Session::with_options(
        Schema::null(""),
        SessionOptions {
            feed_mode,
            allow_unicode_whitespace,
            ..Default::default()
        },
    )
}

fn from_serde(value: &serde_json::Value) -> Option<Value> {
    Some(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64()?),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(items.iter().map(from_serde).collect::<Option<_>>()?)
        }
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Some((k.clone(), from_serde(v)?)))
                .collect::<Option<Map>>()?,
        ),
    })
}

fuzz_target!(|input: Input| {
    let text = input.text.as_str();

    let mut cumulative = session(FeedMode::Cumulative, input.allow_unicode_whitespace);
    let mut delta = session(FeedMode::Delta, input.allow_unicode_whitespace);

    let mut start = 0;
    for split in input.splits {
        let Some(len) = text[start..].char_indices().nth(usize::from(split)).map(|(i, _)| i) else {
            break;
        };
        let end = start + len;
        cumulative.feed(&text[..end]);
        delta.feed(&text[start..end]);
        start = end;
    }
    cumulative.feed(text);
    delta.feed(&text[start..]);

    let cumulative = cumulative.finish().state.clone();
    let delta = delta.finish().state.clone();
    assert_eq!(cumulative, delta);

    if input.allow_unicode_whitespace {
        return;
    }
    let Ok(reference) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };
    let Some(expected) = from_serde(&reference) else {
        return;
    };
    assert_eq!(cumulative.error, None, "{text:?}");
    assert_eq!(
        cumulative.root().and_then(|root| root.resolved_value.as_ref()),
        Some(&expected),
        "{text:?}"
    );
});
