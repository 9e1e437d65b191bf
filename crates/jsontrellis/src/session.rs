//! Parser session: owns the parser state across chunks.
//!
//! A [`Session`] ties the [`Scanner`], the [`AstBuilder`] and the resolver
//! together. Each call to [`Session::feed`] scans only text it has not seen,
//! grows the node arena in place and hands back an [`Update`] describing the
//! new state, the resolved value and the ids of the nodes that changed.
//!
//! Syntax errors never escape a session. They are recorded in
//! [`ParserState::error`] and the session stops mutating the tree.
//!
//! # Examples
//!
//! ```rust
//! use jsontrellis::{Schema, Session, Value};
//!
//! let schema = Schema::object(
//!     "Reply",
//!     [("response", Schema::string("Text to show").streaming())],
//! )
//! .streaming();
//! let mut session = Session::new(schema);
//!
//! let update = session.feed(r#"{"response":"Hel"#);
//! assert_eq!(
//!     update.value.as_ref().and_then(|v| v.get("response")),
//!     Some(&Value::from("Hel"))
//! );
//! assert!(!update.state.is_complete);
//!
//! let update = session.feed(r#"{"response":"Hello"}"#);
//! assert!(update.state.is_complete);
//! ```
use alloc::{string::String, vec::Vec};

use crate::{
    builder::AstBuilder,
    error::ParseError,
    node::NodeId,
    options::{FeedMode, SessionOptions},
    resolve::resolve_root,
    scanner::Scanner,
    schema::Schema,
    state::ParserState,
    value::Value,
};

/// What a call to [`Session::feed`] or [`Session::finish`] produced.
#[derive(Debug)]
pub struct Update<'a> {
    pub state: &'a ParserState,
    /// The root resolved against the session schema.
    pub value: Option<Value>,
    /// Nodes created or mutated by this call, ascending.
    pub changed: Vec<NodeId>,
    /// The session was reset by this call and ids from earlier updates no
    /// longer name the same nodes.
    pub restarted: bool,
}

/// An incremental parse of one JSON document against one schema.
#[derive(Debug)]
pub struct Session {
    schema: Schema,
    options: SessionOptions,
    scanner: Scanner,
    builder: AstBuilder,
    /// Bytes of the document accepted so far in [`FeedMode::Cumulative`].
    consumed: usize,
    /// The last few characters of that text, compared against each new
    /// document to detect a rewind.
    frontier: String,
}

/// Bytes of consumed text kept to recognise a document that was rewritten.
const FRONTIER_BYTES: usize = 64;

/// The last `max` bytes of `text`, rounded to a char boundary.
fn tail(text: &str, max: usize) -> &str {
    let mut start = text.len().saturating_sub(max);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

impl Session {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self::with_options(schema, SessionOptions::default())
    }

    #[must_use]
    pub fn with_options(schema: Schema, options: SessionOptions) -> Self {
        Self {
            schema,
            options,
            scanner: Scanner::new(&options),
            builder: AstBuilder::new(),
            consumed: 0,
            frontier: String::new(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self) -> &ParserState {
        self.builder.state()
    }

    /// The root resolved against the session schema.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        resolve_root(&self.schema, self.state())
    }

    /// Feeds the next chunk of the document.
    ///
    /// In [`FeedMode::Cumulative`] `chunk` is the whole document received so
    /// far; in [`FeedMode::Delta`] it is only the newly arrived text.
    pub fn feed(&mut self, chunk: &str) -> Update<'_> {
        let mut restarted = false;
        let delta = match self.options.feed_mode {
            FeedMode::Delta => chunk,
            FeedMode::Cumulative => {
                if !self.extends_consumed(chunk) {
                    tracing::debug!(
                        consumed = self.consumed,
                        received = chunk.len(),
                        "document does not extend consumed text, restarting"
                    );
                    self.reset();
                    restarted = true;
                }
                let delta = &chunk[self.consumed..];
                self.consumed = chunk.len();
                self.frontier.clear();
                self.frontier.push_str(tail(chunk, FRONTIER_BYTES));
                delta
            }
        };

        if !delta.is_empty() {
            let result = self.scanner.scan(delta, &mut self.builder);
            self.record(result);
            tracing::trace!(
                chunk_len = delta.len(),
                index = self.scanner.index(),
                nodes = self.state().nodes.len(),
                "fed chunk"
            );
        }

        self.update(restarted)
    }

    /// Marks the end of input.
    ///
    /// A root number still being read is closed. An empty or unterminated
    /// document records an "unexpected end of input" error.
    pub fn finish(&mut self) -> Update<'_> {
        let result = self.scanner.finish(&mut self.builder);
        self.record(result);
        tracing::debug!(
            index = self.scanner.index(),
            complete = self.scanner.is_at_end(),
            "finished input"
        );
        self.update(false)
    }

    /// Discards all parsed state, keeping the schema and options.
    pub fn reset(&mut self) {
        tracing::debug!(nodes = self.state().nodes.len(), "resetting session");
        self.scanner = Scanner::new(&self.options);
        self.builder = AstBuilder::new();
        self.consumed = 0;
        self.frontier.clear();
    }

    /// Whether `chunk` continues the document consumed so far. Only the
    /// frontier is compared.
    fn extends_consumed(&self, chunk: &str) -> bool {
        chunk.len() >= self.consumed
            && chunk.is_char_boundary(self.consumed)
            && chunk[..self.consumed].ends_with(self.frontier.as_str())
    }

    fn record(&mut self, result: Result<(), ParseError>) {
        let index = self.scanner.index();
        let state = self.builder.state_mut();
        state.index = index;
        if let Err(err) = result {
            tracing::warn!(%err, "syntax error");
            state.error.get_or_insert(err);
        }
    }

    fn update(&mut self, restarted: bool) -> Update<'_> {
        let value = resolve_root(&self.schema, self.builder.state());
        let is_complete = self.builder.state().root().is_some_and(|root| root.closed)
            && value
                .as_ref()
                .is_some_and(|value| self.schema.is_satisfied_by(value));

        self.builder.state_mut().is_complete = is_complete;
        let changed = self.builder.take_changed();

        Update {
            state: self.builder.state(),
            value,
            changed,
            restarted,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec, vec::Vec};

    use super::Session;
    use crate::{
        node::NodeId,
        options::{FeedMode, SessionOptions},
        schema::Schema,
        value::Value,
    };

    fn reply_schema() -> Schema {
        Schema::object(
            "Reply",
            [
                ("response", Schema::string("Text").streaming()),
                (
                    "followUps",
                    Schema::array("Questions", Schema::string("Question")).optional(),
                ),
            ],
        )
        .streaming()
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
    }

    #[test]
    fn same_document_twice_is_a_no_op() {
        let mut session = Session::new(reply_schema());
        let first = session.feed(r#"{"response":"Hi"#).state.clone();
        let update = session.feed(r#"{"response":"Hi"#);
        assert!(update.changed.is_empty());
        assert_eq!(update.state, &first);
    }

    #[test]
    fn cumulative_scans_only_the_suffix() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"Hi"#);
        let update = session.feed(r#"{"response":"Hi there"#);
        assert_eq!(update.changed, vec![NodeId::new(1)]);
        assert_eq!(update.state.nodes[1].buffer, "Hi there");
        assert_eq!(update.state.index, 21);
        assert!(!update.restarted);
    }

    #[test]
    fn delta_mode_appends() {
        let options = SessionOptions {
            feed_mode: FeedMode::Delta,
            ..Default::default()
        };
        let mut session = Session::with_options(reply_schema(), options);
        session.feed(r#"{"response":"Hi"#);
        let update = session.feed(" there\"}");
        assert!(update.state.is_complete);
        assert_eq!(
            update.value.as_ref().and_then(|v| v.get("response")),
            Some(&Value::from("Hi there"))
        );
    }

    #[test]
    fn rewinding_restarts_the_parse() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"Hello"}"#);
        let update = session.feed(r#"{"resp"#);
        assert_eq!(update.state.nodes.len(), 1);
        assert_eq!(update.state.next_id, 1);
        assert_eq!(update.changed, vec![NodeId::new(0)]);
        assert!(!update.state.is_complete);
        assert_eq!(update.state.index, 6);
        assert!(update.restarted);
    }

    #[test]
    fn rewriting_the_frontier_restarts_the_parse() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"Hi"#);
        let update = session.feed(r#"{"response":"Ho there"#);
        assert_eq!(update.state.nodes.len(), 2);
        assert_eq!(update.state.nodes[1].buffer, "Ho there");
        assert_eq!(update.changed, vec![NodeId::new(0), NodeId::new(1)]);
        assert_eq!(update.state.index, 21);
        assert!(update.restarted);
    }

    #[test]
    fn consumed_text_ending_inside_a_char_restarts_the_parse() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"ab"#);
        let update = session.feed("{\"response\":\"a\u{e9}");
        assert_eq!(update.state.nodes[1].buffer, "a\u{e9}");
        assert_eq!(update.state.index, 15);
        assert!(update.restarted);
    }

    #[test]
    fn errors_are_recorded_not_returned() {
        let mut session = Session::new(reply_schema());
        let update = session.feed(r#"{"response" "x"}"#);
        let err = update.state.error.clone().unwrap();
        assert_eq!(err.message, "invalid character '\"'");
        assert_eq!((err.line, err.column), (1, 12));

        let nodes = session.state().nodes.clone();
        let update = session.feed(r#"{"response" "x"}  {"more": 1}"#);
        assert_eq!(update.state.nodes, nodes);
        assert!(update.changed.is_empty());
        assert_eq!(update.state.error, Some(err));
    }

    #[test]
    fn optional_fields_do_not_block_completion() {
        let mut session = Session::new(reply_schema());
        assert!(session.feed(r#"{"response":"ok"}"#).state.is_complete);

        let mut session = Session::new(reply_schema());
        let update = session.feed(r#"{"followUps":["a"]}"#);
        assert!(update.state.root().unwrap().closed);
        assert!(!update.state.is_complete);
    }

    #[test]
    fn finish_closes_root_number() {
        let mut session = Session::new(Schema::number("Count"));
        assert_eq!(session.feed("42").value, None);
        let update = session.finish();
        assert_eq!(update.value, Some(Value::Number(42.0)));
        assert!(update.state.is_complete);
        assert!(update.state.error.is_none());
    }

    #[test]
    fn finish_on_truncated_document_records_error() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"Hi"#);
        let update = session.finish();
        let err = update.state.error.clone().unwrap();
        assert_eq!(err.to_string(), "unexpected end of input at 1:15");
        assert_eq!(
            update.value.as_ref().and_then(|v| v.get("response")),
            Some(&Value::from("Hi"))
        );
    }

    #[test]
    fn reset_keeps_schema() {
        let mut session = Session::new(reply_schema());
        session.feed(r#"{"response":"#);
        session.reset();
        assert!(session.state().nodes.is_empty());
        assert_eq!(session.schema(), &reply_schema());
        let ids: Vec<_> = session
            .feed(r#"["#)
            .changed
            .iter()
            .map(|id| id.get())
            .collect();
        assert_eq!(ids, [0]);
    }
}
