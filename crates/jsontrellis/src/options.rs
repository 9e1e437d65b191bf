/// How each call to [`Session::feed`] relates to the text fed before it.
///
/// [`Session::feed`]: crate::Session::feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedMode {
    /// Every call passes the whole document received so far.
    ///
    /// Only the suffix that extends the already consumed text is scanned, so
    /// feeding the same document twice is a no-op. A document that does not
    /// continue the consumed text (for example a shorter prefix when a
    /// caller scrubs backwards) resets the session and is parsed from
    /// scratch. Continuation is judged by length and by the last 64 bytes
    /// of the consumed text; an edit further back goes unnoticed.
    ///
    /// A reset restarts node ids at 0, so every [`NodeId`] handed out
    /// before it is invalid afterwards. [`Update::restarted`] reports it, and
    /// renderers keyed by id must drop their cache when it is set.
    ///
    /// [`NodeId`]: crate::NodeId
    /// [`Update::restarted`]: crate::Update::restarted
    #[default]
    Cumulative,
    /// Every call passes only the text that arrived since the previous call.
    Delta,
}

/// Nesting depth accepted unless [`SessionOptions::max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for a parser [`Session`].
///
/// # Examples
///
/// ```rust
/// use jsontrellis::{FeedMode, Schema, Session, SessionOptions};
///
/// let session = Session::with_options(
///     Schema::string("Reply").streaming(),
///     SessionOptions {
///         feed_mode: FeedMode::Delta,
///         ..Default::default()
///     },
/// );
/// assert!(session.state().root_id.is_none());
/// ```
///
/// [`Session`]: crate::Session
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// The chunk-feeding contract of [`Session::feed`].
    ///
    /// # Default
    ///
    /// [`FeedMode::Cumulative`]
    ///
    /// [`Session::feed`]: crate::Session::feed
    pub feed_mode: FeedMode,

    /// Whether to allow any Unicode whitespace between JSON tokens.
    ///
    /// By default only the four whitespace characters of RFC 8259 are
    /// skipped: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Maximum nesting depth of arrays and objects.
    ///
    /// Opening a container deeper than this records a syntax error. Closing
    /// a container copies its children's values, so `None` lets a deeply
    /// nested document exhaust the stack.
    ///
    /// # Default
    ///
    /// `Some(DEFAULT_MAX_DEPTH)`
    pub max_depth: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of recording them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            feed_mode: FeedMode::default(),
            allow_unicode_whitespace: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}
