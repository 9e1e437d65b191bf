use alloc::string::{String, ToString};

use thiserror::Error;

/// A structured parse error recorded in [`ParserState::error`].
///
/// `line` and `column` are 1-based and point at the last character the
/// scanner accepted before the document diverged from valid JSON.
///
/// [`ParserState::error`]: crate::ParserState::error
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(source: &SyntaxError, line: usize, column: usize) -> Self {
        Self {
            message: source.to_string(),
            line,
            column,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid unicode escape sequence at character '{0}'")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("maximum nesting depth of {0} exceeded")]
    DepthLimitExceeded(usize),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
