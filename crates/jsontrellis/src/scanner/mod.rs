//! Scanner: incremental lexer and grammar state machine.
//!
//! The scanner classifies every input character exactly once and turns the
//! text into [`Token`]s delivered to a [`TokenSink`]. It keeps two pieces of
//! state between calls to [`Scanner::scan`]:
//!
//! - a *lex state* describing the token currently being read (inside a string,
//!   an escape sequence, a number, a literal), and
//! - a *parse state* plus a stack of open containers describing which tokens
//!   are allowed next.
//!
//! Truncation is never an error. A chunk that ends inside a string flushes the
//! decoded characters read so far as a `*Chars` token; a chunk that ends inside
//! an escape sequence, a literal or between the two halves of a surrogate pair
//! holds the partial token back until the next chunk completes it.
//!
//! # Examples
//!
//! ```rust
//! use jsontrellis::{Scanner, SessionOptions, Token};
//!
//! let mut scanner = Scanner::new(&SessionOptions::default());
//! let mut kinds = Vec::new();
//! scanner
//!     .scan(r#"{"a": [tr"#, &mut |token: Token<'_>| kinds.push(format!("{token:?}")))
//!     .unwrap();
//! assert_eq!(
//!     kinds,
//!     [
//!         "ObjectOpen",
//!         "KeyStart",
//!         "KeyChars(\"a\")",
//!         "KeyEnd",
//!         "Colon",
//!         "ArrayOpen",
//!     ]
//! );
//! ```
#![allow(clippy::enum_glob_use)]

use alloc::{string::String, vec::Vec};

use crate::{
    error::{ParseError, SyntaxError},
    escape_buffer::{EscapeStep, UnicodeEscapeBuffer},
    literal_buffer::{self, ExpectedLiteralBuffer},
    options::SessionOptions,
};


/// One of the three JSON literal names.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    /// The literal as it appears in JSON text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Literal::True => "true",
            Literal::False => "false",
            Literal::Null => "null",
        }
    }
}

/// A lexical event produced by the [`Scanner`].
///
/// String fragments are already unescaped. Number fragments are raw numeral
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    KeyStart,
    KeyChars(&'a str),
    KeyEnd,
    StringStart,
    StringChars(&'a str),
    StringEnd,
    NumberChars(&'a str),
    NumberEnd,
    Literal(Literal),
    Comma,
    Colon,
    /// Emitted by [`Scanner::finish`] once a complete document was read.
    EndOfInput,
}

/// Receiver of the scanner's tokens.
pub trait TokenSink {
    fn token(&mut self, token: Token<'_>);
}

impl<F> TokenSink for F
where
    F: FnMut(Token<'_>),
{
    fn token(&mut self, token: Token<'_>) {
        self(token);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    AfterPropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterArrayValue,
    End,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Between tokens; the parse state decides what may come next.
    Structural,
    InString,
    StringEscape,
    UnicodeEscape,
    /// A high surrogate was decoded, expecting the `\` of its low half.
    SurrogateBackslash,
    /// Expecting the `u` of the low surrogate escape.
    SurrogateU,
    InLiteral,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

impl LexState {
    fn in_string(self) -> bool {
        use LexState::*;
        matches!(
            self,
            InString | StringEscape | UnicodeEscape | SurrogateBackslash | SurrogateU
        )
    }

    fn in_number(self) -> bool {
        use LexState::*;
        matches!(
            self,
            Sign | Zero
                | DecimalInteger
                | DecimalPoint
                | DecimalFraction
                | DecimalExponent
                | DecimalExponentSign
                | DecimalExponentInteger
        )
    }

    /// Whether the numeral read so far is a complete JSON number.
    fn number_can_end(self) -> bool {
        use LexState::*;
        matches!(
            self,
            Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringRole {
    Key,
    Value,
}

/// What the driver loop should do with the character it just stepped.
enum Flow {
    Consumed,
    /// The character terminated a number and must be stepped again.
    Reprocess,
}

/// Incremental JSON scanner.
///
/// Feed text with [`scan`](Self::scan) as it arrives and call
/// [`finish`](Self::finish) once the input is known to be complete.
#[derive(Debug)]
pub struct Scanner {
    parse_state: ParseState,
    lex_state: LexState,
    containers: Vec<Container>,
    string_role: StringRole,

    /// Decoded string characters or numeral text not yet handed to the sink.
    fragment: String,
    unicode_escape: UnicodeEscapeBuffer,
    expected_literal: ExpectedLiteralBuffer,

    /// Characters consumed so far.
    index: usize,
    line: usize,
    /// Characters consumed on the current line.
    column: usize,

    allow_unicode_whitespace: bool,
    max_depth: Option<usize>,

    #[cfg(any(test, feature = "fuzzing"))]
    panic_on_error: bool,
}

impl Scanner {
    #[must_use]
    pub fn new(options: &SessionOptions) -> Self {
        Self {
            parse_state: ParseState::Start,
            lex_state: LexState::Structural,
            containers: Vec::with_capacity(16),
            string_role: StringRole::Value,
            fragment: String::new(),
            unicode_escape: UnicodeEscapeBuffer::new(),
            expected_literal: ExpectedLiteralBuffer::none(),
            index: 0,
            line: 1,
            column: 0,
            allow_unicode_whitespace: options.allow_unicode_whitespace,
            max_depth: options.max_depth,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: options.panic_on_error,
        }
    }

    /// Number of characters consumed so far.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether a complete root value has been read.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.parse_state == ParseState::End
    }

    /// Whether the scanner stopped on a syntax error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.parse_state == ParseState::Error
    }

    /// Scans the next chunk of text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text cannot continue a valid JSON
    /// document. Once failed, the scanner ignores further input.
    pub fn scan<S>(&mut self, text: &str, sink: &mut S) -> Result<(), ParseError>
    where
        S: TokenSink + ?Sized,
    {
        if self.is_failed() {
            return Ok(());
        }

        for c in text.chars() {
            loop {
                match self.step(c, sink) {
                    Ok(Flow::Consumed) => break,
                    Ok(Flow::Reprocess) => {}
                    Err(err) => return Err(self.fail(&err, sink)),
                }
            }
            self.advance(c);
        }

        self.flush_fragment(sink);
        Ok(())
    }

    /// Marks the end of input.
    ///
    /// A root number still being read is closed. Emits
    /// [`Token::EndOfInput`] when the document is complete.
    ///
    /// # Errors
    ///
    /// Returns an "unexpected end of input" [`ParseError`] when the document
    /// is empty or unterminated.
    pub fn finish<S>(&mut self, sink: &mut S) -> Result<(), ParseError>
    where
        S: TokenSink + ?Sized,
    {
        if self.is_failed() {
            return Ok(());
        }

        if self.lex_state.number_can_end() {
            self.end_number(sink);
        }

        if self.lex_state == LexState::Structural && self.parse_state == ParseState::End {
            sink.token(Token::EndOfInput);
            Ok(())
        } else {
            Err(self.fail(&SyntaxError::UnexpectedEndOfInput, sink))
        }
    }

    fn advance(&mut self, c: char) {
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    fn fail<S>(&mut self, err: &SyntaxError, sink: &mut S) -> ParseError
    where
        S: TokenSink + ?Sized,
    {
        self.flush_fragment(sink);
        self.parse_state = ParseState::Error;
        let err = ParseError::new(err, self.line, self.column.max(1));
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(!self.panic_on_error, "{err}");
        err
    }

    fn flush_fragment<S>(&mut self, sink: &mut S)
    where
        S: TokenSink + ?Sized,
    {
        if self.fragment.is_empty() {
            return;
        }
        if self.lex_state.in_string() {
            sink.token(match self.string_role {
                StringRole::Key => Token::KeyChars(&self.fragment),
                StringRole::Value => Token::StringChars(&self.fragment),
            });
        } else if self.lex_state.in_number() {
            sink.token(Token::NumberChars(&self.fragment));
        }
        self.fragment.clear();
    }

    fn is_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r')
            || (self.allow_unicode_whitespace && (c.is_whitespace() || c == '\u{FEFF}'))
    }

    /// Parse state to enter after a value completes.
    fn after_value(&self) -> ParseState {
        match self.containers.last() {
            None => ParseState::End,
            Some(Container::Array) => ParseState::AfterArrayValue,
            Some(Container::Object) => ParseState::AfterPropertyValue,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn step<S>(&mut self, c: char, sink: &mut S) -> Result<Flow, SyntaxError>
    where
        S: TokenSink + ?Sized,
    {
        use LexState::*;

        match self.lex_state {
            Structural => self.step_structural(c, sink),

            // -------------------------- STRING -----------------------------
            InString => match c {
                '"' => {
                    self.flush_fragment(sink);
                    self.lex_state = Structural;
                    match self.string_role {
                        StringRole::Key => {
                            sink.token(Token::KeyEnd);
                            self.parse_state = ParseState::AfterPropertyName;
                        }
                        StringRole::Value => {
                            sink.token(Token::StringEnd);
                            self.parse_state = self.after_value();
                        }
                    }
                    Ok(Flow::Consumed)
                }
                '\\' => {
                    self.lex_state = StringEscape;
                    Ok(Flow::Consumed)
                }
                // JSON allows 0x20 .. 0x10FFFF unescaped.
                '\0'..='\x1F' => Err(SyntaxError::InvalidCharacter(c)),
                _ => {
                    self.fragment.push(c);
                    Ok(Flow::Consumed)
                }
            },

            StringEscape => {
                let decoded = match c {
                    '"' | '\\' | '/' => c,
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.unicode_escape.reset();
                        self.lex_state = UnicodeEscape;
                        return Ok(Flow::Consumed);
                    }
                    _ => return Err(SyntaxError::InvalidCharacter(c)),
                };
                self.fragment.push(decoded);
                self.lex_state = InString;
                Ok(Flow::Consumed)
            }

            UnicodeEscape => {
                match self.unicode_escape.feed(c)? {
                    EscapeStep::NeedMore => {}
                    EscapeStep::NeedLowSurrogate => self.lex_state = SurrogateBackslash,
                    EscapeStep::Char(decoded) => {
                        self.fragment.push(decoded);
                        self.lex_state = InString;
                    }
                }
                Ok(Flow::Consumed)
            }

            SurrogateBackslash => match c {
                '\\' => {
                    self.lex_state = SurrogateU;
                    Ok(Flow::Consumed)
                }
                _ => Err(SyntaxError::InvalidUnicodeEscapeChar(c)),
            },

            SurrogateU => match c {
                'u' => {
                    self.unicode_escape.reset();
                    self.lex_state = UnicodeEscape;
                    Ok(Flow::Consumed)
                }
                _ => Err(SyntaxError::InvalidUnicodeEscapeChar(c)),
            },

            // -------------------------- LITERALS -----------------------------
            InLiteral => match self.expected_literal.step(c) {
                literal_buffer::Step::NeedMore => Ok(Flow::Consumed),
                literal_buffer::Step::Done(literal) => {
                    sink.token(Token::Literal(literal));
                    self.lex_state = Structural;
                    self.parse_state = self.after_value();
                    Ok(Flow::Consumed)
                }
                literal_buffer::Step::Reject => Err(SyntaxError::InvalidCharacter(c)),
            },

            // -------------------------- NUMBERS -----------------------------
            Sign => match c {
                '0' => self.push_number_char(c, Zero),
                '1'..='9' => self.push_number_char(c, DecimalInteger),
                _ => Err(SyntaxError::InvalidCharacter(c)),
            },

            Zero => match c {
                '.' => self.push_number_char(c, DecimalPoint),
                'e' | 'E' => self.push_number_char(c, DecimalExponent),
                _ => Ok(self.end_number(sink)),
            },

            DecimalInteger => match c {
                '0'..='9' => self.push_number_char(c, DecimalInteger),
                '.' => self.push_number_char(c, DecimalPoint),
                'e' | 'E' => self.push_number_char(c, DecimalExponent),
                _ => Ok(self.end_number(sink)),
            },

            DecimalPoint => match c {
                '0'..='9' => self.push_number_char(c, DecimalFraction),
                _ => Err(SyntaxError::InvalidCharacter(c)),
            },

            DecimalFraction => match c {
                '0'..='9' => self.push_number_char(c, DecimalFraction),
                'e' | 'E' => self.push_number_char(c, DecimalExponent),
                _ => Ok(self.end_number(sink)),
            },

            DecimalExponent => match c {
                '+' | '-' => self.push_number_char(c, DecimalExponentSign),
                '0'..='9' => self.push_number_char(c, DecimalExponentInteger),
                _ => Err(SyntaxError::InvalidCharacter(c)),
            },

            DecimalExponentSign | DecimalExponentInteger => match c {
                '0'..='9' => self.push_number_char(c, DecimalExponentInteger),
                _ if self.lex_state == DecimalExponentInteger => Ok(self.end_number(sink)),
                _ => Err(SyntaxError::InvalidCharacter(c)),
            },
        }
    }

    fn step_structural<S>(&mut self, c: char, sink: &mut S) -> Result<Flow, SyntaxError>
    where
        S: TokenSink + ?Sized,
    {
        use ParseState::*;

        if self.is_whitespace(c) {
            return Ok(Flow::Consumed);
        }

        match (self.parse_state, c) {
            (BeforeFirstArrayValue, ']') | (AfterArrayValue, ']') => {
                self.close_container(Container::Array, sink);
            }
            (BeforeFirstPropertyName | AfterPropertyValue, '}') => {
                self.close_container(Container::Object, sink);
            }
            (Start | BeforePropertyValue | BeforeFirstArrayValue | BeforeArrayValue, _) => {
                self.begin_value(c, sink)?;
            }
            (BeforeFirstPropertyName | BeforePropertyName, '"') => {
                sink.token(Token::KeyStart);
                self.string_role = StringRole::Key;
                self.lex_state = LexState::InString;
            }
            (AfterPropertyName, ':') => {
                sink.token(Token::Colon);
                self.parse_state = BeforePropertyValue;
            }
            (AfterPropertyValue, ',') => {
                sink.token(Token::Comma);
                self.parse_state = BeforePropertyName;
            }
            (AfterArrayValue, ',') => {
                sink.token(Token::Comma);
                self.parse_state = BeforeArrayValue;
            }
            _ => return Err(SyntaxError::InvalidCharacter(c)),
        }

        Ok(Flow::Consumed)
    }

    fn begin_value<S>(&mut self, c: char, sink: &mut S) -> Result<(), SyntaxError>
    where
        S: TokenSink + ?Sized,
    {
        match c {
            '{' | '[' => {
                if let Some(max_depth) = self.max_depth {
                    if self.containers.len() >= max_depth {
                        return Err(SyntaxError::DepthLimitExceeded(max_depth));
                    }
                }
                if c == '{' {
                    self.containers.push(Container::Object);
                    sink.token(Token::ObjectOpen);
                    self.parse_state = ParseState::BeforeFirstPropertyName;
                } else {
                    self.containers.push(Container::Array);
                    sink.token(Token::ArrayOpen);
                    self.parse_state = ParseState::BeforeFirstArrayValue;
                }
            }
            '"' => {
                sink.token(Token::StringStart);
                self.string_role = StringRole::Value;
                self.lex_state = LexState::InString;
            }
            'n' | 't' | 'f' => {
                self.expected_literal = ExpectedLiteralBuffer::new(c);
                self.lex_state = LexState::InLiteral;
            }
            '-' => {
                self.fragment.push(c);
                self.lex_state = LexState::Sign;
            }
            '0' => {
                self.fragment.push(c);
                self.lex_state = LexState::Zero;
            }
            '1'..='9' => {
                self.fragment.push(c);
                self.lex_state = LexState::DecimalInteger;
            }
            _ => return Err(SyntaxError::InvalidCharacter(c)),
        }
        Ok(())
    }

    fn push_number_char(&mut self, c: char, next: LexState) -> Result<Flow, SyntaxError> {
        self.fragment.push(c);
        self.lex_state = next;
        Ok(Flow::Consumed)
    }

    fn end_number<S>(&mut self, sink: &mut S) -> Flow
    where
        S: TokenSink + ?Sized,
    {
        self.flush_fragment(sink);
        sink.token(Token::NumberEnd);
        self.lex_state = LexState::Structural;
        self.parse_state = self.after_value();
        Flow::Reprocess
    }

    fn close_container<S>(&mut self, container: Container, sink: &mut S)
    where
        S: TokenSink + ?Sized,
    {
        self.containers.pop();
        sink.token(match container {
            Container::Object => Token::ObjectClose,
            Container::Array => Token::ArrayClose,
        });
        self.parse_state = self.after_value();
    }
}
