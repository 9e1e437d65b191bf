//! Decoding of `\uXXXX` escape sequences, including UTF-16 surrogate pairs.
//!
//! [`UnicodeEscapeBuffer`] accumulates the four hexadecimal digits of one
//! escape. A high surrogate is parked until the following escape supplies the
//! low half, so a string truncated between the two halves simply waits for
//! more input.
use crate::error::SyntaxError;

/// Outcome of feeding one hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeStep {
    /// Fewer than four digits so far.
    NeedMore,
    /// A high surrogate was decoded; a `\u` low surrogate must follow.
    NeedLowSurrogate,
    /// A complete scalar value.
    Char(char),
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    digits: u32,
    len: u8,
    high_surrogate: Option<u32>,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new four-digit escape, keeping any parked high surrogate.
    pub fn reset(&mut self) {
        self.digits = 0;
        self.len = 0;
    }

    /// Whether a high surrogate is waiting for its low half.
    #[cfg(test)]
    pub fn awaiting_low_surrogate(&self) -> bool {
        self.high_surrogate.is_some()
    }

    pub fn feed(&mut self, c: char) -> Result<EscapeStep, SyntaxError> {
        let digit = c
            .to_digit(16)
            .ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;
        self.digits = (self.digits << 4) | digit;
        self.len += 1;

        if self.len < 4 {
            return Ok(EscapeStep::NeedMore);
        }

        let code = self.digits;
        self.reset();

        match (self.high_surrogate.take(), code) {
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(code);
                Ok(EscapeStep::NeedLowSurrogate)
            }
            (None, 0xDC00..=0xDFFF) => Err(SyntaxError::InvalidUnicodeEscapeSequence(code)),
            (None, code) => char::from_u32(code)
                .map(EscapeStep::Char)
                .ok_or(SyntaxError::InvalidUnicodeEscapeSequence(code)),
            (Some(high), 0xDC00..=0xDFFF) => {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                char::from_u32(combined)
                    .map(EscapeStep::Char)
                    .ok_or(SyntaxError::InvalidUnicodeEscapeSequence(combined))
            }
            (Some(_), code) => Err(SyntaxError::InvalidUnicodeEscapeSequence(code)),
        }
    }
}
