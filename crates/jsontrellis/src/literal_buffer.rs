use crate::scanner::Literal;

/// What happened after feeding one more character into the literal matcher?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* it was the last byte of the literal.
    Done(Literal),
    /// Character did **not** match the expected byte.
    Reject,
}

/// `None` while no literal is in flight, otherwise the bytes still expected
/// and the literal they spell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], Literal)>);

impl ExpectedLiteralBuffer {
    pub fn none() -> Self {
        ExpectedLiteralBuffer(None)
    }

    /// Start matching after the first character (`n`, `t`, or `f`).
    pub fn new(first: char) -> Self {
        match first {
            'n' => ExpectedLiteralBuffer(Some((b"ull", Literal::Null))),
            't' => ExpectedLiteralBuffer(Some((b"rue", Literal::True))),
            'f' => ExpectedLiteralBuffer(Some((b"alse", Literal::False))),
            _ => ExpectedLiteralBuffer::none(),
        }
    }

    pub fn step(&mut self, c: char) -> Step {
        let Some((bytes, literal)) = self.0 else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((expected, rest)) if char::from(*expected) == c => {
                if rest.is_empty() {
                    self.0 = None;
                    Step::Done(literal)
                } else {
                    self.0 = Some((rest, literal));
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
