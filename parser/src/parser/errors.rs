use thiserror::Error;

use crate::Span;

/// An error occurred while parsing or compiling a pattern.
///
/// Besides the [`ErrorKind`], the error carries the offending pattern and
/// the location inside the pattern where the problem was detected.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("error parsing regexp: {kind}: `{pattern}`")]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    span: Span,
}

impl Error {
    /// Creates a new error of the given kind for `pattern`.
    pub fn new(kind: ErrorKind, pattern: &str, span: Span) -> Self {
        Self { kind, pattern: pattern.to_owned(), span }
    }

    /// Returns the kind of error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the pattern that caused the error.
    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Location inside the pattern where the error was detected.
    #[inline]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// Describes the kind of failure while parsing or compiling a pattern.
#[derive(Error, Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The pattern is the empty string.
    #[error("regex pattern is empty")]
    EmptyPattern,

    /// A character that is not valid at that position, or the pattern
    /// ended prematurely.
    #[error("unexpected symbol")]
    UnexpectedSymbol,

    /// Malformed, empty or unterminated character class, or unknown
    /// Unicode property name.
    #[error("invalid character class")]
    InvalidCharacterClass,

    /// Unknown zero-width assertion.
    #[error("invalid assertion")]
    InvalidAssertion,

    /// A quantifier with nothing to repeat, like `*a` or `a**`.
    #[error("invalid repetition operator")]
    InvalidRepeatOperator,

    /// Non-numeric or out of range repetition bounds, or an upper bound
    /// lower than the lower bound.
    #[error("invalid repeat count")]
    InvalidRepeatSize,

    /// A class range with `\d`, `\w`, `\p{..}` or similar as one of
    /// its endpoints.
    #[error("cannot create a range with shorthand escape sequences")]
    RangeWithShorthandEscape,

    /// A class range where the upper endpoint is lower than the lower one.
    #[error("invalid character class range")]
    InvalidClassRange,

    /// Unknown escape sequence, or a `\x{..}` escape that is not a
    /// Unicode scalar value.
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,

    /// Groups are nested deeper than the parser allows.
    #[error("pattern nesting too deep")]
    NestingTooDeep,
}
