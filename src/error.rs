//! Parse error types.
//!
//! A parse is all-or-nothing: the first error encountered is returned and the
//! parser abandons the rest of the input. Errors carry a [`ParseErrorKind`],
//! byte offsets into the original source, and a human-readable message.

use std::fmt;

use thiserror::Error;

use crate::span::Span;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A parse error with location and diagnostic information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {start}..{end}: {message}")]
pub struct ParseError {
    /// The category of error that occurred.
    pub kind: ParseErrorKind,
    /// Additional context describing what went wrong.
    pub message: String,
    /// Byte offset where the offending range begins.
    pub start: usize,
    /// Byte offset one past the end of the offending range.
    pub end: usize,
}

impl ParseError {
    /// Create a new parse error covering `span`.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            start: span.start,
            end: span.end,
        }
    }

    /// The source range this error covers.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// The category of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Generic syntax error: unknown token, a missing expected token,
    /// an unclosed string/char/comment, or an invalid number.
    UnexpectedToken,
    /// Missing, duplicated, or filename-mismatched `ScriptName`.
    ScriptName,
    /// A violated property rule (flags, initializers, full-property bodies).
    Property,
    /// Invalid, misplaced, or duplicate function flag.
    FunctionFlag,
    /// Invalid, misplaced, or duplicate event flag.
    EventFlag,
    /// Reached end of file while a block was still expecting its terminator.
    BlockStatement,
    /// Something other than a function or event inside a state body.
    StateStatement,
    /// Misuse of the `Parent` keyword.
    ParentMember,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseErrorKind::*;
        let msg = match self {
            UnexpectedToken => "unexpected token",
            ScriptName => "script name error",
            Property => "property error",
            FunctionFlag => "function flag error",
            EventFlag => "event flag error",
            BlockStatement => "unterminated block",
            StateStatement => "invalid state body",
            ParentMember => "invalid use of 'Parent'",
        };
        write!(f, "{}", msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedToken,
            Span::new(4, 7),
            "expected 'Function', found ')'",
        );
        let display = format!("{}", error);
        assert!(display.contains("unexpected token"));
        assert!(display.contains("4..7"));
        assert!(display.contains("expected 'Function'"));
    }

    #[test]
    fn error_span_round_trip() {
        let error = ParseError::new(ParseErrorKind::Property, Span::new(10, 12), "msg");
        assert_eq!(error.span(), Span::new(10, 12));
    }

    #[test]
    fn error_is_std_error() {
        let error = ParseError::new(ParseErrorKind::ScriptName, Span::new(0, 1), "test");
        let _: &dyn std::error::Error = &error;
    }
}
