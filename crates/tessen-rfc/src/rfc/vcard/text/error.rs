//! Text syntax error types.

use std::fmt;

pub type ParseResult<T> = Result<T, ParseError>;

/// A content line, or a whole document, that the text lexer rejected.
///
/// Line-level errors never reach the caller as `Err`: the reader records them
/// as document warnings and skips the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line number after unfolding.
    pub line: usize,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    /// The line has no `:` outside a quoted parameter value.
    #[must_use]
    pub fn missing_separator(line: usize) -> Self {
        Self::new(
            ParseErrorKind::MissingSeparator,
            line,
            "no ':' between the property name and its value",
        )
    }

    #[must_use]
    pub fn invalid_name(line: usize, name: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidPropertyName,
            line,
            format!("\"{name}\" is not a property name"),
        )
    }

    #[must_use]
    pub fn invalid_parameter(line: usize, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::InvalidParameter, line, message)
    }

    /// The document holds no `BEGIN:VCARD`.
    #[must_use]
    pub fn no_card() -> Self {
        Self::new(ParseErrorKind::NoCard, 1, "no BEGIN:VCARD in document")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingSeparator,
    InvalidPropertyName,
    InvalidParameter,
    NoCard,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSeparator => "malformed content line",
            Self::InvalidPropertyName => "invalid property name",
            Self::InvalidParameter => "invalid parameter",
            Self::NoCard => "no vCard",
        })
    }
}
