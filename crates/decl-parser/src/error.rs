//! Error types for tokenizing, parsing and normalizing a single file.

use decl_core::{Position, Span};

/// What went wrong while scanning characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated character literal")]
    UnterminatedChar,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unrecognized character {0:?}")]
    UnexpectedChar(char),
}

/// A malformed token, with the byte offset and line/column where it starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lex error at {position} (byte {}): {kind}", .position.offset)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

/// Errors that abort processing of the current file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Grammar recognized as outside the supported subset (templates,
    /// macros, operator overloading, multiple inheritance, ...).
    #[error("Unsupported construct at {span}: {construct}")]
    UnsupportedConstruct { construct: String, span: Span },

    /// Malformed declaration inside the supported subset.
    #[error("Unexpected token at {span}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    /// A parsed declaration cannot be mapped deterministically onto the
    /// symbol model.
    #[error("Normalization error at {span}: {message}")]
    Normalization { message: String, span: Span },
}

impl ParserError {
    pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
            span,
        }
    }

    pub fn normalization(message: impl Into<String>, span: Span) -> Self {
        Self::Normalization {
            message: message.into(),
            span,
        }
    }

    /// Where the error starts.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Lex(err) => err.position,
            Self::UnsupportedConstruct { span, .. }
            | Self::UnexpectedToken { span, .. }
            | Self::Normalization { span, .. } => span.start,
        }
    }
}

/// A per-file failure, attributed to the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {error}")]
pub struct FileError {
    pub path: String,
    #[source]
    pub error: ParserError,
}
