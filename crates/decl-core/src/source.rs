//! Source files and positions within them.

use serde::{Deserialize, Serialize};

use crate::Dialect;

/// An in-memory source file handed to the pipeline.
///
/// The core engine never reads from disk; drivers and the harness build
/// these from whatever storage they own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub dialect: Dialect,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, dialect: Dialect, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dialect,
            text: text.into(),
        }
    }

    /// Build a source file, selecting the dialect from the path extension.
    pub fn detect(path: impl Into<String>, text: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let dialect = Dialect::from_path(&path)?;
        Some(Self::new(path, dialect, text))
    }
}

/// A point in source text. Lines and columns are 1-based, columns count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open range of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: if other.start.offset < self.start.offset { other.start } else { self.start },
            end: if other.end.offset > self.end.offset { other.end } else { self.end },
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// Where a symbol was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, position: Position) -> Self {
        Self {
            path: path.into(),
            line: position.line,
            column: position.column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_covers_both_ends() {
        let a = Span::new(
            Position { offset: 4, line: 1, column: 5 },
            Position { offset: 8, line: 1, column: 9 },
        );
        let b = Span::new(
            Position { offset: 10, line: 2, column: 1 },
            Position { offset: 12, line: 2, column: 3 },
        );
        let joined = a.to(b);
        assert_eq!(joined.start.offset, 4);
        assert_eq!(joined.end.offset, 12);
        assert_eq!(b.to(a), joined);
    }

    #[test]
    fn detect_picks_dialect_from_extension() {
        let file = SourceFile::detect("types.hpp", "namespace a {}").expect("cpp header");
        assert_eq!(file.dialect, Dialect::Cpp);
        assert!(SourceFile::detect("notes.txt", "").is_none());
    }

    #[test]
    fn location_display_is_path_line_column() {
        let location = SourceLocation::new("main.c", Position { offset: 0, line: 3, column: 7 });
        assert_eq!(location.to_string(), "main.c:3:7");
    }
}
