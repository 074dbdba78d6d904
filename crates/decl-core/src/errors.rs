//! Cross-cutting error types for declscope.
//!
//! Stage-specific errors (`ParserError`, `TableError`, ...) live in their
//! respective crates. This module only covers failures of the shared model
//! itself, mostly textual conversions used by the golden listing format.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A symbol kind name did not match any known kind.
    #[error("Unknown symbol kind: {0}")]
    UnknownKind(String),

    /// A dialect name did not match `c` or `cpp`.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// A visibility keyword was not `public`, `protected` or `private`.
    #[error("Unknown visibility: {0}")]
    UnknownVisibility(String),
}
