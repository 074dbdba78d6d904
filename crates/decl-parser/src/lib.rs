//! # decl-parser
//!
//! Per-file front end of declscope: C and C++ source text in, unified
//! symbols out.
//!
//! - **Lexer**: dialect-aware tokens with byte offset, line and column
//! - **Parser**: recursive descent over the declaration-level subset of
//!   both dialects, skipping bodies and initializers
//! - **Normalizer**: maps the declaration tree onto `decl_core::Symbol`s
//!
//! Each file is processed independently; nothing here touches disk or
//! shares state across files.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod normalizer;
pub mod parser;
pub mod token;

pub use error::{FileError, LexError, LexErrorKind, ParserError};
pub use lexer::{Lexer, tokenize};
pub use normalizer::{FileSymbols, normalize};
pub use parser::parse_source;
pub use token::{Token, TokenKind};

use decl_core::SourceFile;

/// Parse and normalize one file.
///
/// # Errors
/// Returns the file's first lexing, parsing or normalization failure,
/// attributed to its path.
pub fn analyze_file(file: &SourceFile) -> Result<FileSymbols, FileError> {
    let attribute = |error: ParserError| FileError {
        path: file.path.clone(),
        error,
    };
    let unit = parse_source(&file.path, &file.text, file.dialect).map_err(attribute)?;
    let symbols = normalize(&unit).map_err(attribute)?;

    tracing::debug!(
        path = %file.path,
        dialect = %file.dialect,
        decls = unit.decls.len(),
        symbols = symbols.symbols.len(),
        "analyzed file"
    );
    Ok(symbols)
}
