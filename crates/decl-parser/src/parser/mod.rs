//! Recursive-descent declaration parser for C and C++.
//!
//! One parser serves both dialects: shared C grammar lives in
//! `declarations`, C++-only forms (namespaces, classes with access labels,
//! `using` aliases, constructors) in `cpp`, and directive handling in
//! `preproc`. Function bodies, initializers and default arguments are
//! skipped by delimiter balancing; only declarations are modelled.

mod cpp;
mod declarations;
mod preproc;

#[cfg(test)]
mod tests;

use decl_core::{Dialect, Position, Span};

use crate::ast::{Decl, TranslationUnit};
use crate::error::ParserError;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Tokenize and parse a whole file into its declaration tree.
///
/// # Errors
/// Returns the first `LexError`, `UnsupportedConstruct` or malformed
/// declaration found. There is no partial recovery.
pub fn parse_source(
    path: &str,
    source: &str,
    dialect: Dialect,
) -> Result<TranslationUnit, ParserError> {
    let tokens = tokenize(source, dialect)?;
    let (tokens, includes) = preproc::strip_directives(tokens)?;
    let mut parser = Parser::new(tokens, dialect, end_of(source));
    let decls = parser.parse_translation_unit()?;

    Ok(TranslationUnit {
        path: path.to_string(),
        dialect,
        includes,
        decls,
    })
}

fn end_of(source: &str) -> Position {
    let mut end = Position::START;
    for c in source.chars() {
        end.offset += c.len_utf8();
        if c == '\n' {
            end.line += 1;
            end.column = 1;
        } else {
            end.column += 1;
        }
    }
    end
}

pub(crate) struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    dialect: Dialect,
    /// Enclosing namespace and class names.
    scope: Vec<String>,
    /// C gives struct definitions nested in a body file scope; they are
    /// emitted ahead of the declaration that contains them.
    hoisted: Vec<Decl>,
    eof: Span,
}

impl<'src> Parser<'src> {
    fn new(tokens: Vec<Token<'src>>, dialect: Dialect, end: Position) -> Self {
        Self {
            tokens,
            pos: 0,
            dialect,
            scope: Vec::new(),
            hoisted: Vec::new(),
            eof: Span::new(end, end),
        }
    }

    fn parse_translation_unit(&mut self) -> Result<Vec<Decl>, ParserError> {
        let mut decls = Vec::new();
        while !self.at_eof() {
            self.parse_external_decl(&mut decls)?;
        }
        Ok(decls)
    }

    // ── Cursor ─────────────────────────────────────────────────────

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).copied()
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    fn nth_is_punct(&self, n: usize, punct: &str) -> bool {
        self.peek_nth(n).is_some_and(|t| t.is_punct(punct))
    }

    fn at_identifier(&self) -> bool {
        self.peek().is_some_and(|t| t.is_identifier())
    }

    /// Span of the next token, or the end of input.
    fn current_span(&self) -> Span {
        self.peek().map_or(self.eof, |t| t.span)
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(self.eof, |t| t.span)
    }

    /// From `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.to(self.previous_span())
    }

    fn bump(&mut self) -> Result<Token<'src>, ParserError> {
        let token = self.peek().ok_or_else(|| self.unexpected("more input"))?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        let found = self.at_punct(punct);
        if found {
            self.pos += 1;
        }
        found
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Token<'src>, ParserError> {
        if self.at_punct(punct) {
            self.bump()
        } else {
            Err(self.unexpected(&format!("`{punct}`")))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token<'src>, ParserError> {
        if self.at_identifier() {
            self.bump()
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn unexpected(&self, expected: &str) -> ParserError {
        let (found, span) = self
            .peek()
            .map_or_else(|| ("end of file".to_string(), self.eof), |t| (t.text.to_string(), t.span));
        ParserError::UnexpectedToken {
            expected: expected.to_string(),
            found,
            span,
        }
    }

    fn unsupported(&self, construct: &str) -> ParserError {
        ParserError::unsupported(construct, self.current_span())
    }

    // ── Skipping ───────────────────────────────────────────────────

    /// Skip from an opening delimiter through its matching close.
    fn skip_balanced(&mut self) -> Result<(), ParserError> {
        let mut depth = 0usize;
        loop {
            let token = self.bump()?;
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip an expression up to (not including) a `,`, `;`, `)` or `}` at
    /// nesting depth zero.
    fn skip_expression(&mut self) -> Result<Vec<Token<'src>>, ParserError> {
        let mut skipped = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected("end of expression"));
            };
            if token.kind == TokenKind::Punct {
                match token.text {
                    "," | ";" | ")" | "}" | "]" => return Ok(skipped),
                    "(" | "[" | "{" => {
                        let from = self.pos;
                        self.skip_balanced()?;
                        skipped.extend_from_slice(&self.tokens[from..self.pos]);
                        continue;
                    }
                    _ => {}
                }
            }
            skipped.push(token);
            self.pos += 1;
        }
    }

    /// Skip through the next `;` at depth zero.
    fn skip_statement(&mut self) -> Result<(), ParserError> {
        loop {
            if self.at_punct("(") || self.at_punct("{") || self.at_punct("[") {
                self.skip_balanced()?;
            } else if self.bump()?.is_punct(";") {
                return Ok(());
            }
        }
    }
}
