//! Preprocessor directives.
//!
//! Only a tiny, transparent subset is accepted: `#include` (recorded),
//! `#pragma` (ignored) and include guards. Everything else changes the
//! token stream in ways a declaration parser cannot model.

use decl_core::Span;

use crate::ast::Include;
use crate::error::ParserError;
use crate::token::{Token, TokenKind};

struct Directive {
    name: String,
    rest: String,
}

impl Directive {
    fn parse(text: &str) -> Self {
        let body = strip_comments(&text.replace("\\\r\n", " ").replace("\\\n", " "));
        let body = body.trim_start_matches('#').trim_start();
        let name_len = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(body.len());
        Self {
            name: body[..name_len].to_string(),
            rest: body[name_len..].trim().to_string(),
        }
    }
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if rest.starts_with("//") {
            break;
        }
        if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |end| &after[end + 2..]);
            out.push(' ');
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Remove directive tokens from the stream, collecting includes.
pub(super) fn strip_directives<'src>(
    tokens: Vec<Token<'src>>,
) -> Result<(Vec<Token<'src>>, Vec<Include>), ParserError> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut includes = Vec::new();
    let mut open_guards: Vec<Span> = Vec::new();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.kind != TokenKind::Directive {
            kept.push(token);
            continue;
        }
        let directive = Directive::parse(token.text);
        match directive.name.as_str() {
            "include" => includes.push(parse_include(&directive.rest, token.span)?),
            "pragma" | "" => {}
            "ifndef" => {
                let guard = iter.next_if(|next| {
                    next.kind == TokenKind::Directive && {
                        let define = Directive::parse(next.text);
                        define.name == "define" && define.rest == directive.rest
                    }
                });
                if guard.is_none() || !is_identifier(&directive.rest) {
                    return Err(ParserError::unsupported("preprocessor conditional", token.span));
                }
                open_guards.push(token.span);
            }
            "endif" if !open_guards.is_empty() => {
                open_guards.pop();
            }
            "define" => return Err(ParserError::unsupported("macro definition", token.span)),
            "if" | "ifdef" | "elif" | "else" | "endif" => {
                return Err(ParserError::unsupported("preprocessor conditional", token.span));
            }
            other => {
                return Err(ParserError::unsupported(format!("#{other} directive"), token.span));
            }
        }
    }

    if let Some(span) = open_guards.pop() {
        return Err(ParserError::UnexpectedToken {
            expected: "`#endif` closing the include guard".to_string(),
            found: "end of file".to_string(),
            span,
        });
    }

    Ok((kept, includes))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_include(rest: &str, span: Span) -> Result<Include, ParserError> {
    let (system, close) = match rest.chars().next() {
        Some('"') => (false, '"'),
        Some('<') => (true, '>'),
        _ => return Err(ParserError::unsupported("computed include", span)),
    };
    let inner = &rest[1..];
    let end = inner.find(close).ok_or_else(|| ParserError::UnexpectedToken {
        expected: format!("`{close}` closing the include path"),
        found: rest.to_string(),
        span,
    })?;
    Ok(Include {
        target: inner[..end].to_string(),
        system,
        span,
    })
}
