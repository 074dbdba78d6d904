//! Static evaluation of enumerator values.
//!
//! Only integer literals (optionally signed) and `Previous + 1` are
//! evaluated. Anything else is rejected rather than guessed.

use decl_core::{Span, Variant};

use crate::ast::{EnumeratorDecl, Initializer};
use crate::error::ParserError;

pub(super) fn evaluate_enumerators(decls: &[EnumeratorDecl]) -> Result<Vec<Variant>, ParserError> {
    let mut variants: Vec<Variant> = Vec::with_capacity(decls.len());
    for decl in decls {
        if variants.iter().any(|v| v.name == decl.name) {
            return Err(ParserError::normalization(
                format!("duplicate enumerator `{}`", decl.name),
                decl.span,
            ));
        }
        let value = match (&decl.init, variants.last()) {
            (Some(init), _) => evaluate(init, variants.last())?,
            (None, Some(previous)) => successor(previous.value, decl.span)?,
            (None, None) => 0,
        };
        if let Some(clash) = variants.iter().find(|v| v.value == value) {
            return Err(ParserError::normalization(
                format!(
                    "enumerators `{}` and `{}` share the value {value}",
                    clash.name, decl.name
                ),
                decl.span,
            ));
        }
        variants.push(Variant {
            name: decl.name.clone(),
            value,
        });
    }
    Ok(variants)
}

fn evaluate(init: &Initializer, previous: Option<&Variant>) -> Result<i64, ParserError> {
    let tokens: Vec<&str> = init.tokens.iter().map(String::as_str).collect();
    let value = match tokens.as_slice() {
        [literal] => parse_literal(literal),
        ["-", literal] => parse_literal(literal).and_then(i64::checked_neg),
        ["+", literal] => parse_literal(literal),
        [name, "+", one] if parse_literal(one) == Some(1) => match previous {
            Some(previous) if previous.name == *name => return successor(previous.value, init.span),
            _ => None,
        },
        _ => None,
    };
    value.ok_or_else(|| {
        ParserError::normalization(
            format!("cannot evaluate enumerator initializer `{}`", init.tokens.join(" ")),
            init.span,
        )
    })
}

fn successor(value: i64, span: Span) -> Result<i64, ParserError> {
    value
        .checked_add(1)
        .ok_or_else(|| ParserError::normalization("enumerator value overflows", span))
}

/// Decimal, hex, octal or binary integer literal with optional suffixes and
/// digit separators.
fn parse_literal(text: &str) -> Option<i64> {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let digits: String = text
        .trim_end_matches(['u', 'U', 'l', 'L'])
        .chars()
        .filter(|&c| c != '\'')
        .collect();
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };
    if body.is_empty() {
        return None;
    }
    i64::from_str_radix(body, radix).ok()
}
