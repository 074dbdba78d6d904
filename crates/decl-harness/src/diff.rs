//! Structural comparison of an expected and a produced listing.

use std::fmt;

use decl_core::SymbolKind;

use crate::listing::ListingEntry;

/// One difference between expected and produced symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Expected but not produced.
    Missing(ListingEntry),
    /// Produced but not expected.
    Extra(ListingEntry),
    /// Fields, base class, enumerators.
    Members {
        kind: SymbolKind,
        name: String,
        expected: Option<String>,
        actual: Option<String>,
    },
    /// Parameters, return type, aliased type, variable type, enumerator value.
    Signature {
        kind: SymbolKind,
        name: String,
        expected: Option<String>,
        actual: Option<String>,
    },
    /// The pipeline itself reported a problem.
    Pipeline(String),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(entry) => write!(f, "missing: {entry}"),
            Self::Extra(entry) => write!(f, "extra: {entry}"),
            Self::Members {
                kind,
                name,
                expected,
                actual,
            } => write!(
                f,
                "members of {kind} {name}: expected `{}`, got `{}`",
                expected.as_deref().unwrap_or_default(),
                actual.as_deref().unwrap_or_default()
            ),
            Self::Signature {
                kind,
                name,
                expected,
                actual,
            } => write!(
                f,
                "signature of {kind} {name}: expected `{}`, got `{}`",
                expected.as_deref().unwrap_or_default(),
                actual.as_deref().unwrap_or_default()
            ),
            Self::Pipeline(message) => write!(f, "pipeline error: {message}"),
        }
    }
}

/// Every difference, expected order first, then extras in produced order.
///
/// Exact matches are paired first so overloads sharing a name only
/// mismatch against each other when no exact partner exists.
#[must_use]
pub fn diff(expected: &[ListingEntry], actual: &[ListingEntry]) -> Vec<Mismatch> {
    let mut used = vec![false; actual.len()];
    let mut partner: Vec<Option<usize>> = vec![None; expected.len()];

    for (slot, want) in partner.iter_mut().zip(expected) {
        if let Some(index) = unused(actual, &used, |got| got == want) {
            used[index] = true;
            *slot = Some(index);
        }
    }

    let mut mismatches = Vec::new();
    for (slot, want) in partner.iter().zip(expected) {
        if slot.is_some() {
            continue;
        }
        match unused(actual, &used, |got| got.kind == want.kind && got.name == want.name) {
            Some(index) => {
                used[index] = true;
                mismatches.push(detail_mismatch(want, &actual[index]));
            }
            None => mismatches.push(Mismatch::Missing(want.clone())),
        }
    }

    mismatches.extend(
        actual
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(entry, _)| Mismatch::Extra(entry.clone())),
    );
    mismatches
}

fn unused(
    actual: &[ListingEntry],
    used: &[bool],
    matches: impl Fn(&ListingEntry) -> bool,
) -> Option<usize> {
    actual
        .iter()
        .enumerate()
        .find(|(index, entry)| !used[*index] && matches(entry))
        .map(|(index, _)| index)
}

fn detail_mismatch(expected: &ListingEntry, actual: &ListingEntry) -> Mismatch {
    let kind = expected.kind;
    let name = expected.name.clone();
    let expected = expected.detail.clone();
    let actual = actual.detail.clone();
    if kind.is_aggregate() || matches!(kind, SymbolKind::Enum | SymbolKind::ScopedEnum) {
        Mismatch::Members {
            kind,
            name,
            expected,
            actual,
        }
    } else {
        Mismatch::Signature {
            kind,
            name,
            expected,
            actual,
        }
    }
}
