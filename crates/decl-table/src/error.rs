//! Merge and resolution errors.

use decl_core::{QualifiedName, SourceLocation, SymbolKind};

/// A problem found while merging files into one table.
///
/// Each is recorded against a single symbol; the rest of the table stays
/// usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two definitions of the same entity, or C prototypes that disagree.
    #[error("Duplicate definition of {kind} {name} at {second} (first at {first})")]
    DuplicateDefinition {
        name: QualifiedName,
        kind: SymbolKind,
        first: SourceLocation,
        second: SourceLocation,
    },

    /// `symbol` names something no file defines.
    #[error("Unresolved reference to `{missing}` from {symbol} at {location}")]
    UnresolvedReference {
        symbol: QualifiedName,
        missing: String,
        location: SourceLocation,
    },

    /// Typedefs that alias each other without ever reaching a type.
    #[error("Alias cycle at {location}: {}", display_cycle(.aliases))]
    AliasCycle {
        aliases: Vec<QualifiedName>,
        location: SourceLocation,
    },
}

fn display_cycle(aliases: &[QualifiedName]) -> String {
    let mut names: Vec<String> = aliases.iter().map(ToString::to_string).collect();
    if let Some(first) = names.first().cloned() {
        names.push(first);
    }
    names.join(" -> ")
}

/// Failure to run the pipeline at all.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
