//! Cross-file resolution over a merged table.

use std::collections::HashSet;

use decl_core::{Payload, SymbolId, SymbolKind, Target, TypeRef};

use crate::error::TableError;
use crate::table::{ReferenceEdge, SymbolTable, referenced_types};

pub(crate) fn resolve(table: &mut SymbolTable, errors: &mut Vec<TableError>) {
    resolve_placeholders(table, errors);
    check_out_of_line_methods(table, errors);
    detect_alias_cycles(table, errors);
    index_references(table);
}

/// Bind every placeholder to a type symbol, looking outward from the
/// referencing symbol's scope. Each missing name is reported once per
/// referencing symbol.
fn resolve_placeholders(table: &mut SymbolTable, errors: &mut Vec<TableError>) {
    let mut reported: HashSet<(usize, String)> = HashSet::new();
    for index in 0..table.symbols.len() {
        let symbol = &table.symbols[index];
        let scope = symbol.lookup_scope().to_vec();
        let mut payload = symbol.payload.clone();
        let mut missing = Vec::new();
        payload.for_each_type_ref_mut(&mut |ty| {
            ty.for_each_named_mut(&mut |named| {
                if named.is_resolved() {
                    return;
                }
                match table.resolve_type(named, &scope) {
                    Some(id) => named.target = Target::Resolved(id),
                    None => missing.push(named.spelling()),
                }
            });
        });

        let symbol = &mut table.symbols[index];
        symbol.payload = payload;
        for name in missing {
            if !reported.insert((index, name.clone())) {
                continue;
            }
            let error = TableError::UnresolvedReference {
                symbol: symbol.name.clone(),
                missing: name,
                location: symbol.location.clone(),
            };
            tracing::warn!(%error, "unresolved type name");
            errors.push(error);
        }
    }
}

/// A method defined outside its class must have been declared inside it.
fn check_out_of_line_methods(table: &SymbolTable, errors: &mut Vec<TableError>) {
    for (_, symbol) in table.of_kind(SymbolKind::Method) {
        let Some(func) = symbol.as_function() else {
            continue;
        };
        if func.declared_in_class {
            continue;
        }
        let owner = symbol.name.parent();
        let class_exists = table
            .lookup(&owner)
            .any(|(_, candidate)| candidate.kind.is_aggregate());
        let missing = if class_exists {
            format!("{}{}", symbol.name, func.signature_key())
        } else {
            owner.to_string()
        };
        let error = TableError::UnresolvedReference {
            symbol: symbol.name.clone(),
            missing,
            location: symbol.location.clone(),
        };
        tracing::warn!(%error, "method defined without a class declaration");
        errors.push(error);
    }
}

/// Follow each alias through aliases it names directly. A walk that comes
/// back to where it started is a cycle, reported once from its lowest
/// handle.
fn detect_alias_cycles(table: &SymbolTable, errors: &mut Vec<TableError>) {
    for (start, symbol) in table.of_kind(SymbolKind::TypedefAlias) {
        let mut chain = vec![start];
        let mut current = start;
        while let Some(next) = aliased(table, current) {
            if next == start {
                if chain.iter().all(|&id| id >= start) {
                    let error = TableError::AliasCycle {
                        aliases: chain
                            .iter()
                            .filter_map(|&id| table.get(id))
                            .map(|s| s.name.clone())
                            .collect(),
                        location: symbol.location.clone(),
                    };
                    tracing::warn!(%error, "typedef cycle");
                    errors.push(error);
                }
                break;
            }
            if chain.contains(&next) {
                break;
            }
            chain.push(next);
            current = next;
        }
    }
}

/// Record who names whom once every placeholder that can be bound is.
fn index_references(table: &mut SymbolTable) {
    let mut references = Vec::new();
    for (usage, symbol) in table.iter() {
        for definition in referenced_types(&symbol.payload) {
            references.push(ReferenceEdge { definition, usage });
        }
    }
    table.referrers.clear();
    for edge in &references {
        table.referrers.entry(edge.definition).or_default().push(edge.usage);
    }
    tracing::debug!(references = references.len(), "reference index built");
    table.references = references;
}

/// The alias an alias directly refers to, looking through cv-qualifiers.
fn aliased(table: &SymbolTable, id: SymbolId) -> Option<SymbolId> {
    let Payload::Alias(alias) = &table.get(id)?.payload else {
        return None;
    };
    let mut ty = &alias.target;
    while let TypeRef::Const(inner) | TypeRef::Volatile(inner) = ty {
        ty = &**inner;
    }
    let TypeRef::Named(named) = ty else {
        return None;
    };
    let Target::Resolved(next) = named.target else {
        return None;
    };
    (table.get(next)?.kind == SymbolKind::TypedefAlias).then_some(next)
}
