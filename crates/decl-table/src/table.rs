//! The merged, queryable symbol registry.

use std::collections::HashMap;

use decl_core::{NamedType, Payload, QualifiedName, Symbol, SymbolId, SymbolKind, Target, TypeRef};
use decl_parser::ast::Include;

/// A declaration naming a type symbol: a field, parameter, return,
/// variable, alias target or base class written in terms of `definition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceEdge {
    pub definition: SymbolId,
    pub usage: SymbolId,
}

/// Every symbol from every merged file, addressed by `SymbolId`.
///
/// Enumeration order is deterministic: files in arrival order, then each
/// file's symbols in declaration order. A symbol merged from several files
/// keeps the position of its first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) files: Vec<String>,
    pub(crate) by_name: HashMap<QualifiedName, Vec<SymbolId>>,
    pub(crate) includes: HashMap<String, Vec<Include>>,
    /// One edge per (usage, definition) pair, in enumeration order of the usage.
    pub(crate) references: Vec<ReferenceEdge>,
    pub(crate) referrers: HashMap<SymbolId, Vec<SymbolId>>,
}

impl SymbolTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Paths of the merged files, in arrival order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// `#include` directives of a merged file, as written.
    #[must_use]
    pub fn includes(&self, path: &str) -> &[Include] {
        self.includes.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Merged files a file includes with `"..."`. A target matches a file
    /// whose path equals it or ends with `/target`.
    #[must_use]
    pub fn included_files(&self, path: &str) -> Vec<&str> {
        self.includes(path)
            .iter()
            .filter(|include| !include.system)
            .filter_map(|include| {
                let suffix = format!("/{}", include.target);
                self.files
                    .iter()
                    .find(|file| **file == include.target || file.ends_with(&suffix))
                    .map(String::as_str)
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// All symbols in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId::new(index), symbol))
    }

    /// Every symbol with this qualified name, of any kind (overloads,
    /// a struct and a function sharing a C name, ...).
    pub fn lookup(&self, name: &QualifiedName) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&id| (id, &self.symbols[id.index()]))
    }

    /// The first symbol with this name and kind.
    #[must_use]
    pub fn lookup_kind(&self, name: &QualifiedName, kind: SymbolKind) -> Option<&Symbol> {
        self.lookup(name)
            .map(|(_, symbol)| symbol)
            .find(|symbol| symbol.kind == kind)
    }

    pub fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.iter().filter(move |(_, symbol)| symbol.kind == kind)
    }

    /// Direct members of a namespace.
    pub fn members(&self, namespace: SymbolId) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        let members = self
            .get(namespace)
            .and_then(Symbol::as_namespace)
            .map(|ns| ns.members.as_slice())
            .unwrap_or_default();
        members.iter().filter_map(|&id| self.get(id).map(|symbol| (id, symbol)))
    }

    /// Every resolved type reference in the table.
    #[must_use]
    pub fn references(&self) -> &[ReferenceEdge] {
        &self.references
    }

    /// Symbols whose declarations name `definition`, in enumeration order.
    pub fn references_to(&self, definition: SymbolId) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.referrers
            .get(&definition)
            .into_iter()
            .flatten()
            .map(|&id| (id, &self.symbols[id.index()]))
    }

    /// Type symbols named by `usage`'s declaration, in the order written.
    pub fn references_from(&self, usage: SymbolId) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.get(usage)
            .map(|symbol| referenced_types(&symbol.payload))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| self.get(id).map(|symbol| (id, symbol)))
    }

    /// Canonical spelling of a type: resolved names are written fully
    /// qualified and function pointers by their signature.
    #[must_use]
    pub fn render_type(&self, ty: &TypeRef) -> String {
        ty.render_with(&|named| self.render_named(named))
    }

    fn render_named(&self, named: &NamedType) -> String {
        let Target::Resolved(id) = named.target else {
            return named.spelling();
        };
        match self.get(id) {
            Some(Symbol {
                payload: Payload::FunctionPointer(signature),
                ..
            }) => signature.render_with(&|ty| self.render_type(ty)),
            Some(symbol) => symbol.name.to_string(),
            None => named.spelling(),
        }
    }

    /// Type symbols a name can refer to from `scope`, innermost scope first.
    pub(crate) fn resolve_type(&self, named: &NamedType, scope: &[String]) -> Option<SymbolId> {
        let depths: Vec<usize> = if named.global {
            vec![0]
        } else {
            (0..=scope.len()).rev().collect()
        };
        depths.into_iter().find_map(|depth| {
            let candidate = QualifiedName::new(scope[..depth].to_vec()).join(&named.path);
            self.by_name.get(&candidate)?.iter().copied().find(|id| {
                let kind = self.symbols[id.index()].kind;
                kind.is_type() && named.tag.is_none_or(|tag| tag.accepts(kind))
            })
        })
    }

    pub(crate) fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.symbols.len());
        self.by_name.entry(symbol.name.clone()).or_default().push(id);
        self.symbols.push(symbol);
        id
    }
}

/// Resolved type targets of a payload, first occurrence only.
pub(crate) fn referenced_types(payload: &Payload) -> Vec<SymbolId> {
    let mut targets = Vec::new();
    payload.for_each_type_ref(&mut |ty| {
        ty.for_each_named(&mut |named| {
            if let Target::Resolved(id) = named.target {
                if !targets.contains(&id) {
                    targets.push(id);
                }
            }
        });
    });
    targets
}
