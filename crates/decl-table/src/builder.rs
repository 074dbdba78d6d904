//! Merging per-file symbols into one table.
//!
//! Files are added one at a time in arrival order. Each file is merged in
//! two passes: every symbol is first matched against the table by its merge
//! key (qualified name, kind family, overload signature), then the
//! file-local handles in the kept payloads are rewritten to table handles.

use std::collections::{HashMap, HashSet};

use decl_core::{Dialect, Function, Payload, QualifiedName, Symbol, SymbolId, SymbolKind};
use decl_parser::FileSymbols;

use crate::error::TableError;
use crate::resolve;
use crate::table::SymbolTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MergeKey {
    name: QualifiedName,
    kind: SymbolKind,
    overload: Option<String>,
}

impl MergeKey {
    fn of(symbol: &Symbol) -> Self {
        // `class X;` and `struct X { ... }` declare the same type.
        let kind = match symbol.kind {
            SymbolKind::Class => SymbolKind::Struct,
            other => other,
        };
        Self {
            name: symbol.name.clone(),
            kind,
            overload: symbol.overload_key(),
        }
    }
}

/// What happens to one incoming symbol.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// New table entry; its payload still holds file-local handles.
    Insert(SymbolId),
    /// A declaration-only entry meets its definition: take the new payload.
    Complete(SymbolId),
    /// Prototype and definition of the same callable.
    Attach(SymbolId),
    /// Namespace opened again: union the members.
    Reopen(SymbolId),
    /// The table already says everything this symbol says.
    Keep(SymbolId),
    /// Duplicate definition, or owned by one. References to it fall back
    /// to the surviving symbol when there is one.
    Reject(Option<SymbolId>),
}

impl Step {
    const fn target(self) -> Option<SymbolId> {
        match self {
            Self::Insert(id) | Self::Complete(id) | Self::Attach(id) | Self::Reopen(id) | Self::Keep(id) => {
                Some(id)
            }
            Self::Reject(survivor) => survivor,
        }
    }
}

/// Accumulates files into a [`SymbolTable`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: SymbolTable,
    keys: HashMap<MergeKey, SymbolId>,
    errors: Vec<TableError>,
    /// Out-of-line definitions refiled under a namespace from another file,
    /// not yet listed among its members.
    adopted: Vec<SymbolId>,
}

impl TableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's symbols.
    pub fn add_file(&mut self, file: FileSymbols) {
        let FileSymbols {
            path,
            mut symbols,
            includes,
            ..
        } = file;
        tracing::debug!(path = %path, symbols = symbols.len(), "merging file");
        self.table.includes.insert(path.clone(), includes);
        self.table.files.push(path);
        let refiled = self.refile_namespace_functions(&mut symbols);

        let mut steps: Vec<Step> = Vec::with_capacity(symbols.len());
        let mut rejected: Vec<&QualifiedName> = Vec::new();
        for symbol in &symbols {
            let step = if Self::owned_by_rejected(symbol, &rejected, &steps) {
                tracing::trace!(symbol = %symbol.name, "dropped with its rejected owner");
                Step::Reject(None)
            } else {
                self.plan(symbol)
            };
            if let Step::Reject(_) = step {
                rejected.push(&symbol.name);
            }
            steps.push(step);
        }

        for index in refiled {
            if let Step::Insert(id) = steps[index] {
                self.adopted.push(id);
            }
        }

        let map: Vec<Option<SymbolId>> = steps.iter().map(|step| step.target()).collect();
        let remap = |id: SymbolId| map.get(id.index()).copied().flatten();
        for (symbol, step) in symbols.iter().zip(&steps) {
            match *step {
                Step::Insert(id) | Step::Complete(id) => {
                    let mut payload = symbol.payload.clone();
                    payload.remap_ids(&remap);
                    let slot = &mut self.table.symbols[id.index()].payload;
                    // A definition keeps the `extern` seen on its declaration.
                    if let (Payload::Variable(existing), Payload::Variable(incoming)) =
                        (&*slot, &mut payload)
                    {
                        incoming.is_extern |= existing.is_extern;
                    }
                    *slot = payload;
                }
                Step::Keep(id) => {
                    if let (Payload::Variable(incoming), Payload::Variable(existing)) =
                        (&symbol.payload, &mut self.table.symbols[id.index()].payload)
                    {
                        existing.is_extern |= incoming.is_extern;
                    }
                }
                Step::Reopen(id) => {
                    let (Payload::Namespace(incoming), Payload::Namespace(existing)) =
                        (&symbol.payload, &mut self.table.symbols[id.index()].payload)
                    else {
                        continue;
                    };
                    for member in incoming.members.iter().filter_map(|&m| remap(m)) {
                        if !existing.members.contains(&member) {
                            existing.members.push(member);
                        }
                    }
                }
                Step::Attach(id) => {
                    let mut incoming = symbol.payload.clone();
                    incoming.remap_ids(&remap);
                    if let (Payload::Function(incoming), Payload::Function(existing)) =
                        (incoming, &mut self.table.symbols[id.index()].payload)
                    {
                        attach_function(existing, incoming, symbol.state.is_defined());
                    }
                }
                Step::Reject(_) => {}
            }
        }
    }

    /// Run cross-file resolution and hand over the table with every error
    /// found along the way.
    #[must_use]
    pub fn finish(mut self) -> (SymbolTable, Vec<TableError>) {
        self.list_adopted_members();
        resolve::resolve(&mut self.table, &mut self.errors);
        tracing::debug!(
            symbols = self.table.len(),
            errors = self.errors.len(),
            "symbol table built"
        );
        (self.table, self.errors)
    }

    /// `int n::f() {}` reads as a method when `n` is not opened earlier in
    /// the same file. Once `n` is known to be a namespace, from the table or
    /// from this file, it is a free function of `n`. Returns the indices of
    /// symbols refiled against a namespace from an earlier file.
    fn refile_namespace_functions(&self, symbols: &mut [Symbol]) -> Vec<usize> {
        let local: HashSet<QualifiedName> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Namespace)
            .map(|s| s.name.clone())
            .collect();
        let mut refiled = Vec::new();
        for (index, symbol) in symbols.iter_mut().enumerate() {
            if !is_out_of_line_method(symbol) {
                continue;
            }
            let owner = symbol.name.parent();
            if local.contains(&owner) {
                into_namespace_function(symbol);
            } else if self.is_namespace(&owner) {
                into_namespace_function(symbol);
                refiled.push(index);
            }
        }
        refiled
    }

    /// A namespace arriving after definitions written against it: refile
    /// those definitions so later prototypes meet them.
    fn refile_methods_under(&mut self, namespace: &QualifiedName) {
        let mut stranded: Vec<(MergeKey, SymbolId)> = self
            .keys
            .iter()
            .filter(|(key, id)| {
                key.kind == SymbolKind::Method
                    && key.name.parent() == *namespace
                    && is_out_of_line_method(&self.table.symbols[id.index()])
            })
            .map(|(key, &id)| (key.clone(), id))
            .collect();
        stranded.sort_by_key(|(_, id)| *id);

        for (key, id) in stranded {
            self.keys.remove(&key);
            let symbol = &mut self.table.symbols[id.index()];
            into_namespace_function(symbol);
            tracing::trace!(symbol = %symbol.name, "definition refiled under namespace");
            self.keys.entry(MergeKey::of(symbol)).or_insert(id);
            self.adopted.push(id);
        }
    }

    fn is_namespace(&self, name: &QualifiedName) -> bool {
        self.table
            .lookup(name)
            .any(|(_, symbol)| symbol.kind == SymbolKind::Namespace)
    }

    fn list_adopted_members(&mut self) {
        for id in std::mem::take(&mut self.adopted) {
            let parent = self.table.symbols[id.index()].name.parent();
            let Some(namespace) = self
                .table
                .lookup(&parent)
                .find(|(_, symbol)| symbol.kind == SymbolKind::Namespace)
                .map(|(namespace, _)| namespace)
            else {
                continue;
            };
            if let Payload::Namespace(ns) = &mut self.table.symbols[namespace.index()].payload {
                if !ns.members.contains(&id) {
                    ns.members.push(id);
                }
            }
        }
    }

    /// Members, variants and nested types of a rejected definition.
    fn owned_by_rejected(symbol: &Symbol, rejected: &[&QualifiedName], steps: &[Step]) -> bool {
        let inside = rejected.iter().any(|owner| {
            symbol.name.len() > owner.len() && symbol.name.segments().starts_with(owner.segments())
        });
        let variant_of_rejected = match &symbol.payload {
            Payload::EnumVariant(variant) => {
                matches!(steps.get(variant.owner.index()), Some(Step::Reject(_)))
            }
            _ => false,
        };
        inside || variant_of_rejected
    }

    /// Decide how `symbol` enters the table, applying state and location
    /// changes right away so later symbols of the same file see them.
    fn plan(&mut self, symbol: &Symbol) -> Step {
        let key = MergeKey::of(symbol);
        let Some(&id) = self.keys.get(&key) else {
            let id = self.table.push(symbol.clone());
            self.keys.insert(key, id);
            if symbol.kind == SymbolKind::Namespace {
                self.refile_methods_under(&symbol.name);
            }
            return Step::Insert(id);
        };

        let existing = &self.table.symbols[id.index()];
        let step = match symbol.kind {
            SymbolKind::Namespace => Step::Reopen(id),
            SymbolKind::FunctionPointerType => Step::Keep(id),
            SymbolKind::Function | SymbolKind::Method => {
                let conflicting = symbol.dialect == Dialect::C
                    && !same_signature(existing.as_function(), symbol.as_function());
                if conflicting || (existing.state.is_defined() && symbol.state.is_defined()) {
                    Step::Reject(Some(id))
                } else {
                    Step::Attach(id)
                }
            }
            _ => match (existing.state.is_defined(), symbol.state.is_defined()) {
                (true, true) => Step::Reject(Some(id)),
                (false, true) => Step::Complete(id),
                _ => Step::Keep(id),
            },
        };

        let existing = &mut self.table.symbols[id.index()];
        match step {
            Step::Reject(_) => {
                let error = TableError::DuplicateDefinition {
                    name: symbol.name.clone(),
                    kind: symbol.kind,
                    first: existing.location.clone(),
                    second: symbol.location.clone(),
                };
                tracing::warn!(%error, "merge conflict");
                self.errors.push(error);
            }
            Step::Complete(_) => {
                tracing::trace!(symbol = %symbol.name, "declaration completed");
                existing.kind = symbol.kind;
                existing.state = symbol.state;
                existing.location = symbol.location.clone();
            }
            Step::Attach(_) if symbol.state.is_defined() => {
                tracing::trace!(symbol = %symbol.name, "definition attached");
                existing.state = symbol.state;
                existing.location = symbol.location.clone();
            }
            _ => {}
        }
        step
    }
}

fn is_out_of_line_method(symbol: &Symbol) -> bool {
    symbol.kind == SymbolKind::Method
        && symbol.as_function().is_some_and(|func| !func.declared_in_class)
}

fn into_namespace_function(symbol: &mut Symbol) {
    symbol.kind = SymbolKind::Function;
    if let Payload::Function(func) = &mut symbol.payload {
        func.owner = None;
    }
}

fn same_signature(a: Option<&Function>, b: Option<&Function>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ret = |f: &Function| f.return_type.as_ref().map(ToString::to_string);
            a.signature_key() == b.signature_key() && ret(a) == ret(b)
        }
        _ => false,
    }
}

/// Fold a second sighting of a callable into the table's copy. Class-body
/// facts (access, `virtual`, `static`) come from whichever side has them;
/// parameter names prefer the definition.
fn attach_function(existing: &mut Function, incoming: Function, incoming_defined: bool) {
    for (param, other) in existing.params.iter_mut().zip(incoming.params) {
        if param.name.is_none() || (incoming_defined && other.name.is_some()) {
            param.name = other.name;
        }
        param.has_default |= other.has_default;
    }
    existing.visibility = existing.visibility.or(incoming.visibility);
    existing.declared_in_class |= incoming.declared_in_class;
    existing.is_virtual |= incoming.is_virtual;
    existing.is_static |= incoming.is_static;
    existing.is_pure |= incoming.is_pure;
}
