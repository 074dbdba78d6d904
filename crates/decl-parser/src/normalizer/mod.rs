//! Normalizer: dialect declaration tree to unified symbols.
//!
//! Every declaration maps to exactly one symbol, plus the `EnumVariant` and
//! `FunctionPointerType` symbols it implies. Handles are file-local: a
//! `SymbolId` indexes [`FileSymbols::symbols`]. Type names already declared
//! earlier in the file resolve to those handles; everything else stays a
//! placeholder for the symbol table to resolve.

mod types;
mod values;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use decl_core::{
    AggregateType, BaseClass, DefinitionState, Dialect, EnumType, EnumVariant, Field, Function,
    GlobalVariable, NamedType, Namespace, Parameter, Payload, QualifiedName, SourceLocation, Span,
    Symbol, SymbolId, SymbolKind, Tag, Target, TypeRef, TypedefAlias, Visibility,
};

use crate::ast::{
    AggregateDecl, BaseType, Decl, Declarator, EnumDecl, FunctionDecl, Include, MemberKind,
    NamespaceDecl, ParamList, TranslationUnit, TypedefDecl, VariableDecl,
};
use crate::error::ParserError;

/// Symbols produced from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSymbols {
    pub path: String,
    pub dialect: Dialect,
    pub includes: Vec<Include>,
    /// In declaration order; `SymbolId`s index this list.
    pub symbols: Vec<Symbol>,
}

impl FileSymbols {
    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// First symbol with this qualified name and kind.
    #[must_use]
    pub fn find(&self, name: &str, kind: SymbolKind) -> Option<&Symbol> {
        let name = QualifiedName::parse(name);
        self.symbols.iter().find(|s| s.kind == kind && s.name == name)
    }
}

/// Map a parsed translation unit onto symbols.
///
/// # Errors
/// Returns `ParserError::Normalization` for enumerator initializers other
/// than integer literals or `Previous + 1`, duplicate enum values, and
/// declarations with no deterministic symbol (anonymous aggregates aliased
/// only through pointers, qualified data member definitions).
pub fn normalize(unit: &TranslationUnit) -> Result<FileSymbols, ParserError> {
    let mut normalizer = Normalizer::new(&unit.path, unit.dialect);
    for decl in &unit.decls {
        normalizer.decl(decl, &QualifiedName::new(decl.scope().to_vec()))?;
    }
    normalizer.link_members();

    Ok(FileSymbols {
        path: unit.path.clone(),
        dialect: unit.dialect,
        includes: unit.includes.clone(),
        symbols: normalizer.symbols,
    })
}

struct Normalizer<'a> {
    path: &'a str,
    dialect: Dialect,
    symbols: Vec<Symbol>,
    /// Type symbols by qualified name, in declaration order.
    types: HashMap<QualifiedName, Vec<SymbolId>>,
    namespaces: HashMap<QualifiedName, SymbolId>,
    fn_pointers: HashMap<QualifiedName, SymbolId>,
    /// In-class method declarations keyed by name and signature.
    methods: HashMap<(QualifiedName, String), SymbolId>,
}

impl<'a> Normalizer<'a> {
    fn new(path: &'a str, dialect: Dialect) -> Self {
        Self {
            path,
            dialect,
            symbols: Vec::new(),
            types: HashMap::new(),
            namespaces: HashMap::new(),
            fn_pointers: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    fn location(&self, span: Span) -> SourceLocation {
        SourceLocation::new(self.path, span.start)
    }

    fn push(
        &mut self,
        name: QualifiedName,
        kind: SymbolKind,
        state: DefinitionState,
        span: Span,
        payload: Payload,
    ) -> SymbolId {
        let id = SymbolId::new(self.symbols.len());
        if kind.is_type() {
            self.types.entry(name.clone()).or_default().push(id);
        }
        self.symbols.push(Symbol {
            name,
            kind,
            dialect: self.dialect,
            location: self.location(span),
            state,
            payload,
        });
        id
    }

    fn decl(&mut self, decl: &Decl, scope: &QualifiedName) -> Result<(), ParserError> {
        match decl {
            Decl::Aggregate(agg) => self.aggregate(agg, scope, None).map(drop),
            Decl::Enum(en) => self.enumeration(en, scope, None).map(drop),
            Decl::Typedef(td) => self.typedef(td, scope),
            Decl::Function(func) => self.function(func, scope),
            Decl::Variable(var) => self.variable(var, scope),
            Decl::Namespace(ns) => self.namespace(ns),
        }
    }

    // ── Aggregates ─────────────────────────────────────────────────

    /// `typedef_name` names an anonymous aggregate after its alias.
    fn aggregate(
        &mut self,
        agg: &AggregateDecl,
        scope: &QualifiedName,
        typedef_name: Option<&str>,
    ) -> Result<SymbolId, ParserError> {
        let name = agg
            .name
            .as_deref()
            .or(typedef_name)
            .ok_or_else(|| ParserError::normalization("anonymous aggregate has no name", agg.span))?;
        let path = scope.child(name);
        let state = if agg.body.is_some() {
            DefinitionState::Defined
        } else {
            DefinitionState::Declared
        };
        let placeholder = Payload::Aggregate(AggregateType {
            typedef_name: agg.name.is_none(),
            ..AggregateType::default()
        });
        // Reserved before the members so the body can refer to itself.
        let id = self.push(path.clone(), agg.kind.symbol_kind(), state, agg.span, placeholder);
        let Some(body) = &agg.body else {
            return Ok(id);
        };

        // C has no struct scopes: nested declarations land beside the struct.
        let member_scope = if self.dialect.is_cpp() { path.clone() } else { scope.clone() };
        let lookup = path.segments().to_vec();
        let default_visibility = agg.kind.default_visibility();

        let base = agg.base.as_ref().map(|base| BaseClass {
            access: base.access.unwrap_or(default_visibility),
            ty: TypeRef::Named(self.named(&base.path, base.global, None, &lookup)),
        });
        let mut fields = Vec::new();
        let mut methods = Vec::new();

        for member in body {
            let visibility = member.access.unwrap_or(default_visibility);
            match &member.kind {
                MemberKind::Field(field) => {
                    let name = field.declarator.simple_name().ok_or_else(|| {
                        ParserError::normalization("field without a simple name", field.span)
                    })?;
                    let ty = self.declared_type(&field.spec, &field.declarator, &member_scope, &lookup)?;
                    fields.push(Field {
                        name: name.to_string(),
                        ty,
                        visibility,
                        bit_width: field.bit_width,
                    });
                }
                MemberKind::Method(func) => {
                    methods.push(self.method_in_class(func, &path, visibility)?);
                }
                MemberKind::Nested(nested) => self.decl(nested, &member_scope)?,
            }
        }

        if let Payload::Aggregate(aggregate) = &mut self.symbols[id.index()].payload {
            aggregate.fields = fields;
            aggregate.methods = methods;
            aggregate.base = base;
        }
        tracing::trace!(symbol = %path, "normalized aggregate");
        Ok(id)
    }

    // ── Enums ──────────────────────────────────────────────────────

    fn enumeration(
        &mut self,
        en: &EnumDecl,
        scope: &QualifiedName,
        typedef_name: Option<&str>,
    ) -> Result<SymbolId, ParserError> {
        let name = en
            .name
            .as_deref()
            .or(typedef_name)
            .ok_or_else(|| ParserError::normalization("anonymous enum has no name", en.span))?;
        let path = scope.child(name);
        let kind = if en.scoped { SymbolKind::ScopedEnum } else { SymbolKind::Enum };
        let underlying = en
            .underlying
            .as_ref()
            .map(|spec| self.spec_type(spec, scope.segments()))
            .transpose()?;
        let state = if en.variants.is_some() {
            DefinitionState::Defined
        } else {
            DefinitionState::Declared
        };
        let variants = en
            .variants
            .as_deref()
            .map(values::evaluate_enumerators)
            .transpose()?
            .unwrap_or_default();

        let id = self.push(
            path.clone(),
            kind,
            state,
            en.span,
            Payload::Enum(EnumType {
                variants: variants.clone(),
                scoped: en.scoped,
                underlying,
            }),
        );

        let variant_scope = if en.scoped { path } else { scope.clone() };
        let spans = en.variants.iter().flatten().map(|v| v.span);
        for (variant, span) in variants.into_iter().zip(spans) {
            self.push(
                variant_scope.child(variant.name),
                SymbolKind::EnumVariant,
                DefinitionState::Defined,
                span,
                Payload::EnumVariant(EnumVariant {
                    owner: id,
                    value: variant.value,
                }),
            );
        }
        Ok(id)
    }

    // ── Typedefs ───────────────────────────────────────────────────

    fn typedef(&mut self, td: &TypedefDecl, scope: &QualifiedName) -> Result<(), ParserError> {
        let lookup = scope.segments().to_vec();
        let inline = match &td.spec.base {
            BaseType::Aggregate(agg) => {
                let alias = Self::canonical_alias(td, agg.name.as_deref(), agg.span)?;
                let id = self.aggregate(agg, scope, alias)?;
                Some((id, agg.name.is_some(), agg.kind.tag()))
            }
            BaseType::Enum(en) => {
                let alias = Self::canonical_alias(td, en.name.as_deref(), en.span)?;
                let id = self.enumeration(en, scope, alias)?;
                Some((id, en.name.is_some(), Tag::Enum))
            }
            _ => None,
        };

        let base = match inline {
            Some((id, _, tag)) => {
                let name = self.symbols[id.index()].name.name().to_string();
                let named = NamedType {
                    tag: Some(tag),
                    ..NamedType::resolved(vec![name], id)
                };
                Self::qualify(TypeRef::Named(named), &td.spec)
            }
            None => self.spec_type(&td.spec, &lookup)?,
        };

        for declarator in &td.declarators {
            let alias = declarator.simple_name().ok_or_else(|| {
                ParserError::normalization("typedef without a simple name", declarator.span)
            })?;
            if let Some((id, named, _)) = inline {
                let symbol = &mut self.symbols[id.index()];
                if declarator.is_plain() && alias == symbol.name.name() {
                    if let (true, Payload::Aggregate(aggregate)) = (named, &mut symbol.payload) {
                        aggregate.typedef_name = true;
                    }
                    continue;
                }
            }
            let target = self.apply_declarator(base.clone(), declarator, scope, &lookup)?;
            self.push(
                scope.child(alias),
                SymbolKind::TypedefAlias,
                DefinitionState::Defined,
                declarator.span,
                Payload::Alias(TypedefAlias { target }),
            );
        }
        Ok(())
    }

    /// The alias that names an anonymous inline definition: the first
    /// declarator that is the type itself rather than a pointer to it.
    fn canonical_alias<'t>(
        td: &'t TypedefDecl,
        tag_name: Option<&str>,
        span: Span,
    ) -> Result<Option<&'t str>, ParserError> {
        if tag_name.is_some() {
            return Ok(None);
        }
        td.declarators
            .iter()
            .filter(|d| d.is_plain())
            .find_map(Declarator::simple_name)
            .map(Some)
            .ok_or_else(|| {
                ParserError::normalization(
                    "anonymous type is only aliased through a pointer or array",
                    span,
                )
            })
    }

    // ── Functions ──────────────────────────────────────────────────

    fn function(&mut self, func: &FunctionDecl, scope: &QualifiedName) -> Result<(), ParserError> {
        if func.is_out_of_line() {
            return self.out_of_line(func, scope);
        }
        let payload = self.function_payload(func, scope, scope.segments(), None, None)?;
        self.push(
            scope.child(func.name.last()),
            SymbolKind::Function,
            Self::body_state(func),
            func.span,
            Payload::Function(payload),
        );
        Ok(())
    }

    fn method_in_class(
        &mut self,
        func: &FunctionDecl,
        class: &QualifiedName,
        visibility: Visibility,
    ) -> Result<SymbolId, ParserError> {
        if func.is_out_of_line() {
            return Err(ParserError::normalization(
                "qualified name inside a class body",
                func.name.span,
            ));
        }
        let path = class.child(func.name.last());
        let mut payload =
            self.function_payload(func, class, class.segments(), Some(class.clone()), Some(visibility))?;
        payload.declared_in_class = true;
        let key = (path.clone(), payload.signature_key());
        let id = self.push(
            path,
            SymbolKind::Method,
            Self::body_state(func),
            func.span,
            Payload::Function(payload),
        );
        self.methods.entry(key).or_insert(id);
        Ok(id)
    }

    /// `Owner::name(...)` written outside the class body.
    fn out_of_line(&mut self, func: &FunctionDecl, scope: &QualifiedName) -> Result<(), ParserError> {
        let qualifier = &func.name.path[..func.name.path.len() - 1];
        let owner = scope.join(qualifier);
        let path = owner.child(func.name.last());
        // Names in the signature are looked up in the owner first.
        let lookup = owner.segments().to_vec();
        let payload = self.function_payload(func, scope, &lookup, Some(owner.clone()), None)?;

        if let Some(&id) = self.methods.get(&(path.clone(), payload.signature_key())) {
            let symbol = &mut self.symbols[id.index()];
            symbol.state = symbol.state.combine(Self::body_state(func));
            if let Payload::Function(declared) = &mut symbol.payload {
                for (param, defined) in declared.params.iter_mut().zip(&payload.params) {
                    if defined.name.is_some() {
                        param.name.clone_from(&defined.name);
                    }
                }
            }
            return Ok(());
        }

        let (kind, payload) = if self.namespaces.contains_key(&owner) {
            (SymbolKind::Function, Function { owner: None, ..payload })
        } else {
            (SymbolKind::Method, payload)
        };
        self.push(path, kind, Self::body_state(func), func.span, Payload::Function(payload));
        Ok(())
    }

    fn function_payload(
        &mut self,
        func: &FunctionDecl,
        scope: &QualifiedName,
        lookup: &[String],
        owner: Option<QualifiedName>,
        visibility: Option<Visibility>,
    ) -> Result<Function, ParserError> {
        let return_type = match &func.return_type {
            Some(ret) => {
                let base = self.spec_type(&ret.spec, lookup)?;
                Some(Self::apply_ops(base, &ret.ops))
            }
            None => None,
        };
        let params = self.parameters(&func.signature.params, scope, lookup)?;
        Ok(Function {
            return_type,
            params,
            variadic: func.signature.params.variadic,
            is_const: func.signature.is_const,
            is_static: func.specifiers.is_static,
            is_virtual: func.specifiers.is_virtual,
            is_pure: func.signature.is_pure,
            visibility,
            owner,
            declared_in_class: false,
        })
    }

    fn parameters(
        &mut self,
        list: &ParamList,
        scope: &QualifiedName,
        lookup: &[String],
    ) -> Result<Vec<Parameter>, ParserError> {
        if let [only] = list.params.as_slice() {
            if only.is_void() {
                return Ok(Vec::new());
            }
        }
        list.params
            .iter()
            .map(|param| {
                Ok(Parameter {
                    name: param.declarator.simple_name().map(str::to_string),
                    ty: self.declared_type(&param.spec, &param.declarator, scope, lookup)?,
                    has_default: param.has_default,
                })
            })
            .collect()
    }

    const fn body_state(func: &FunctionDecl) -> DefinitionState {
        if func.has_body {
            DefinitionState::Defined
        } else {
            DefinitionState::Declared
        }
    }

    // ── Variables and namespaces ───────────────────────────────────

    fn variable(&mut self, var: &VariableDecl, scope: &QualifiedName) -> Result<(), ParserError> {
        let name = var.declarator.simple_name().ok_or_else(|| {
            ParserError::normalization("qualified variable definition", var.declarator.span)
        })?;
        let lookup = scope.segments().to_vec();
        let ty = self.declared_type(&var.spec, &var.declarator, scope, &lookup)?;
        let is_extern = var.specifiers.is_extern;
        let state = if is_extern && !var.has_initializer {
            DefinitionState::Declared
        } else {
            DefinitionState::Defined
        };
        self.push(
            scope.child(name),
            SymbolKind::GlobalVariable,
            state,
            var.span,
            Payload::Variable(GlobalVariable {
                ty,
                is_extern,
                is_static: var.specifiers.is_static,
            }),
        );
        Ok(())
    }

    /// Reopening a namespace in the same file reuses its symbol.
    fn namespace(&mut self, ns: &NamespaceDecl) -> Result<(), ParserError> {
        let path = QualifiedName::new(ns.scope.clone()).child(ns.name.clone());
        if !self.namespaces.contains_key(&path) {
            let id = self.push(
                path.clone(),
                SymbolKind::Namespace,
                DefinitionState::Defined,
                ns.span,
                Payload::Namespace(Namespace::default()),
            );
            self.namespaces.insert(path.clone(), id);
        }
        for decl in &ns.decls {
            self.decl(decl, &path)?;
        }
        Ok(())
    }

    /// Fill namespace member lists and C++ nested type lists from the
    /// qualified names of everything declared directly inside them.
    fn link_members(&mut self) {
        let mut children: HashMap<QualifiedName, Vec<SymbolId>> = HashMap::new();
        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.kind != SymbolKind::FunctionPointerType && symbol.name.len() > 1 {
                children
                    .entry(symbol.name.parent())
                    .or_default()
                    .push(SymbolId::new(index));
            }
        }

        let is_cpp = self.dialect.is_cpp();
        let kinds: Vec<SymbolKind> = self.symbols.iter().map(|s| s.kind).collect();
        for symbol in &mut self.symbols {
            let Some(direct) = children.get(&symbol.name) else {
                continue;
            };
            let defined = symbol.state.is_defined();
            match &mut symbol.payload {
                Payload::Namespace(ns) => ns.members.clone_from(direct),
                Payload::Aggregate(aggregate) if is_cpp && defined => {
                    aggregate.nested = direct
                        .iter()
                        .copied()
                        .filter(|id| kinds[id.index()].is_type())
                        .collect();
                }
                _ => {}
            }
        }
    }

    /// Resolve a type name against types declared earlier in this file,
    /// innermost enclosing scope first.
    fn named(&self, path: &[String], global: bool, tag: Option<Tag>, lookup: &[String]) -> NamedType {
        let mut named = NamedType::placeholder(path.to_vec(), global, tag);
        let depths: Vec<usize> = if global { vec![0] } else { (0..=lookup.len()).rev().collect() };
        for depth in depths {
            let candidate = QualifiedName::new(lookup[..depth].to_vec()).join(path);
            let found = self.types.get(&candidate).and_then(|ids| {
                ids.iter()
                    .copied()
                    .find(|id| tag.is_none_or(|tag| tag.accepts(self.symbols[id.index()].kind)))
            });
            if let Some(id) = found {
                named.target = Target::Resolved(id);
                break;
            }
        }
        named
    }
}
