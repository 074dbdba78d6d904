//! Dialect-specific declaration tree.
//!
//! The parsers produce one [`TranslationUnit`] per file. Nodes keep the shape
//! of the source (specifiers, declarators, access labels as written); the
//! normalizer is responsible for mapping them onto the symbol model.

use decl_core::{Dialect, Span, SymbolKind, Tag, Visibility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub path: String,
    pub dialect: Dialect,
    pub includes: Vec<Include>,
    pub decls: Vec<Decl>,
}

/// An `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub target: String,
    /// `<...>` rather than `"..."`.
    pub system: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Aggregate(AggregateDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Namespace(NamespaceDecl),
}

impl Decl {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Aggregate(d) => d.span,
            Self::Enum(d) => d.span,
            Self::Typedef(d) => d.span,
            Self::Function(d) => d.span,
            Self::Variable(d) => d.span,
            Self::Namespace(d) => d.span,
        }
    }

    /// Scope path the declaration was found in.
    #[must_use]
    pub fn scope(&self) -> &[String] {
        match self {
            Self::Aggregate(d) => &d.scope,
            Self::Enum(d) => &d.scope,
            Self::Typedef(d) => &d.scope,
            Self::Function(d) => &d.scope,
            Self::Variable(d) => &d.scope,
            Self::Namespace(d) => &d.scope,
        }
    }

    /// Short name for logs and test failure messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Aggregate(d) => {
                format!("{} {}", d.kind, d.name.as_deref().unwrap_or("<anonymous>"))
            }
            Self::Enum(d) => format!("enum {}", d.name.as_deref().unwrap_or("<anonymous>")),
            Self::Typedef(d) => {
                let names: Vec<_> = d.declarators.iter().filter_map(Declarator::simple_name).collect();
                format!("typedef {}", names.join(", "))
            }
            Self::Function(d) => format!("function {}", d.name.path.join("::")),
            Self::Variable(d) => {
                format!("variable {}", d.declarator.simple_name().unwrap_or("<unnamed>"))
            }
            Self::Namespace(d) => format!("namespace {}", d.name),
        }
    }
}

// ── Aggregates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Struct,
    Union,
    Class,
}

impl AggregateKind {
    #[must_use]
    pub const fn symbol_kind(self) -> SymbolKind {
        match self {
            Self::Struct => SymbolKind::Struct,
            Self::Union => SymbolKind::Union,
            Self::Class => SymbolKind::Class,
        }
    }

    #[must_use]
    pub const fn tag(self) -> Tag {
        match self {
            Self::Struct => Tag::Struct,
            Self::Union => Tag::Union,
            Self::Class => Tag::Class,
        }
    }

    /// Member access when no label is in effect.
    #[must_use]
    pub const fn default_visibility(self) -> Visibility {
        match self {
            Self::Struct | Self::Union => Visibility::Public,
            Self::Class => Visibility::Private,
        }
    }
}

impl std::fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// `struct`/`union`/`class`, either a definition or a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateDecl {
    pub kind: AggregateKind,
    pub name: Option<String>,
    pub scope: Vec<String>,
    pub base: Option<BaseSpec>,
    /// `None` for a forward declaration.
    pub body: Option<Vec<Member>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSpec {
    pub access: Option<Visibility>,
    pub path: Vec<String>,
    pub global: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The access label in effect, if any was written.
    pub access: Option<Visibility>,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Field(FieldDecl),
    Method(FunctionDecl),
    /// Type declared inside the body.
    Nested(Decl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub specifiers: Specifiers,
    pub spec: TypeSpec,
    pub declarator: Declarator,
    pub bit_width: Option<u32>,
    pub span: Span,
}

// ── Enums ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: Option<String>,
    /// `enum class` / `enum struct`.
    pub scoped: bool,
    pub scope: Vec<String>,
    pub underlying: Option<TypeSpec>,
    /// `None` for an opaque declaration.
    pub variants: Option<Vec<EnumeratorDecl>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratorDecl {
    pub name: String,
    pub init: Option<Initializer>,
    pub span: Span,
}

/// Raw initializer tokens, evaluated by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub tokens: Vec<String>,
    pub span: Span,
}

// ── Typedefs, functions, variables, namespaces ─────────────────────

/// `typedef Spec d1, d2;` or C++ `using Name = Type;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefDecl {
    pub spec: TypeSpec,
    pub declarators: Vec<Declarator>,
    pub scope: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub specifiers: Specifiers,
    /// Possibly qualified for out-of-line definitions (`Point::area`).
    pub name: DeclName,
    /// `None` for constructors and destructors.
    pub return_type: Option<ReturnType>,
    pub signature: FunctionSuffix,
    pub scope: Vec<String>,
    pub has_body: bool,
    pub span: Span,
}

impl FunctionDecl {
    /// Written with a `Class::` qualifier outside the class body.
    #[must_use]
    pub fn is_out_of_line(&self) -> bool {
        self.name.path.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    pub spec: TypeSpec,
    pub ops: Vec<PtrOp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub specifiers: Specifiers,
    pub spec: TypeSpec,
    pub declarator: Declarator,
    pub has_initializer: bool,
    pub scope: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub name: String,
    /// Enclosing scope, not including `name`.
    pub scope: Vec<String>,
    pub decls: Vec<Decl>,
    pub span: Span,
}

// ── Types and declarators ──────────────────────────────────────────

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Specifiers {
    pub is_static: bool,
    pub is_extern: bool,
    pub is_register: bool,
    pub is_inline: bool,
    pub is_virtual: bool,
    pub is_explicit: bool,
    pub is_constexpr: bool,
    pub is_mutable: bool,
}

/// Declaration specifiers minus storage class: the base type with its
/// qualifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub base: BaseType,
    pub is_const: bool,
    pub is_volatile: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    /// Canonical keyword spelling, e.g. `unsigned long`.
    Primitive(String),
    Named {
        path: Vec<String>,
        global: bool,
        tag: Option<Tag>,
    },
    /// Definition written inline, only kept inside typedefs.
    Aggregate(Box<AggregateDecl>),
    Enum(Box<EnumDecl>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclName {
    /// Destructors carry a `~` on their last segment.
    pub path: Vec<String>,
    pub span: Span,
}

impl DeclName {
    #[must_use]
    pub fn last(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtrOp {
    Pointer { is_const: bool, is_volatile: bool },
    Reference,
    RvalueReference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    /// Absent in abstract declarators (unnamed parameters, `using` targets).
    pub name: Option<DeclName>,
    /// Pointer and reference operators left of the name, in source order.
    pub ops: Vec<PtrOp>,
    pub suffix: DeclSuffix,
    pub span: Span,
}

impl Declarator {
    /// The name when it is a single unqualified identifier.
    #[must_use]
    pub fn simple_name(&self) -> Option<&str> {
        match &self.name {
            Some(name) if name.path.len() == 1 => Some(name.last()),
            _ => None,
        }
    }

    /// No operators and no suffix: the declared entity has exactly the
    /// specifier's type.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.ops.is_empty() && matches!(self.suffix, DeclSuffix::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclSuffix {
    None,
    /// Dimensions as written, outermost first.
    Array(Vec<Option<String>>),
    Function(FunctionSuffix),
    /// `(*name)(params)`: `inner` holds the operators inside the parentheses.
    FunctionPointer {
        inner: Vec<PtrOp>,
        params: ParamList,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamList {
    pub params: Vec<ParamDecl>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub spec: TypeSpec,
    pub declarator: Declarator,
    pub has_default: bool,
    pub span: Span,
}

impl ParamDecl {
    /// A lone `void` stands for an empty parameter list.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(&self.spec.base, BaseType::Primitive(p) if p == "void")
            && !self.spec.is_const
            && self.declarator.name.is_none()
            && self.declarator.is_plain()
    }
}

/// Parameter list plus trailing qualifiers of a function declarator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSuffix {
    pub params: ParamList,
    pub is_const: bool,
    /// `= 0`.
    pub is_pure: bool,
}
