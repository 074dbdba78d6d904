use serde::{Deserialize, Serialize};

use super::{SymbolId, SymbolKind};

/// Elaborated type specifier keyword (`struct X`, `enum Y`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Struct,
    Union,
    Enum,
    Class,
}

impl Tag {
    /// Whether a symbol of `kind` can be named through this tag.
    ///
    /// `struct` and `class` keys are interchangeable when naming a type.
    #[must_use]
    pub const fn accepts(self, kind: SymbolKind) -> bool {
        match self {
            Self::Struct | Self::Class => matches!(kind, SymbolKind::Struct | SymbolKind::Class),
            Self::Union => matches!(kind, SymbolKind::Union),
            Self::Enum => matches!(kind, SymbolKind::Enum | SymbolKind::ScopedEnum),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Class => "class",
        };
        write!(f, "{s}")
    }
}

/// Resolution state of a named type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Named but not yet bound to a definition.
    Placeholder,
    /// Bound to a symbol. Inside a single file's output the id is file-local;
    /// inside a symbol table it indexes the table.
    Resolved(SymbolId),
}

/// A reference to a type by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedType {
    /// Path as written, e.g. `["geometry", "Point"]`.
    pub path: Vec<String>,
    /// Written with a leading `::`.
    pub global: bool,
    pub tag: Option<Tag>,
    pub target: Target,
}

impl NamedType {
    #[must_use]
    pub const fn placeholder(path: Vec<String>, global: bool, tag: Option<Tag>) -> Self {
        Self {
            path,
            global,
            tag,
            target: Target::Placeholder,
        }
    }

    #[must_use]
    pub const fn resolved(path: Vec<String>, id: SymbolId) -> Self {
        Self {
            path,
            global: false,
            tag: None,
            target: Target::Resolved(id),
        }
    }

    /// The name as written, without any elaborated tag.
    #[must_use]
    pub fn spelling(&self) -> String {
        let joined = self.path.join("::");
        if self.global { format!("::{joined}") } else { joined }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self.target, Target::Resolved(_))
    }
}

/// A type as used by a field, parameter, return value, alias or variable.
///
/// Not a symbol itself: either a primitive, a wrapper around another
/// reference, or a named reference to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Builtin type spelled with its keywords, e.g. `unsigned long`.
    Primitive(String),
    Named(NamedType),
    Pointer(Box<TypeRef>),
    Reference(Box<TypeRef>),
    RvalueReference(Box<TypeRef>),
    Const(Box<TypeRef>),
    Volatile(Box<TypeRef>),
    Array {
        element: Box<TypeRef>,
        length: Option<String>,
    },
}

impl TypeRef {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    #[must_use]
    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    #[must_use]
    pub fn reference(self) -> Self {
        Self::Reference(Box::new(self))
    }

    #[must_use]
    pub fn constant(self) -> Self {
        Self::Const(Box::new(self))
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(name) if name == "void")
    }

    /// Visit every named reference nested in this type.
    pub fn for_each_named(&self, f: &mut impl FnMut(&NamedType)) {
        match self {
            Self::Primitive(_) => {}
            Self::Named(named) => f(named),
            Self::Pointer(inner)
            | Self::Reference(inner)
            | Self::RvalueReference(inner)
            | Self::Const(inner)
            | Self::Volatile(inner)
            | Self::Array { element: inner, .. } => inner.for_each_named(f),
        }
    }

    pub fn for_each_named_mut(&mut self, f: &mut impl FnMut(&mut NamedType)) {
        match self {
            Self::Primitive(_) => {}
            Self::Named(named) => f(named),
            Self::Pointer(inner)
            | Self::Reference(inner)
            | Self::RvalueReference(inner)
            | Self::Const(inner)
            | Self::Volatile(inner)
            | Self::Array { element: inner, .. } => inner.for_each_named_mut(f),
        }
    }

    /// Render in canonical C spelling, naming each named type through `name_of`.
    ///
    /// Qualifiers go before plain types (`const int`) and after pointers and
    /// references (`char* const`).
    pub fn render_with(&self, name_of: &dyn Fn(&NamedType) -> String) -> String {
        match self {
            Self::Primitive(name) => name.clone(),
            Self::Named(named) => name_of(named),
            Self::Pointer(inner) => format!("{}*", inner.render_with(name_of)),
            Self::Reference(inner) => format!("{}&", inner.render_with(name_of)),
            Self::RvalueReference(inner) => format!("{}&&", inner.render_with(name_of)),
            Self::Const(inner) => qualify("const", inner, name_of),
            Self::Volatile(inner) => qualify("volatile", inner, name_of),
            Self::Array { .. } => {
                // Outermost dimension first, as written: `int[2][3]`.
                let mut dims = String::new();
                let mut current = self;
                while let Self::Array { element, length } = current {
                    dims.push('[');
                    dims.push_str(length.as_deref().unwrap_or_default());
                    dims.push(']');
                    current = &**element;
                }
                format!("{}{dims}", current.render_with(name_of))
            }
        }
    }
}

fn qualify(qualifier: &str, inner: &TypeRef, name_of: &dyn Fn(&NamedType) -> String) -> String {
    match inner {
        TypeRef::Pointer(_) | TypeRef::Reference(_) | TypeRef::RvalueReference(_) => {
            format!("{} {qualifier}", inner.render_with(name_of))
        }
        _ => format!("{qualifier} {}", inner.render_with(name_of)),
    }
}

/// Renders the type as written.
impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render_with(&NamedType::spelling))
    }
}
