use serde::{Deserialize, Serialize};

use super::{
    AggregateType, EnumType, Function, GlobalVariable, Namespace, Payload, QualifiedName,
    SymbolKind, TypeRef,
};
use crate::{Dialect, SourceLocation};

/// Handle to a symbol: an index into a file's symbol list or into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(u32);

impl SymbolId {
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Forward declaration (prototype, `extern`, `struct S;`) versus definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionState {
    Declared,
    Defined,
}

impl DefinitionState {
    #[must_use]
    pub const fn is_defined(self) -> bool {
        matches!(self, Self::Defined)
    }

    /// State after seeing both declarations.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        if self.is_defined() || other.is_defined() {
            Self::Defined
        } else {
            Self::Declared
        }
    }
}

/// A declared entity in the unified model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: QualifiedName,
    pub kind: SymbolKind,
    pub dialect: Dialect,
    pub location: SourceLocation,
    pub state: DefinitionState,
    pub payload: Payload,
}

impl Symbol {
    /// Scope in which type names used by this symbol are looked up.
    ///
    /// Aggregates look inside themselves first; everything else starts at
    /// its enclosing scope.
    #[must_use]
    pub fn lookup_scope(&self) -> &[String] {
        if self.kind.is_aggregate() {
            self.name.segments()
        } else {
            self.name.scope()
        }
    }

    /// Distinguishes overloads sharing a qualified name.
    ///
    /// C has no overloading, so only C++ callables carry a key.
    #[must_use]
    pub fn overload_key(&self) -> Option<String> {
        match (&self.payload, self.dialect) {
            (Payload::Function(func), Dialect::Cpp) => Some(func.signature_key()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_aggregate(&self) -> Option<&AggregateType> {
        match &self.payload {
            Payload::Aggregate(aggregate) => Some(aggregate),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_enum(&self) -> Option<&EnumType> {
        match &self.payload {
            Payload::Enum(en) => Some(en),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_function(&self) -> Option<&Function> {
        match &self.payload {
            Payload::Function(func) => Some(func),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_namespace(&self) -> Option<&Namespace> {
        match &self.payload {
            Payload::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_variable(&self) -> Option<&GlobalVariable> {
        match &self.payload {
            Payload::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Target of a typedef or `using` alias.
    #[must_use]
    pub const fn alias_target(&self) -> Option<&TypeRef> {
        match &self.payload {
            Payload::Alias(alias) => Some(&alias.target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parameter, TypeRef};
    use crate::Position;

    fn method(dialect: Dialect) -> Symbol {
        Symbol {
            name: QualifiedName::parse("geometry::Point::distance_to"),
            kind: SymbolKind::Method,
            dialect,
            location: SourceLocation::new("types.hpp", Position::START),
            state: DefinitionState::Declared,
            payload: Payload::Function(Function {
                return_type: Some(TypeRef::primitive("int")),
                params: vec![Parameter {
                    name: Some("other".into()),
                    ty: TypeRef::primitive("int"),
                    has_default: false,
                }],
                variadic: false,
                is_const: true,
                is_static: false,
                is_virtual: false,
                is_pure: false,
                visibility: None,
                owner: Some(QualifiedName::parse("geometry::Point")),
                declared_in_class: true,
            }),
        }
    }

    #[test]
    fn state_combine_prefers_definition() {
        use DefinitionState::{Declared, Defined};
        assert_eq!(Declared.combine(Declared), Declared);
        assert_eq!(Declared.combine(Defined), Defined);
        assert_eq!(Defined.combine(Declared), Defined);
    }

    #[test]
    fn only_cpp_callables_have_overload_keys() {
        assert_eq!(method(Dialect::Cpp).overload_key().as_deref(), Some("(int) const"));
        assert_eq!(method(Dialect::C).overload_key(), None);
    }

    #[test]
    fn method_lookup_scope_is_its_class() {
        assert_eq!(method(Dialect::Cpp).lookup_scope(), ["geometry", "Point"]);
    }
}
