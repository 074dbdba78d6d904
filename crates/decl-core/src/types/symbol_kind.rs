use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CoreError;

/// The kind of a symbol in the unified model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Struct,
    Union,
    Enum,
    ScopedEnum,
    TypedefAlias,
    FunctionPointerType,
    Class,
    Namespace,
    Function,
    Method,
    GlobalVariable,
    EnumVariant,
}

impl SymbolKind {
    pub const ALL: [Self; 12] = [
        Self::Struct,
        Self::Union,
        Self::Enum,
        Self::ScopedEnum,
        Self::TypedefAlias,
        Self::FunctionPointerType,
        Self::Class,
        Self::Namespace,
        Self::Function,
        Self::Method,
        Self::GlobalVariable,
        Self::EnumVariant,
    ];

    /// Kinds a type name can refer to.
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::Struct
                | Self::Union
                | Self::Enum
                | Self::ScopedEnum
                | Self::TypedefAlias
                | Self::FunctionPointerType
                | Self::Class
        )
    }

    #[must_use]
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Struct | Self::Union | Self::Class)
    }

    #[must_use]
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::ScopedEnum => "scoped_enum",
            Self::TypedefAlias => "typedef_alias",
            Self::FunctionPointerType => "function_pointer_type",
            Self::Class => "class",
            Self::Namespace => "namespace",
            Self::Function => "function",
            Self::Method => "method",
            Self::GlobalVariable => "global_variable",
            Self::EnumVariant => "enum_variant",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SymbolKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_like_display() {
        for kind in SymbolKind::ALL {
            let value = serde_json::to_value(kind).expect("serialize kind");
            assert_eq!(value.as_str(), Some(kind.to_string().as_str()));
        }
    }

    #[test]
    fn kind_parses_from_display() {
        for kind in SymbolKind::ALL {
            assert_eq!(kind.to_string().parse::<SymbolKind>(), Ok(kind));
        }
        assert!("trait".parse::<SymbolKind>().is_err());
    }

    #[test]
    fn type_kinds() {
        assert!(SymbolKind::Class.is_type());
        assert!(SymbolKind::FunctionPointerType.is_type());
        assert!(!SymbolKind::Namespace.is_type());
        assert!(!SymbolKind::EnumVariant.is_type());
    }
}
