//! Core data types for symbols extracted from C-family source code.

mod payload;
mod qualified_name;
mod symbol;
mod symbol_kind;
mod type_ref;
mod visibility;

pub use payload::{
    AggregateType, BaseClass, EnumType, EnumVariant, Field, Function, FunctionPointerType,
    GlobalVariable, Namespace, Parameter, Payload, TypedefAlias, Variant,
};
pub use qualified_name::QualifiedName;
pub use symbol::{DefinitionState, Symbol, SymbolId};
pub use symbol_kind::SymbolKind;
pub use type_ref::{NamedType, Tag, Target, TypeRef};
pub use visibility::Visibility;
