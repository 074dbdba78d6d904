//! # decl-core
//!
//! Unified symbol model shared by every declscope crate.
//!
//! This crate provides the foundational types the pipeline passes around:
//! - Source files, dialect selection, positions and spans
//! - `Symbol` with its kind, definition state and kind-specific payload
//! - Qualified names and type references (primitive, wrapped, named)
//! - Cross-cutting error types

pub mod dialect;
pub mod errors;
pub mod source;
pub mod types;

pub use dialect::Dialect;
pub use errors::CoreError;
pub use source::{Position, SourceFile, SourceLocation, Span};
pub use types::{
    AggregateType, BaseClass, DefinitionState, EnumType, EnumVariant, Field, Function,
    FunctionPointerType, GlobalVariable, NamedType, Namespace, Parameter, Payload, QualifiedName,
    Symbol, SymbolId, SymbolKind, Tag, Target, TypeRef, TypedefAlias, Variant, Visibility,
};
