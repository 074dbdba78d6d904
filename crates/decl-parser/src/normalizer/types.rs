//! Type references from specifiers and declarators.

use decl_core::{
    DefinitionState, FunctionPointerType, NamedType, Payload, QualifiedName, Span, SymbolKind,
    TypeRef,
};

use super::Normalizer;
use crate::ast::{BaseType, DeclSuffix, Declarator, ParamList, PtrOp, TypeSpec};
use crate::error::ParserError;

impl Normalizer<'_> {
    /// The type named by a specifier sequence, cv-qualifiers included.
    pub(super) fn spec_type(&self, spec: &TypeSpec, lookup: &[String]) -> Result<TypeRef, ParserError> {
        let base = match &spec.base {
            BaseType::Primitive(name) => TypeRef::Primitive(name.clone()),
            BaseType::Named { path, global, tag } => {
                TypeRef::Named(self.named(path, *global, *tag, lookup))
            }
            BaseType::Aggregate(_) | BaseType::Enum(_) => {
                return Err(ParserError::normalization(
                    "type definition cannot appear here",
                    spec.span,
                ));
            }
        };
        Ok(Self::qualify(base, spec))
    }

    pub(super) fn qualify(base: TypeRef, spec: &TypeSpec) -> TypeRef {
        let ty = if spec.is_volatile {
            TypeRef::Volatile(Box::new(base))
        } else {
            base
        };
        if spec.is_const { ty.constant() } else { ty }
    }

    /// Apply `*`, `&` and `&&` left to right.
    pub(super) fn apply_ops(base: TypeRef, ops: &[PtrOp]) -> TypeRef {
        ops.iter().fold(base, |ty, op| match *op {
            PtrOp::Pointer {
                is_const,
                is_volatile,
            } => {
                let ty = ty.pointer();
                let ty = if is_volatile {
                    TypeRef::Volatile(Box::new(ty))
                } else {
                    ty
                };
                if is_const { ty.constant() } else { ty }
            }
            PtrOp::Reference => ty.reference(),
            PtrOp::RvalueReference => TypeRef::RvalueReference(Box::new(ty)),
        })
    }

    /// Full type of a declared entity: specifier, operators, then suffix.
    pub(super) fn declared_type(
        &mut self,
        spec: &TypeSpec,
        declarator: &Declarator,
        scope: &QualifiedName,
        lookup: &[String],
    ) -> Result<TypeRef, ParserError> {
        let base = self.spec_type(spec, lookup)?;
        self.apply_declarator(base, declarator, scope, lookup)
    }

    pub(super) fn apply_declarator(
        &mut self,
        base: TypeRef,
        declarator: &Declarator,
        scope: &QualifiedName,
        lookup: &[String],
    ) -> Result<TypeRef, ParserError> {
        let ty = Self::apply_ops(base, &declarator.ops);
        match &declarator.suffix {
            DeclSuffix::None => Ok(ty),
            // Innermost dimension wraps first so the outermost ends on top.
            DeclSuffix::Array(dims) => Ok(dims.iter().rev().fold(ty, |element, length| {
                TypeRef::Array {
                    element: Box::new(element),
                    length: length.clone(),
                }
            })),
            DeclSuffix::Function(_) => Err(ParserError::normalization(
                "function declarator used as an object type",
                declarator.span,
            )),
            DeclSuffix::FunctionPointer { inner, params } => {
                let pointer = self.function_pointer(ty, params, scope, lookup, declarator.span)?;
                // The first inner `*` is the function pointer itself.
                let (first, rest) = inner.split_first().map_or((None, &[][..]), |(f, r)| (Some(f), r));
                let pointer = match first {
                    Some(PtrOp::Pointer { is_const: true, .. }) => pointer.constant(),
                    _ => pointer,
                };
                Ok(Self::apply_ops(pointer, rest))
            }
        }
    }

    /// Intern the structural `FunctionPointerType` for a signature, one per
    /// spelling and scope, and refer to it by handle.
    fn function_pointer(
        &mut self,
        return_type: TypeRef,
        list: &ParamList,
        scope: &QualifiedName,
        lookup: &[String],
        span: Span,
    ) -> Result<TypeRef, ParserError> {
        let params = self
            .parameters(list, scope, lookup)?
            .into_iter()
            .map(|param| param.ty)
            .collect();
        let signature = FunctionPointerType {
            return_type,
            params,
            variadic: list.variadic,
        };
        let spelling = signature.spelling();
        let path = scope.child(spelling.clone());

        let id = if let Some(&id) = self.fn_pointers.get(&path) {
            id
        } else {
            let id = self.push(
                path.clone(),
                SymbolKind::FunctionPointerType,
                DefinitionState::Defined,
                span,
                Payload::FunctionPointer(signature),
            );
            self.fn_pointers.insert(path, id);
            id
        };
        Ok(TypeRef::Named(NamedType::resolved(vec![spelling], id)))
    }
}
