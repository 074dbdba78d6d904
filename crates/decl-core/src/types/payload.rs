use serde::{Deserialize, Serialize};

use super::{QualifiedName, SymbolId, Target, TypeRef, Visibility};

/// Kind-specific data carried by a `Symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Aggregate(AggregateType),
    Enum(EnumType),
    EnumVariant(EnumVariant),
    Alias(TypedefAlias),
    FunctionPointer(FunctionPointerType),
    Function(Function),
    Namespace(Namespace),
    Variable(GlobalVariable),
}

/// A data member of a struct, union or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub bit_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseClass {
    pub access: Visibility,
    pub ty: TypeRef,
}

/// Payload of struct, union and class symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateType {
    pub fields: Vec<Field>,
    /// Member functions declared or defined inside the body.
    pub methods: Vec<SymbolId>,
    /// Types defined inside the body.
    pub nested: Vec<SymbolId>,
    pub base: Option<BaseClass>,
    /// The canonical name came from a `typedef` over the aggregate.
    pub typedef_name: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub value: i64,
}

/// Payload of enum and scoped enum symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub variants: Vec<Variant>,
    /// Variant names stay inside the enum's own scope (`enum class`).
    pub scoped: bool,
    pub underlying: Option<TypeRef>,
}

/// Payload of an enumerator symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub owner: SymbolId,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefAlias {
    pub target: TypeRef,
}

/// Signature of a pointer-to-function type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionPointerType {
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
    pub variadic: bool,
}

impl FunctionPointerType {
    /// `ret (*)(params)` with every type rendered through `render`.
    pub fn render_with(&self, render: &dyn Fn(&TypeRef) -> String) -> String {
        let mut params: Vec<String> = self.params.iter().map(render).collect();
        if self.variadic {
            params.push("...".to_string());
        }
        format!("{} (*)({})", render(&self.return_type), params.join(", "))
    }

    /// The signature as written. Doubles as the symbol's name segment.
    #[must_use]
    pub fn spelling(&self) -> String {
        self.render_with(&|ty: &TypeRef| ty.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub has_default: bool,
}

/// Payload of free functions and methods.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// `None` for constructors and destructors.
    pub return_type: Option<TypeRef>,
    pub params: Vec<Parameter>,
    pub variadic: bool,
    pub is_const: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_pure: bool,
    /// Member access; `None` for free functions.
    pub visibility: Option<Visibility>,
    /// Enclosing class path for methods.
    pub owner: Option<QualifiedName>,
    /// A declaration inside the class body has been seen.
    pub declared_in_class: bool,
}

impl Function {
    /// Parameter types and constness as written; identifies an overload.
    #[must_use]
    pub fn signature_key(&self) -> String {
        let mut params: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
        if self.variadic {
            params.push("...".to_string());
        }
        let suffix = if self.is_const { " const" } else { "" };
        format!("({}){suffix}", params.join(", "))
    }

    #[must_use]
    pub const fn is_special_member(&self) -> bool {
        self.return_type.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Symbols declared directly inside, in declaration order.
    pub members: Vec<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub ty: TypeRef,
    pub is_extern: bool,
    pub is_static: bool,
}

impl Payload {
    /// Visit every type reference carried by the payload.
    pub fn for_each_type_ref(&self, f: &mut impl FnMut(&TypeRef)) {
        match self {
            Self::Aggregate(aggregate) => {
                if let Some(base) = &aggregate.base {
                    f(&base.ty);
                }
                aggregate.fields.iter().for_each(|field| f(&field.ty));
            }
            Self::Enum(en) => {
                if let Some(underlying) = &en.underlying {
                    f(underlying);
                }
            }
            Self::Alias(alias) => f(&alias.target),
            Self::FunctionPointer(sig) => {
                f(&sig.return_type);
                sig.params.iter().for_each(|p| f(p));
            }
            Self::Function(func) => {
                if let Some(ret) = &func.return_type {
                    f(ret);
                }
                func.params.iter().for_each(|p| f(&p.ty));
            }
            Self::Variable(var) => f(&var.ty),
            Self::EnumVariant(_) | Self::Namespace(_) => {}
        }
    }

    pub fn for_each_type_ref_mut(&mut self, f: &mut impl FnMut(&mut TypeRef)) {
        match self {
            Self::Aggregate(aggregate) => {
                if let Some(base) = &mut aggregate.base {
                    f(&mut base.ty);
                }
                aggregate.fields.iter_mut().for_each(|field| f(&mut field.ty));
            }
            Self::Enum(en) => {
                if let Some(underlying) = &mut en.underlying {
                    f(underlying);
                }
            }
            Self::Alias(alias) => f(&mut alias.target),
            Self::FunctionPointer(sig) => {
                f(&mut sig.return_type);
                sig.params.iter_mut().for_each(|p| f(p));
            }
            Self::Function(func) => {
                if let Some(ret) = &mut func.return_type {
                    f(ret);
                }
                func.params.iter_mut().for_each(|p| f(&mut p.ty));
            }
            Self::Variable(var) => f(&mut var.ty),
            Self::EnumVariant(_) | Self::Namespace(_) => {}
        }
    }

    /// Rewrite every symbol handle through `map`: member lists, variant
    /// owners and resolved type targets.
    ///
    /// Members that map to `None` are dropped and members that map to the
    /// same handle are kept once; type targets that map to `None` fall back
    /// to placeholders so they can be resolved by name.
    pub fn remap_ids(&mut self, map: &impl Fn(SymbolId) -> Option<SymbolId>) {
        match self {
            Self::Aggregate(aggregate) => {
                aggregate.methods = remap_list(&aggregate.methods, map);
                aggregate.nested = remap_list(&aggregate.nested, map);
            }
            Self::Namespace(ns) => {
                ns.members = remap_list(&ns.members, map);
            }
            Self::EnumVariant(variant) => {
                if let Some(owner) = map(variant.owner) {
                    variant.owner = owner;
                }
            }
            _ => {}
        }
        self.for_each_type_ref_mut(&mut |ty| {
            ty.for_each_named_mut(&mut |named| {
                if let Target::Resolved(id) = named.target {
                    named.target = map(id).map_or(Target::Placeholder, Target::Resolved);
                }
            });
        });
    }
}

fn remap_list(ids: &[SymbolId], map: &impl Fn(SymbolId) -> Option<SymbolId>) -> Vec<SymbolId> {
    let mut out: Vec<SymbolId> = Vec::with_capacity(ids.len());
    for id in ids.iter().filter_map(|id| map(*id)) {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}


#[cfg(test)]
mod remap_tests {
    use super::*;
    use crate::types::NamedType;

    #[test]
    fn unmapped_members_are_dropped_and_targets_become_placeholders() {
        let mut ns = Payload::Namespace(Namespace {
            members: vec![SymbolId::new(0), SymbolId::new(1), SymbolId::new(2)],
        });
        ns.remap_ids(&|id| (id.index() != 1).then_some(id));
        assert_eq!(
            ns,
            Payload::Namespace(Namespace {
                members: vec![SymbolId::new(0), SymbolId::new(2)],
            })
        );

        let mut alias = Payload::Alias(TypedefAlias {
            target: TypeRef::Named(NamedType::resolved(vec!["S".into()], SymbolId::new(4))),
        });
        alias.remap_ids(&|_| None);
        let Payload::Alias(alias) = alias else {
            panic!("alias payload expected");
        };
        let mut targets = Vec::new();
        alias.target.for_each_named(&mut |n| targets.push(n.target));
        assert_eq!(targets, vec![Target::Placeholder]);
    }

    #[test]
    fn members_merged_into_one_handle_are_listed_once() {
        let mut ns = Payload::Namespace(Namespace {
            members: vec![SymbolId::new(0), SymbolId::new(1), SymbolId::new(2)],
        });
        ns.remap_ids(&|id| Some(SymbolId::new(id.index().min(1))));
        assert_eq!(
            ns,
            Payload::Namespace(Namespace {
                members: vec![SymbolId::new(0), SymbolId::new(1)],
            })
        );
    }
}
