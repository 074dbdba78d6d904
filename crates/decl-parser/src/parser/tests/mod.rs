use super::*;
pub(super) use crate::ast::{
    AggregateDecl, AggregateKind, BaseType, DeclSuffix, EnumDecl, FunctionDecl, MemberKind,
    NamespaceDecl, PtrOp, TypedefDecl, VariableDecl,
};
pub(super) use decl_core::{Dialect, Tag, Visibility};


fn parse_c(source: &str) -> TranslationUnit {
    parse_source("test.c", source, Dialect::C).expect("C parse should succeed")
}

fn parse_cpp(source: &str) -> TranslationUnit {
    parse_source("test.cpp", source, Dialect::Cpp).expect("C++ parse should succeed")
}

fn describe_all(decls: &[Decl]) -> Vec<String> {
    decls.iter().map(Decl::describe).collect()
}

fn find_decl<'a>(decls: &'a [Decl], description: &str) -> &'a Decl {
    decls.iter().find(|d| d.describe() == description).unwrap_or_else(|| {
        panic!(
            "declaration {description:?} not found. Available:\n{}",
            describe_all(decls).join("\n")
        )
    })
}

fn aggregate<'a>(decls: &'a [Decl], description: &str) -> &'a AggregateDecl {
    match find_decl(decls, description) {
        Decl::Aggregate(agg) => agg,
        other => panic!("expected aggregate, got {other:?}"),
    }
}

fn function<'a>(decls: &'a [Decl], description: &str) -> &'a FunctionDecl {
    match find_decl(decls, description) {
        Decl::Function(func) => func,
        other => panic!("expected function, got {other:?}"),
    }
}

fn typedef<'a>(decls: &'a [Decl], description: &str) -> &'a TypedefDecl {
    match find_decl(decls, description) {
        Decl::Typedef(td) => td,
        other => panic!("expected typedef, got {other:?}"),
    }
}

fn field_names(agg: &AggregateDecl) -> Vec<String> {
    agg.body
        .iter()
        .flatten()
        .filter_map(|m| match &m.kind {
            MemberKind::Field(f) => f.declarator.simple_name().map(str::to_string),
            _ => None,
        })
        .collect()
}

fn primitive(spec_base: &BaseType) -> &str {
    match spec_base {
        BaseType::Primitive(p) => p,
        other => panic!("expected primitive, got {other:?}"),
    }
}

fn unsupported_construct(result: Result<TranslationUnit, ParserError>) -> String {
    match result {
        Err(ParserError::UnsupportedConstruct { construct, .. }) => construct,
        other => panic!("expected UnsupportedConstruct, got {other:?}"),
    }
}
