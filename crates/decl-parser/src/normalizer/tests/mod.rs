use super::*;
pub(super) use crate::parser::parse_source;
pub(super) use decl_core::Visibility;

mod error_tests;

fn normalize_c(source: &str) -> FileSymbols {
    let unit = parse_source("test.c", source, Dialect::C).expect("C parse should succeed");
    normalize(&unit).expect("normalize should succeed")
}

fn normalize_cpp(source: &str) -> FileSymbols {
    let unit = parse_source("test.cpp", source, Dialect::Cpp).expect("C++ parse should succeed");
    normalize(&unit).expect("normalize should succeed")
}

fn normalize_err(source: &str, dialect: Dialect) -> String {
    let unit = parse_source("test", source, dialect).expect("parse should succeed");
    match normalize(&unit) {
        Err(ParserError::Normalization { message, .. }) => message,
        other => panic!("expected a normalization error, got {other:?}"),
    }
}

/// `kind name` per symbol, in output order.
fn listing(symbols: &FileSymbols) -> Vec<String> {
    symbols
        .symbols
        .iter()
        .map(|s| format!("{} {}", s.kind, s.name))
        .collect()
}

fn find<'a>(symbols: &'a FileSymbols, kind: SymbolKind, name: &str) -> &'a Symbol {
    symbols.find(name, kind).unwrap_or_else(|| {
        panic!(
            "{kind} {name:?} not found. Available:\n{}",
            listing(symbols).join("\n")
        )
    })
}

fn id_of(symbols: &FileSymbols, kind: SymbolKind, name: &str) -> SymbolId {
    let wanted = QualifiedName::parse(name);
    let index = symbols
        .symbols
        .iter()
        .position(|s| s.kind == kind && s.name == wanted)
        .unwrap_or_else(|| panic!("{kind} {name:?} not found"));
    SymbolId::new(index)
}

fn aggregate<'a>(symbols: &'a FileSymbols, kind: SymbolKind, name: &str) -> &'a AggregateType {
    find(symbols, kind, name)
        .as_aggregate()
        .unwrap_or_else(|| panic!("{name} has no aggregate payload"))
}

fn function<'a>(symbols: &'a FileSymbols, kind: SymbolKind, name: &str) -> &'a Function {
    find(symbols, kind, name)
        .as_function()
        .unwrap_or_else(|| panic!("{name} has no function payload"))
}

/// `name: type` per field.
fn fields(aggregate: &AggregateType) -> Vec<String> {
    aggregate
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.ty))
        .collect()
}

fn target(ty: &TypeRef) -> Target {
    let mut found = None;
    ty.for_each_named(&mut |named| found = Some(named.target));
    found.unwrap_or_else(|| panic!("{ty} names no type"))
}
