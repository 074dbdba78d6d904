//! Cross-file name resolution and the errors it reports.

use decl_core::{QualifiedName, SourceFile, SymbolKind, Target, TypeRef};
use decl_table::{Analysis, AnalysisOptions, TableError, analyze};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn run(files: &[(&str, &str)]) -> Analysis {
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(path, text)| SourceFile::detect(*path, *text).expect("known extension"))
        .collect();
    analyze(
        &sources,
        AnalysisOptions {
            parallel: false,
            worker_threads: 0,
        },
    )
    .expect("pipeline should run")
}

fn field_type(analysis: &Analysis, owner: &str, index: usize) -> TypeRef {
    let symbol = analysis
        .table
        .lookup(&QualifiedName::parse(owner))
        .map(|(_, s)| s)
        .find(|s| s.kind.is_aggregate())
        .unwrap_or_else(|| panic!("aggregate {owner} missing"));
    symbol.as_aggregate().expect("aggregate payload").fields[index].ty.clone()
}

fn unresolved(analysis: &Analysis) -> Vec<(String, String)> {
    analysis
        .table_errors
        .iter()
        .filter_map(|e| match e {
            TableError::UnresolvedReference {
                symbol, missing, ..
            } => Some((symbol.to_string(), missing.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn placeholder_resolves_to_type_in_other_file() {
    let analysis = run(&[
        ("shapes.h", "struct Rectangle { struct Point origin; int width; };\n"),
        ("point.h", "struct Point { int x; int y; };\n"),
    ]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());
    let ty = field_type(&analysis, "Rectangle", 0);
    let TypeRef::Named(named) = &ty else {
        panic!("expected named type, got {ty:?}");
    };
    let (point_id, _) = analysis
        .table
        .lookup(&QualifiedName::parse("Point"))
        .next()
        .expect("Point");
    assert_eq!(named.target, Target::Resolved(point_id));
}

#[test]
fn innermost_scope_wins() {
    let analysis = run(&[
        ("outer.hpp", "struct Id { int value; };\nnamespace inner { struct Id { long value; }; }\n"),
        ("user.hpp", "namespace inner { struct User { Id id; ::Id global_id; }; }\n"),
    ]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());
    let table = &analysis.table;
    assert_eq!(table.render_type(&field_type(&analysis, "inner::User", 0)), "inner::Id");
    assert_eq!(table.render_type(&field_type(&analysis, "inner::User", 1)), "Id");
}

#[test]
fn render_type_qualifies_resolved_names() {
    let analysis = run(&[(
        "geo.hpp",
        "namespace geometry {\nstruct Point { int x; };\nstruct Segment { const Point* ends[2]; };\n}\n",
    )]);
    let ty = field_type(&analysis, "geometry::Segment", 0);
    assert_eq!(analysis.table.render_type(&ty), "const geometry::Point*[2]");
    assert_eq!(ty.to_string(), "const Point*[2]");
}

#[test]
fn never_defined_name_is_reported_once_per_symbol() {
    let analysis = run(&[(
        "a.h",
        "struct Holder { Missing* first; Missing* second; };\nMissing* make_missing(void);\n",
    )]);
    assert_eq!(
        unresolved(&analysis),
        vec![
            ("Holder".to_string(), "Missing".to_string()),
            ("make_missing".to_string(), "Missing".to_string()),
        ]
    );
    // The rest of the table is still there.
    assert_eq!(analysis.table.len(), 2);
}

#[rstest]
#[case::enum_tag("struct S { enum Mode m; };\nstruct Mode { int x; };\n")]
#[case::union_tag("struct S { union Mode m; };\nstruct Mode { int x; };\n")]
fn tag_must_match_kind(#[case] source: &str) {
    let analysis = run(&[("tags.h", source)]);
    assert_eq!(
        unresolved(&analysis),
        vec![("S".to_string(), "Mode".to_string())]
    );
}

#[test]
fn method_without_class_declaration() {
    let analysis = run(&[
        ("widget.hpp", "class Widget {\npublic:\n    void show();\n};\n"),
        (
            "widget.cpp",
            "void Widget::show() {}\nvoid Widget::hide() {}\nvoid Gadget::run() {}\n",
        ),
    ]);
    assert_eq!(
        unresolved(&analysis),
        vec![
            ("Widget::hide".to_string(), "Widget::hide()".to_string()),
            ("Gadget::run".to_string(), "Gadget".to_string()),
        ]
    );
}

#[test]
fn alias_cycle_is_reported_once() {
    let analysis = run(&[
        ("a.h", "typedef Second First;\n"),
        ("b.h", "typedef First Second;\n"),
    ]);
    let cycles: Vec<Vec<String>> = analysis
        .table_errors
        .iter()
        .filter_map(|e| match e {
            TableError::AliasCycle { aliases, .. } => {
                Some(aliases.iter().map(ToString::to_string).collect())
            }
            _ => None,
        })
        .collect();
    assert_eq!(cycles, vec![vec!["First".to_string(), "Second".to_string()]]);
    assert!(unresolved(&analysis).is_empty());
}

#[test]
fn alias_chain_without_cycle_is_fine() {
    let analysis = run(&[(
        "a.h",
        "typedef int base_t;\ntypedef base_t mid_t;\ntypedef const mid_t top_t;\n",
    )]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());
    let top = analysis
        .table
        .lookup_kind(&QualifiedName::parse("top_t"), SymbolKind::TypedefAlias)
        .and_then(|s| s.alias_target())
        .expect("top_t");
    assert_eq!(analysis.table.render_type(top), "const mid_t");
}
