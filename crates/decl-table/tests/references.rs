//! Reverse lookup over bound type references, and per-file includes.

use decl_core::{QualifiedName, SourceFile, SymbolId, SymbolKind};
use decl_table::{Analysis, AnalysisOptions, analyze};
use pretty_assertions::assert_eq;

fn run(files: &[(&str, &str)]) -> Analysis {
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(path, text)| SourceFile::detect(*path, *text).expect("known extension"))
        .collect();
    let options = AnalysisOptions {
        parallel: false,
        worker_threads: 0,
    };
    analyze(&sources, options).expect("pipeline should run")
}

fn id(analysis: &Analysis, name: &str, kind: SymbolKind) -> SymbolId {
    analysis
        .table
        .lookup(&QualifiedName::parse(name))
        .find(|(_, s)| s.kind == kind)
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("{kind} {name} missing"))
}

fn users(analysis: &Analysis, definition: SymbolId) -> Vec<String> {
    analysis
        .table
        .references_to(definition)
        .map(|(_, s)| format!("{} {}", s.kind, s.name))
        .collect()
}

fn used_by(analysis: &Analysis, usage: SymbolId) -> Vec<String> {
    analysis
        .table
        .references_from(usage)
        .map(|(_, s)| format!("{} {}", s.kind, s.name))
        .collect()
}

const SHAPES_H: &str = "typedef struct { int x; int y; } Point;\n\
                        struct Rect { Point origin; Point corner; };\n";
const SHAPES_C: &str = "Point make_point(int x, int y);\n\
                        int area(const struct Rect* r);\n\
                        extern Point home;\n";

// ── Reverse references ─────────────────────────────────────────

#[test]
fn users_of_a_type_span_files_and_are_listed_once() {
    let analysis = run(&[("shapes.h", SHAPES_H), ("shapes.c", SHAPES_C)]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());

    let point = id(&analysis, "Point", SymbolKind::Struct);
    assert_eq!(
        users(&analysis, point),
        vec!["struct Rect", "function make_point", "global_variable home"]
    );

    let rect = id(&analysis, "Rect", SymbolKind::Struct);
    assert_eq!(users(&analysis, rect), vec!["function area"]);
}

#[test]
fn forward_references_follow_declaration_order() {
    let analysis = run(&[
        ("shapes.h", SHAPES_H),
        ("io.h", "struct Rect* clip(Point* at, struct Rect* r);\n"),
    ]);
    let clip = id(&analysis, "clip", SymbolKind::Function);
    assert_eq!(used_by(&analysis, clip), vec!["struct Rect", "struct Point"]);

    let point = id(&analysis, "Point", SymbolKind::Struct);
    assert!(used_by(&analysis, point).is_empty());
}

#[test]
fn unresolved_names_leave_no_edges() {
    let analysis = run(&[("holder.h", "struct Holder { struct Missing* m; int n; };\n")]);
    assert_eq!(analysis.table_errors.len(), 1);
    assert!(analysis.table.references().is_empty());
    let holder = id(&analysis, "Holder", SymbolKind::Struct);
    assert!(used_by(&analysis, holder).is_empty());
}

#[test]
fn aliases_and_function_pointers_are_links_in_the_graph() {
    let analysis = run(&[(
        "sort.h",
        "typedef struct { int key; } Item;\n\
         typedef int (*Compare)(const Item*, const Item*);\n\
         void sort_items(Item* items, int count, Compare cmp);\n",
    )]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());

    let (_, signature) = analysis
        .table
        .of_kind(SymbolKind::FunctionPointerType)
        .next()
        .expect("interned signature");
    let signature = format!("{} {}", signature.kind, signature.name);

    let compare = id(&analysis, "Compare", SymbolKind::TypedefAlias);
    assert_eq!(used_by(&analysis, compare), vec![signature.clone()]);
    assert_eq!(users(&analysis, compare), vec!["function sort_items"]);

    let item = id(&analysis, "Item", SymbolKind::Struct);
    assert_eq!(users(&analysis, item), vec![signature, "function sort_items".to_string()]);
}

#[test]
fn methods_referring_to_their_class_are_users() {
    let analysis = run(&[(
        "point.hpp",
        "class Point {\npublic:\n    int distance_to(const Point& other) const;\n};\n",
    )]);
    assert!(analysis.is_clean(), "{:?}", analysis.error_messages());
    let point = id(&analysis, "Point", SymbolKind::Class);
    assert_eq!(users(&analysis, point), vec!["method Point::distance_to"]);
}

#[test]
fn edge_list_matches_both_indexes() {
    let analysis = run(&[("shapes.h", SHAPES_H), ("shapes.c", SHAPES_C)]);
    for edge in analysis.table.references() {
        assert!(
            analysis
                .table
                .references_to(edge.definition)
                .any(|(usage, _)| usage == edge.usage)
        );
        assert!(
            analysis
                .table
                .references_from(edge.usage)
                .any(|(definition, _)| definition == edge.definition)
        );
    }
    // Rect -> Point, make_point -> Point, area -> Rect, home -> Point.
    assert_eq!(analysis.table.references().len(), 4);
}

// ── Includes ───────────────────────────────────────────────────

#[test]
fn includes_are_recorded_per_file() {
    let analysis = run(&[
        ("include/shapes.h", SHAPES_H),
        (
            "src/main.c",
            "#include \"shapes.h\"\n#include <stdio.h>\n#include \"config.h\"\nint ready;\n",
        ),
    ]);
    let targets: Vec<(&str, bool)> = analysis
        .table
        .includes("src/main.c")
        .iter()
        .map(|i| (i.target.as_str(), i.system))
        .collect();
    assert_eq!(
        targets,
        vec![("shapes.h", false), ("stdio.h", true), ("config.h", false)]
    );
    assert_eq!(analysis.table.included_files("src/main.c"), vec!["include/shapes.h"]);
    assert!(analysis.table.includes("include/shapes.h").is_empty());
    assert!(analysis.table.includes("missing.c").is_empty());
}
