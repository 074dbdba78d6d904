//! Scheduling and failure handling of the whole-input pipeline.

use decl_core::{QualifiedName, SourceFile, SymbolKind};
use decl_table::{Analysis, AnalysisOptions, analyze};
use pretty_assertions::assert_eq;
use rstest::rstest;

const HEADER: &str = "\
struct Point { int x; int y; };
typedef int (*Visitor)(struct Point*);
enum Mode { IDLE, BUSY = 4, DONE };
int visit_all(Visitor visitor);
extern int counter;
";

const SOURCE: &str = "\
int counter = 0;
int visit_all(Visitor visitor) { return 0; }
static int helper(struct Point p) { return p.x; }
";

fn inputs() -> Vec<SourceFile> {
    let mut files = vec![
        SourceFile::detect("core.h", HEADER).expect("header"),
        SourceFile::detect("core.c", SOURCE).expect("source"),
    ];
    for index in 0..8 {
        let text = format!("struct Extra{index} {{ struct Point at; Visitor on_visit; }};\n");
        files.push(SourceFile::detect(format!("extra{index}.h"), text).expect("extra"));
    }
    files
}

fn run(files: &[SourceFile], parallel: bool, worker_threads: usize) -> Analysis {
    analyze(
        files,
        AnalysisOptions {
            parallel,
            worker_threads,
        },
    )
    .expect("pipeline should run")
}

#[rstest]
#[case::default_pool(0)]
#[case::single_worker(1)]
#[case::four_workers(4)]
fn parallel_matches_sequential(#[case] workers: usize) {
    let files = inputs();
    let sequential = run(&files, false, 0);
    let parallel = run(&files, true, workers);
    assert!(sequential.is_clean(), "{:?}", sequential.error_messages());
    assert_eq!(parallel, sequential);
}

#[test]
fn repeated_runs_are_identical() {
    let files = inputs();
    assert_eq!(run(&files, true, 0), run(&files, true, 0));
}

#[test]
fn default_options_are_parallel() {
    let options = AnalysisOptions::default();
    assert!(options.parallel);
    assert_eq!(options.worker_threads, 0);
}

#[test]
fn broken_file_is_skipped_and_recorded() {
    let files = vec![
        SourceFile::detect("good.h", "struct Good { int value; };\n").expect("good"),
        SourceFile::detect("bad.h", "struct Bad { int value; \n").expect("bad"),
        SourceFile::detect("user.h", "struct User { struct Good good; };\n").expect("user"),
    ];
    let analysis = run(&files, true, 2);

    assert_eq!(analysis.file_errors.len(), 1);
    assert_eq!(analysis.file_errors[0].path, "bad.h");
    assert!(analysis.table_errors.is_empty());

    let names: Vec<String> = analysis.table.iter().map(|(_, s)| s.name.to_string()).collect();
    assert_eq!(names, vec!["Good", "User"]);
    assert!(analysis.table.files().iter().all(|path| path != "bad.h"));
}

#[test]
fn error_messages_list_file_errors_first() {
    let files = vec![
        SourceFile::detect("a.h", "struct S { Unknown u; };\n").expect("a"),
        SourceFile::detect("b.h", "int broken(\n").expect("b"),
    ];
    let analysis = run(&files, false, 0);
    let messages = analysis.error_messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("b.h"), "{messages:?}");
    assert!(messages[1].contains("Unknown"), "{messages:?}");
}

#[test]
fn empty_input_gives_empty_table() {
    let analysis = run(&[], true, 0);
    assert!(analysis.is_clean());
    assert!(analysis.table.is_empty());
}

#[test]
fn file_order_decides_handles_not_content() {
    let files = inputs();
    let analysis = run(&files, true, 0);
    let (point, _) = analysis
        .table
        .lookup(&QualifiedName::parse("Point"))
        .next()
        .expect("Point");
    assert_eq!(point.index(), 0);
    assert_eq!(
        analysis
            .table
            .lookup_kind(&QualifiedName::parse("helper"), SymbolKind::Function)
            .map(|s| s.location.path.as_str()),
        Some("core.c")
    );
}
