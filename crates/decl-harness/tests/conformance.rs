//! Golden-listing conformance over the checked-in fixtures, plus bless mode
//! and failure reporting on scratch fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use decl_config::DeclConfig;
use decl_harness::{FixtureReport, Harness, HarnessError, Mismatch, init_test_logging};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn harness(fixtures_dir: &Path, bless: bool, parallel: bool) -> Harness {
    let mut config = DeclConfig::default();
    config.harness.fixtures_dir = fixtures_dir.to_path_buf();
    config.harness.bless = bless;
    config.analysis.parallel = parallel;
    Harness::new(config)
}

fn assert_passed(report: &FixtureReport) {
    assert!(report.passed(), "{report}");
}

fn copy_fixture(name: &str, into: &Path) -> PathBuf {
    let source = fixtures_root().join(name);
    let target = into.join(name);
    fs::create_dir_all(&target).expect("create fixture dir");
    for entry in fs::read_dir(&source).expect("read fixture") {
        let entry = entry.expect("dir entry");
        fs::copy(entry.path(), target.join(entry.file_name())).expect("copy fixture file");
    }
    target
}

#[rstest]
#[case::c_sequential("c", false)]
#[case::c_parallel("c", true)]
#[case::cpp_sequential("cpp", false)]
#[case::cpp_parallel("cpp", true)]
fn checked_in_fixture_matches_golden(#[case] fixture: &str, #[case] parallel: bool) {
    init_test_logging();
    let root = fixtures_root();
    let report = harness(&root, false, parallel)
        .run_fixture(&root.join(fixture))
        .expect("fixture runs");
    assert_passed(&report);
    assert!(!report.blessed);
}

#[test]
fn run_all_covers_both_dialects() {
    init_test_logging();
    let reports = harness(&fixtures_root(), false, true)
        .run_all()
        .expect("fixtures run");
    let names: Vec<&str> = reports.iter().map(|r| r.fixture.as_str()).collect();
    assert_eq!(names, vec!["c", "cpp"]);
    reports.iter().for_each(assert_passed);
}

#[test]
fn bless_writes_a_golden_file_that_then_passes() {
    init_test_logging();
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = copy_fixture("c", tmp.path());
    fs::remove_file(dir.join("symbols.golden")).expect("remove golden");

    let blessed = harness(tmp.path(), true, false)
        .run_fixture(&dir)
        .expect("bless runs");
    assert!(blessed.blessed);
    assert_passed(&blessed);

    let written = fs::read_to_string(dir.join("symbols.golden")).expect("golden written");
    let checked_in =
        fs::read_to_string(fixtures_root().join("c").join("symbols.golden")).expect("golden");
    assert_eq!(written, checked_in);

    let rerun = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect("rerun");
    assert_passed(&rerun);
}

#[test]
fn edited_golden_reports_structural_differences() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = copy_fixture("c", tmp.path());
    let golden = dir.join("symbols.golden");
    let text = fs::read_to_string(&golden)
        .expect("golden")
        .replace("struct Point | x: int; y: int", "struct Point | x: int; y: int; z: int")
        .replace("function add | (int, int) -> int\n", "")
        .replace("function main | () -> int", "function main | (int, char**) -> int");
    fs::write(&golden, text).expect("edit golden");

    let report = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect("fixture runs");
    let rendered: Vec<String> = report.mismatches.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "members of struct Point: expected `x: int; y: int; z: int`, got `x: int; y: int`",
            "signature of function main: expected `(int, char**) -> int`, got `() -> int`",
            "extra: function add | (int, int) -> int",
        ]
    );
}

#[test]
fn pipeline_errors_are_mismatches() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("broken");
    fs::create_dir(&dir).expect("mkdir");
    fs::write(dir.join("a.h"), "struct Point { int x; };\n").expect("write");
    fs::write(dir.join("b.h"), "struct Point { int x; };\n").expect("write");
    fs::write(dir.join("symbols.golden"), "struct Point | x: int\n").expect("write");

    let report = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect("fixture runs");
    assert_eq!(report.mismatches.len(), 1);
    let Mismatch::Pipeline(message) = &report.mismatches[0] else {
        panic!("expected pipeline mismatch, got {:?}", report.mismatches);
    };
    assert!(message.contains("Point"), "{message}");
}

#[test]
fn missing_golden_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("no_golden");
    fs::create_dir(&dir).expect("mkdir");
    fs::write(dir.join("a.h"), "int f(void);\n").expect("write");

    let err = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect_err("golden is missing");
    assert!(matches!(err, HarnessError::Io { .. }), "{err}");
}

#[test]
fn malformed_golden_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("bad_golden");
    fs::create_dir(&dir).expect("mkdir");
    fs::write(dir.join("a.h"), "int f(void);\n").expect("write");
    fs::write(dir.join("symbols.golden"), "# ok\nfunction\n").expect("write");

    let err = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect_err("golden is malformed");
    assert!(matches!(err, HarnessError::Golden { line: 2, .. }), "{err}");
}

#[test]
fn declared_only_symbols_are_marked() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("declared");
    fs::create_dir(&dir).expect("mkdir");
    fs::write(dir.join("api.h"), "struct Handle;\nint open_handle(struct Handle* h);\n")
        .expect("write");
    fs::write(
        dir.join("symbols.golden"),
        "struct Handle | [declared]\nfunction open_handle | (Handle*) -> int [declared]\n",
    )
    .expect("write");

    let report = harness(tmp.path(), false, false)
        .run_fixture(&dir)
        .expect("fixture runs");
    assert_passed(&report);
}
