use super::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::shift("enum E { A = 1 << 2 };", "cannot evaluate enumerator initializer `1 << 2`")]
#[case::other_variant("enum E { A, B, C = A + 1 };", "cannot evaluate enumerator initializer `A + 1`")]
#[case::sizeof("enum E { A = sizeof(int) };", "cannot evaluate enumerator initializer `sizeof ( int )`")]
#[case::duplicate_value("enum E { A = 1, B = 0, C };", "enumerators `A` and `C` share the value 1")]
fn enumerator_initializers(#[case] source: &str, #[case] message: &str) {
    assert_eq!(normalize_err(source, Dialect::C), message);
}

#[test]
fn anonymous_struct_aliased_only_by_pointer() {
    let message = normalize_err("typedef struct { int x; } *Handle;", Dialect::C);
    assert_eq!(message, "anonymous type is only aliased through a pointer or array");
}

#[test]
fn qualified_variable_definition() {
    let message = normalize_err("struct S { static int count; };\nint S::count = 0;\n", Dialect::Cpp);
    assert_eq!(message, "qualified variable definition");
}

#[test]
fn normalization_error_reports_position() {
    let unit = parse_source("test.c", "int x;\nenum E {\n    A = 1 << 2\n};\n", Dialect::C)
        .expect("parse should succeed");
    let err = normalize(&unit).expect_err("initializer should be rejected");
    assert_eq!(err.position().line, 3);
}
