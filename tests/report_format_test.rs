//! Report layout and the file-input pipeline.

use pretty_assertions::assert_eq;
use puritymap::commands;
use puritymap::io::output::{format_row, header_lines, PurityReport, METHOD_COLUMN_WIDTH};
use puritymap::{AppError, InputError, Purity};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn rows_align_at_the_fixed_method_column() {
    let line = format_row("void C.f", "Impure");
    assert_eq!(line.len(), METHOD_COLUMN_WIDTH + "Impure".len());
    assert_eq!(&line[METHOD_COLUMN_WIDTH..], "Impure");

    let [header, separator] = header_lines();
    assert_eq!(&header[METHOD_COLUMN_WIDTH..], "PURITY LEVEL");
    assert_eq!(separator.len(), header.len());
}

#[test]
fn file_input_reports_only_declared_methods() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"class C {{ void f() {{ Console.WriteLine("x"); }} int g() {{ return 1; }} }}"#
    )
    .unwrap();

    let table = commands::analyze_path(file.path()).unwrap();
    let report = PurityReport::from_table(&table);
    let rows: Vec<(String, Purity)> = report
        .rows
        .into_iter()
        .map(|row| (row.method, row.purity))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("void C.f".to_string(), Purity::Impure),
            ("int C.g".to_string(), Purity::Pure),
        ]
    );
}

#[test]
fn missing_file_is_an_input_error() {
    let err = commands::analyze_path(std::path::Path::new("/no/such/file.cs")).unwrap_err();
    assert!(matches!(err, AppError::Input(InputError::PathNotFound(_))));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn malformed_source_is_an_analysis_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "class C {{ int f( {{ }}").unwrap();
    let err = commands::analyze_path(file.path()).unwrap_err();
    assert!(matches!(err, AppError::Analysis(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn json_report_serializes_levels_as_tags() {
    let table = puritymap::analyze_source("class C { int f() { return 1; } }").unwrap();
    let report = PurityReport::from_table(&table);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rows"][0]["method"], "int C.f");
    assert_eq!(json["rows"][0]["purity"], "Pure");
}
