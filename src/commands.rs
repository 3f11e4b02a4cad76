//! Command orchestration for the CLI: load input, analyze, report.

use crate::analysis::lookup::LookupTable;
use crate::error::{AnalysisError, AppError, InputError};
use crate::io::output::{create_writer, OutputFormat, PurityReport};
use std::path::Path;
use tracing::info;

/// Analyze a source file and report only the methods it declares.
pub fn run_path(path: &Path, format: OutputFormat) -> Result<(), AppError> {
    let table = analyze_path(path)?;
    write_report(&table, format)
}

/// Analyze source text given directly; the report includes every method the
/// analysis saw, externals included.
pub fn run_source(source: &str, format: OutputFormat) -> Result<(), AppError> {
    let table = analyze_text(source)?;
    write_report(&table, format)
}

/// The file-input pipeline: read, analyze, strip external rows.
pub fn analyze_path(path: &Path) -> Result<LookupTable, AppError> {
    if !path.exists() {
        return Err(InputError::PathNotFound(path.to_path_buf()).into());
    }
    let source = std::fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = source.len(), "analyzing source file");
    let table = analyze_text(&source)?;
    Ok(table.strip_external())
}

fn analyze_text(source: &str) -> Result<LookupTable, AppError> {
    let table = crate::analyze_source(source).map_err(AnalysisError::Syntax)?;
    Ok(table)
}

fn write_report(table: &LookupTable, format: OutputFormat) -> Result<(), AppError> {
    let report = PurityReport::from_table(table);
    create_writer(format)
        .write_report(&report)
        .map_err(|err| AnalysisError::Report(err).into())
}
