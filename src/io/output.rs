//! Report model and output writers.

use crate::analysis::lookup::LookupTable;
use crate::core::Purity;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// Width of the method column; the level name starts at this column.
pub const METHOD_COLUMN_WIDTH: usize = 80;

const LEVEL_HEADER: &str = "PURITY LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub method: String,
    pub purity: Purity,
}

/// One row per method, in lookup-table insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurityReport {
    pub rows: Vec<ReportRow>,
}

impl PurityReport {
    pub fn from_table(table: &LookupTable) -> Self {
        Self {
            rows: table
                .iter()
                .map(|(method, purity)| ReportRow {
                    method: method.display().to_string(),
                    purity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &PurityReport) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Table => Box::new(TableWriter::new()),
        OutputFormat::Json => Box::new(JsonWriter::new(io::stdout())),
    }
}

pub fn format_row(method: &str, level: &str) -> String {
    format!("{:<width$}{}", method, level, width = METHOD_COLUMN_WIDTH)
}

pub fn header_lines() -> [String; 2] {
    [
        format_row("METHOD", LEVEL_HEADER),
        "-".repeat(METHOD_COLUMN_WIDTH + LEVEL_HEADER.len()),
    ]
}

/// Fixed-width two-column table on stdout, with the level colored when
/// attached to a terminal.
pub struct TableWriter;

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter {
    pub fn new() -> Self {
        Self
    }

    fn colored_level(purity: Purity) -> colored::ColoredString {
        let name = purity.as_str();
        match purity {
            Purity::Pure => name.green(),
            Purity::Impure => name.red(),
            Purity::Unknown => name.yellow(),
            Purity::ParametricallyImpure => name.cyan(),
        }
    }
}

impl ReportWriter for TableWriter {
    fn write_report(&mut self, report: &PurityReport) -> anyhow::Result<()> {
        for line in header_lines() {
            println!("{line}");
        }
        for row in &report.rows {
            println!(
                "{:<width$}{}",
                row.method,
                Self::colored_level(row.purity),
                width = METHOD_COLUMN_WIDTH
            );
        }
        Ok(())
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &PurityReport) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
