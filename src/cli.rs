use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "puritymap")]
#[command(about = "Classifies every method in a C#-style source file by purity level", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the source file to analyze
    pub path: Option<PathBuf>,

    /// Analyze source text passed directly on the command line
    #[arg(short = 's', long = "source", value_name = "SOURCE", conflicts_with = "path")]
    pub source: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Table => crate::io::output::OutputFormat::Table,
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
