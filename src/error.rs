//! Application-level error domains.
//!
//! - `InputError`: the source file could not be found or read.
//! - `AnalysisError`: the source could not be parsed, or the report could
//!   not be written.
//! - `AppError`: top-level error carrying the process exit code.
//!
//! Structural misuse of the lookup table is a separate domain
//! ([`crate::analysis::EngineError`]); it never surfaces from well-formed
//! input.

use crate::syntax::SyntaxError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to parse source: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("failed to write report: {0}")]
    Report(anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl AppError {
    /// Exit code for this error: 2 for unusable input, 1 for analysis
    /// failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Input(_) => 2,
            AppError::Analysis(_) => 1,
        }
    }

    /// User-facing message with a recovery suggestion where one exists.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Input(InputError::PathNotFound(path)) => {
                format!(
                    "Error: path '{}' does not exist.\n\n\
                     Suggestion: check the path, or pass source text directly:\n\
                     puritymap -s \"class C {{ }}\"",
                    path.display()
                )
            }
            AppError::Analysis(AnalysisError::Syntax(err)) => {
                format!(
                    "Error: the source could not be parsed:\n  {err}\n\n\
                     Suggestion: the analyzer accepts a C#-style subset; check the\n\
                     syntax near the reported position."
                )
            }
            _ => format!("Error: {self}"),
        }
    }
}
