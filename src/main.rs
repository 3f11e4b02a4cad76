//! puritymap CLI entry point.
//!
//! Parses arguments, dispatches to the command layer, and maps application
//! errors to exit codes. Diagnostics print to stdout; structured logs go to
//! stderr under `RUST_LOG` control.

use puritymap::cli::{self, Cli};
use puritymap::commands;
use puritymap::error::AppError;
use puritymap::observability::init_tracing;

const USAGE_GUIDANCE: &str = "\
No input given.

Usage:
  puritymap <path-to-source-file>
  puritymap -s <source-as-string>

See `puritymap --help` for all options.";

fn main() {
    init_tracing();
    let cli = cli::parse_args();
    if let Err(err) = run(cli) {
        println!("{}", err.user_message());
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let format = cli.format.into();
    match (cli.path, cli.source) {
        (Some(path), _) => commands::run_path(&path, format),
        (None, Some(source)) => commands::run_source(&source, format),
        (None, None) => {
            println!("{USAGE_GUIDANCE}");
            Ok(())
        }
    }
}
