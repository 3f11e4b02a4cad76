//! # puritymap
//!
//! A one-shot static analyzer that classifies every method in a C#-style
//! source file into one of four purity levels: `Pure`, `Impure`,
//! `ParametricallyImpure`, or `Unknown`.
//!
//! A method is *pure* when its return value depends only on its arguments
//! and it has no observable effects beyond the return; *impure* when it
//! reads or writes program-wide state, performs I/O, or transitively calls
//! something that does; *unknown* when symbol information is missing.
//!
//! ## How it works
//!
//! 1. The embedded front end ([`syntax`]) parses the source into a tree and
//!    binds names to symbols.
//! 2. The engine ([`analysis`]) builds a lookup table: one row per method
//!    with its immediate callees as a dependency set, everything initially
//!    `Pure`.
//! 3. A fixed-point loop drains the working set (methods with no unresolved
//!    dependencies), classifies each via prior knowledge of framework
//!    operations, static-state access, or missing symbols, and folds the
//!    result into each caller while releasing the resolved edges. The loop
//!    ends when a sweep changes nothing.
//!
//! ## Quick start
//!
//! ```rust
//! use puritymap::{analyze_source, Purity};
//!
//! let table = analyze_source(
//!     r#"class C {
//!          int pure() { return 42; }
//!          void log() { Console.WriteLine("hi"); }
//!        }"#,
//! )
//! .unwrap();
//!
//! let purity = |name: &str| {
//!     table
//!         .iter()
//!         .find(|(m, _)| m.display() == name)
//!         .map(|(_, p)| p)
//!         .unwrap()
//! };
//! assert_eq!(purity("int C.pure"), Purity::Pure);
//! assert_eq!(purity("void C.log"), Purity::Impure);
//! ```
//!
//! The CLI wraps the same pipeline: `puritymap <file>` or
//! `puritymap -s <source>`, with `--format json` for machine-readable
//! output. Reports for file input are pre-filtered to the methods the file
//! declares.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod io;
pub mod observability;
pub mod syntax;

pub use crate::analysis::{EngineError, LookupTable, PurityAnalyzer, WorkingSet};
pub use crate::core::{Method, Purity};
pub use crate::error::{AnalysisError, AppError, InputError};
pub use crate::io::output::{OutputFormat, PurityReport};
pub use crate::syntax::SyntaxError;

use crate::syntax::resolver::Resolver;

/// Parse, resolve, and analyze a compilation unit, returning the populated
/// lookup table.
pub fn analyze_source(source: &str) -> Result<LookupTable, SyntaxError> {
    let unit = syntax::parse(source)?;
    let resolver = Resolver::new(&unit);
    Ok(PurityAnalyzer::new(&unit, &resolver).analyze())
}
