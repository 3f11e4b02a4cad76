//! The purity inference engine: prior knowledge, the lookup table, the
//! working set, and the fixed-point driver.

pub mod analyzer;
pub mod knowledge;
pub mod lookup;
pub mod working_set;

pub use analyzer::PurityAnalyzer;
pub use lookup::{EngineError, LookupTable, MethodId};
pub use working_set::WorkingSet;
