//! Core data model: the purity lattice and method identity.

pub mod method;
pub mod purity;

pub use method::Method;
pub use purity::Purity;
