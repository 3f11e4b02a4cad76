//! The purity lattice.
//!
//! Levels form a total order from least to most trusted:
//! `Impure < Unknown < ParametricallyImpure < Pure`. Combining a caller's
//! level with a callee's takes the lesser of the two, so `Pure` is the
//! identity of the join and `Impure` absorbs everything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Purity classification of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Purity {
    /// Reads or writes program-wide mutable state, performs I/O, or
    /// transitively invokes an operation that does.
    Impure,
    /// Not enough symbol information to decide.
    Unknown,
    /// Purity contingent on the purity of a function-valued argument.
    ParametricallyImpure,
    /// Return value is a deterministic function of the arguments, with no
    /// observable effects beyond the return.
    Pure,
}

impl Purity {
    /// Lattice join: the lesser of the two levels.
    pub fn join(self, other: Purity) -> Purity {
        self.min(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Purity::Impure => "Impure",
            Purity::Unknown => "Unknown",
            Purity::ParametricallyImpure => "ParametricallyImpure",
            Purity::Pure => "Pure",
        }
    }
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual purity tag is not one of the four levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized purity level: {0}")]
pub struct ParsePurityError(pub String);

impl FromStr for Purity {
    type Err = ParsePurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pure" => Ok(Purity::Pure),
            "Impure" => Ok(Purity::Impure),
            "ParametricallyImpure" => Ok(Purity::ParametricallyImpure),
            "Unknown" => Ok(Purity::Unknown),
            other => Err(ParsePurityError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        assert!(Purity::Impure < Purity::Unknown);
        assert!(Purity::Unknown < Purity::ParametricallyImpure);
        assert!(Purity::ParametricallyImpure < Purity::Pure);
    }

    #[test]
    fn pure_is_join_identity() {
        for level in [
            Purity::Impure,
            Purity::Unknown,
            Purity::ParametricallyImpure,
            Purity::Pure,
        ] {
            assert_eq!(level.join(Purity::Pure), level);
            assert_eq!(Purity::Pure.join(level), level);
        }
    }

    #[test]
    fn impure_absorbs() {
        for level in [
            Purity::Impure,
            Purity::Unknown,
            Purity::ParametricallyImpure,
            Purity::Pure,
        ] {
            assert_eq!(level.join(Purity::Impure), Purity::Impure);
        }
    }

    #[test]
    fn parses_textual_tags() {
        assert_eq!("Pure".parse::<Purity>().unwrap(), Purity::Pure);
        assert_eq!("Impure".parse::<Purity>().unwrap(), Purity::Impure);
        assert_eq!(
            "ParametricallyImpure".parse::<Purity>().unwrap(),
            Purity::ParametricallyImpure
        );
        assert_eq!("Unknown".parse::<Purity>().unwrap(), Purity::Unknown);
    }

    #[test]
    fn rejects_unrecognized_tag() {
        let err = "Mostly Pure".parse::<Purity>().unwrap_err();
        assert_eq!(err, ParsePurityError("Mostly Pure".to_string()));
    }

    #[test]
    fn display_matches_tag() {
        assert_eq!(
            Purity::ParametricallyImpure.to_string(),
            "ParametricallyImpure"
        );
    }
}
