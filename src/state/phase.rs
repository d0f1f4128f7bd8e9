//! Discovery phase definitions
//!
//! Phases run in a fixed order; each one reads the Store state left by the
//! phases before it.
//!
//! ```
//! use deep_mapsite::state::Phase;
//!
//! let order: Vec<u8> = Phase::all().iter().map(Phase::number).collect();
//! assert_eq!(order, vec![1, 2, 3, 4]);
//! assert_eq!(Phase::PatternCompletion.to_string(), "pattern_completion");
//! ```

use std::fmt;

/// One of the four ordered discovery strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Single fetch of the seed URL
    Foundation,

    /// Breadth-first drain of the frontier
    Recursive,

    /// Interaction-augmented discovery over sampled pages
    Interactive,

    /// Numeric ID template completion
    PatternCompletion,
}

impl Phase {
    /// Returns all phases in execution order
    pub fn all() -> [Phase; 4] {
        [
            Self::Foundation,
            Self::Recursive,
            Self::Interactive,
            Self::PatternCompletion,
        ]
    }

    /// Converts the phase to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Recursive => "recursive",
            Self::Interactive => "interactive",
            Self::PatternCompletion => "pattern_completion",
        }
    }

    /// Parses a phase from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "foundation" => Some(Self::Foundation),
            "recursive" => Some(Self::Recursive),
            "interactive" => Some(Self::Interactive),
            "pattern_completion" => Some(Self::PatternCompletion),
            _ => None,
        }
    }

    /// 1-based position in the run
    pub fn number(&self) -> u8 {
        match self {
            Self::Foundation => 1,
            Self::Recursive => 2,
            Self::Interactive => 3,
            Self::PatternCompletion => 4,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
