//! Source location tracking.
//!
//! `Position` records where a token started so that diagnostics can point
//! back at the script text.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in script text.
///
/// Lines and columns are 1-based. The all-zero position marks values that
/// were synthesized rather than read from a script (for example defaults
/// copied out of a signature).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Creates a position at the start of input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Returns true if this position does not refer to script text.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Returns the position one column to the right.
    #[must_use]
    pub const fn next_column(self) -> Self {
        Self {
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
