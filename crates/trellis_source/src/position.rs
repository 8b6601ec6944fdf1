//! Editor-coordinate positions and ranges.

use serde::{Deserialize, Serialize};

/// A zero-based (line, character) position in a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based character offset within the line.
    pub character: u32,
}

impl Position {
    /// Creates a position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions in the same file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start of the range (inclusive).
    pub start: Position,
    /// End of the range (exclusive).
    pub end: Position,
}

impl Range {
    /// A zero-width range at the start of a file, used when the parser did not
    /// report a location.
    pub const EMPTY: Range = Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position {
            line: 0,
            character: 0,
        },
    };

    /// Creates a range from two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for a range given as `(start_line, start_char, end_line, end_char)`.
    pub fn from_coords(sl: u32, sc: u32, el: u32, ec: u32) -> Self {
        Self {
            start: Position::new(sl, sc),
            end: Position::new(el, ec),
        }
    }

    /// Returns `true` if `pos` lies inside the range.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
