use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// A 1-based row/column position in the source text.
///
/// A synthetic location compares equal to every other location, which lets
/// tests build expected tokens and trees without caring where they came from.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub row: usize,
    pub column: usize,
    pub synthetic: bool,
}

impl Location {
    pub const fn new(row: usize, column: usize) -> Self {
        Location {
            row,
            column,
            synthetic: false,
        }
    }

    pub const fn synthetic() -> Self {
        Location {
            row: 1,
            column: 1,
            synthetic: true,
        }
    }

    /// Byte offset of this location inside `source`, clamped to its length.
    pub fn offset_in(&self, source: &str) -> usize {
        if self.synthetic {
            return 0;
        }
        let mut row = 1;
        let mut column = 1;
        for (offset, ch) in source.char_indices() {
            if row == self.row && column == self.column {
                return offset;
            }
            if ch == '\n' {
                row += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        source.len()
    }

    /// One-character span at this location, as used by ariadne labels.
    pub fn span_in(&self, source: &str) -> Range<usize> {
        let start = self.offset_in(source);
        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |ch| start + ch.len_utf8());
        start..end
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new(1, 1)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.synthetic || other.synthetic || (self.row == other.row && self.column == other.column)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}
