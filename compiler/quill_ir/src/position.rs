//! Source locations reported by the lexer.

use std::fmt;

/// Opaque index of a source file, assigned by the caller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FileId(pub u32);

impl FileId {
    /// Placeholder for sources that do not come from a file.
    pub const DUMMY: FileId = FileId(u32::MAX);
}

/// A file/line/column triple. Lines are 1-based, columns 0-based bytes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub file: FileId,
    pub line: u32,
    pub col: u32,
}

impl Position {
    #[inline]
    pub const fn new(file: FileId, line: u32, col: u32) -> Self {
        Position { file, line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
