//! Source location tracking.

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies a file registered with a [`SourceMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FileId(pub usize);

impl FileId {
    pub const DUMMY: FileId = FileId(0);
}

/// A byte range in a source file, with the line/column of its start for
/// diagnostic formatting (`file:line:col: kind: message`, per §6).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub file: FileId,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file: FileId::DUMMY,
    };

    pub fn new(start: usize, end: usize, line: u32, column: u32, file: FileId) -> Self {
        Self { start, end, line, column, file }
    }

    /// Merge two spans from the same file into one covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
            column: if self.line <= other.line { self.column } else { other.column },
            file: self.file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_the_widest_bounds() {
        let a = Span::new(5, 10, 1, 6, FileId::DUMMY);
        let b = Span::new(8, 20, 1, 9, FileId::DUMMY);
        let m = a.merge(b);
        assert_eq!(m.start, 5);
        assert_eq!(m.end, 20);
    }
}
