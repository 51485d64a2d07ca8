use super::FileId;
use std::path::PathBuf;

/// A single loaded `.uc` source file, plus its precomputed line-start table
/// so `offset -> (line, column)` lookups used for diagnostics don't rescan
/// the file from the start every time.
pub struct SourceFile {
    id: FileId,
    path: PathBuf,
    content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { id, path, content, line_starts }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Convert a byte offset into a 1-based (line, column) pair.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = self.content[line_start..offset].chars().count() + 1;
        (line_idx as u32 + 1, column as u32)
    }
}

/// The set of files loaded for one compilation session.
///
/// The CLI (§6) only ever compiles a single file, but the map is kept
/// general so the driver's pipeline doesn't special-case the single-file
/// case.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn add_file(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile::new(id, path, content));
        id
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_to_line_col_finds_second_line() {
        let mut map = SourceMap::new();
        let id = map.add_file(PathBuf::from("t.uc"), "int x;\nint y;\n".to_string());
        let file = map.get(id);
        let (line, col) = file.offset_to_line_col(7);
        assert_eq!(line, 2);
        assert_eq!(col, 1);
    }
}
