use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a file inside a package arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) u32);

impl FileId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of a node inside its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Resolved source position, in the shape of `go/token.Position`.
///
/// Lines and columns are 1-based; the default value is the invalid position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return if self.filename.is_empty() {
                f.write_str("-")
            } else {
                f.write_str(&self.filename)
            };
        }
        if self.filename.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}

/// Text of one parsed file plus its line table.
#[derive(Debug, Clone)]
pub struct SourceText {
    name: String,
    path: PathBuf,
    text: String,
    line_starts: Vec<u32>,
}

impl SourceText {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, text: String) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        Self {
            name: name.into(),
            path: path.into(),
            text,
            line_starts,
        }
    }

    /// File name without directory (`"walk.go"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.start as usize..span.end as usize)
    }

    /// Converts a byte offset into a 1-based position.
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts[line];
        Position {
            filename: self.path.to_string_lossy().into_owned(),
            offset: offset as usize,
            line: line + 1,
            column: (offset - start) as usize + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_one_based() {
        let src = SourceText::new("a.go", "pkg/a.go", "package a\n\nvar x int\n".into());
        let pos = src.position(11);
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.to_string(), "pkg/a.go:3:1");

        let pos = src.position(15);
        assert_eq!((pos.line, pos.column), (3, 5));
    }

    #[test]
    fn test_default_position_is_invalid() {
        let pos = Position::default();
        assert!(!pos.is_valid());
        assert_eq!(pos.to_string(), "-");
    }
}
