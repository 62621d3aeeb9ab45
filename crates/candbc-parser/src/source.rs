//! Source buffer with byte cursor and position bookkeeping.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DbcError, Location};

/// One DBC source: the full text, an optional file path and the current
/// byte cursor of the parse.
///
/// Readers move the cursor directly. Speculative reads take a [`Mark`]
/// up front and call [`Source::reset`] when the speculation fails;
/// committing is simply not resetting.
///
/// Line and column are not tracked incrementally; they are computed
/// from the cursor on demand, which only happens when an error is being
/// located.
#[derive(Clone, Debug, Default)]
pub struct Source {
    content: String,
    path: Option<PathBuf>,
    pos: usize,
}

/// Saved cursor position for speculative reads.
#[derive(Clone, Copy, Debug)]
pub struct Mark(usize);

impl Source {
    /// Read a whole DBC file into memory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DbcError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|_| {
            DbcError::with_args(
                "Failed to open the %1 file for reading.",
                &[&path.display()],
            )
        })?;
        Ok(Self {
            content,
            path: Some(path.to_path_buf()),
            pos: 0,
        })
    }

    /// Wrap in-memory DBC content; no path is associated.
    pub fn from_str(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            path: None,
            pos: 0,
        }
    }

    /// The associated file path, when the source came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The full text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Is the cursor at (or past) the end of the text?
    pub fn is_eof(&self) -> bool {
        self.pos >= self.content.len()
    }

    /// The byte at the cursor, or `'\0'` at EOF.
    pub fn current_char(&self) -> char {
        self.content.as_bytes().get(self.pos).map_or('\0', |&b| b as char)
    }

    /// Current byte position of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute byte position.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Advance the cursor by one byte.
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Rewind the cursor to the start of the text.
    pub fn reset_pos(&mut self) {
        self.pos = 0;
    }

    /// Remember the current cursor position.
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewind the cursor to a previously taken mark.
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// Remaining text from the cursor to the end.
    pub fn rest(&self) -> &str {
        &self.content[self.pos.min(self.content.len())..]
    }

    /// 1-based line of the cursor; 0 for empty content. At EOF every
    /// newline of the text counts.
    pub fn line(&self) -> usize {
        if self.content.is_empty() {
            return 0;
        }
        let upto = if self.is_eof() {
            self.content.len()
        } else {
            self.pos
        };
        1 + self.content.as_bytes()[..upto]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
    }

    /// 1-based column of the cursor within its line, with tabs expanded
    /// to the next multiple of four.
    pub fn column(&self) -> usize {
        let bytes = self.content.as_bytes();
        let bol = if self.pos == 0 {
            0
        } else {
            bytes[..self.pos.min(bytes.len())]
                .iter()
                .rposition(|&b| b == b'\n')
                .map_or(0, |n| n + 1)
        };
        let mut col = 0usize;
        for &b in &bytes[bol..self.pos.min(bytes.len())] {
            if b == b'\t' {
                col += 4 - col % 4;
            } else {
                col += 1;
            }
        }
        col + 1
    }

    /// Snapshot of the cursor position for error attachment.
    pub fn location(&self) -> Location {
        Location {
            path: self.path.clone(),
            line: self.line(),
            column: self.column(),
        }
    }
}

impl From<&str> for Source {
    fn from(content: &str) -> Self {
        Self::from_str(content)
    }
}

impl From<String> for Source {
    fn from(content: String) -> Self {
        Self::from_str(content)
    }
}
