//! Identity and position types shared by the parser, checker and renderer.

use std::num::NonZeroU32;

/// Identifies one parsed file inside a package scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(NonZeroU32);

impl FileId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0.get()
    }
}

/// Type-safe counter handing out file ids, starting at 1.
#[derive(Debug, Clone)]
pub struct FileCounter {
    next: u32,
}

impl FileCounter {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next id, or `None` once the id space is exhausted.
    pub fn next_id(&mut self) -> Option<FileId> {
        let id = FileId::new(self.next)?;
        self.next = self.next.checked_add(1)?;
        Some(id)
    }
}

impl Default for FileCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest source file whose byte offsets fit in a [`Pos`].
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Exact source position of a token: the owning file plus a byte offset.
///
/// Two positions are equal only when they name the same byte of the same
/// file, which is what the method walk joins on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub file: FileId,
    pub offset: u32,
}

impl Pos {
    /// `None` when `offset` does not fit in 32 bits.
    pub fn new(file: FileId, offset: usize) -> Option<Self> {
        let offset = u32::try_from(offset).ok()?;
        Some(Self { file, offset })
    }
}

/// Byte range within one source file, with 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, start_line: usize, end_line: usize) -> Self {
        Self {
            start,
            end,
            start_line,
            end_line,
        }
    }
}
