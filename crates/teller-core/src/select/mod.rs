//! Line selection: which line is currently the shortest.
//!
//! 列の長さは操作のたびに変わるので、選択用の構造は「正本」ではなく
//! (長さ, index) の索引として扱う。客そのものは `BankBranch` の列が持つ。

mod indexed;
mod lazy;

pub use indexed::IndexedSelector;
pub use lazy::{LazyHeapSelector, Snapshot};

use crate::config::SelectorKind;
use crate::domain::LineId;

/// The line picked by a selector, with the length the selector believes it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub line: LineId,
    pub len: usize,
}

/// Ordering index over lines by current length.
///
/// Ties are broken by the lowest line index.
///
/// Contract:
/// - `select_shortest()` may take the chosen line out of the index; the caller
///   must follow up with `line_resized()` for that line.
/// - `line_resized()` is called after every mutation of a line, including a
///   dequeue on an already empty line.
pub trait LineSelector: Send {
    /// Index `lines` empty lines.
    fn with_lines(lines: usize) -> Self
    where
        Self: Sized;

    fn select_shortest(&mut self) -> Option<Selection>;

    fn line_resized(&mut self, line: LineId, old_len: usize, new_len: usize);

    /// Number of entries currently held (live and stale).
    fn entries(&self) -> usize;
}

/// Selector chosen at runtime (see `SelectorKind`).
pub enum ConfiguredSelector {
    Lazy(LazyHeapSelector),
    Indexed(IndexedSelector),
}

impl ConfiguredSelector {
    pub fn for_kind(kind: SelectorKind, lines: usize) -> Self {
        match kind {
            SelectorKind::Lazy => Self::Lazy(LazyHeapSelector::with_lines(lines)),
            SelectorKind::Indexed => Self::Indexed(IndexedSelector::with_lines(lines)),
        }
    }
}

impl LineSelector for ConfiguredSelector {
    fn with_lines(lines: usize) -> Self {
        Self::Lazy(LazyHeapSelector::with_lines(lines))
    }

    fn select_shortest(&mut self) -> Option<Selection> {
        match self {
            Self::Lazy(s) => s.select_shortest(),
            Self::Indexed(s) => s.select_shortest(),
        }
    }

    fn line_resized(&mut self, line: LineId, old_len: usize, new_len: usize) {
        match self {
            Self::Lazy(s) => s.line_resized(line, old_len, new_len),
            Self::Indexed(s) => s.line_resized(line, old_len, new_len),
        }
    }

    fn entries(&self) -> usize {
        match self {
            Self::Lazy(s) => s.entries(),
            Self::Indexed(s) => s.entries(),
        }
    }
}
