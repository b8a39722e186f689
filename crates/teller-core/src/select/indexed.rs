//! Ordered-set selector with true key updates.
//!
//! `BTreeSet<(len, index)>` なので stale なエントリは存在しない。
//! 更新は remove + insert の O(log n)。

use std::collections::BTreeSet;

use super::{LineSelector, Selection};
use crate::domain::LineId;

pub struct IndexedSelector {
    order: BTreeSet<(usize, usize)>,
}

impl LineSelector for IndexedSelector {
    fn with_lines(lines: usize) -> Self {
        Self {
            order: (0..lines).map(|index| (0, index)).collect(),
        }
    }

    fn select_shortest(&mut self) -> Option<Selection> {
        self.order.first().map(|&(len, index)| Selection {
            line: LineId::new(index),
            len,
        })
    }

    fn line_resized(&mut self, line: LineId, old_len: usize, new_len: usize) {
        if old_len == new_len {
            return;
        }
        let index = line.index();
        let removed = self.order.remove(&(old_len, index));
        debug_assert!(removed, "line {index} was not indexed with len {old_len}");
        self.order.insert((new_len, index));
    }

    fn entries(&self) -> usize {
        self.order.len()
    }
}
