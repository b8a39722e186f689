//! Lazy-deletion heap selector.
//!
//! Design:
//! - 列を更新するたびに、新しい長さを持つ Snapshot を heap に push する
//! - 古い Snapshot は消さずに stale 扱いにする（列ごとの generation を進める）
//! - pop 時に stale な Snapshot を捨てながら live なものを探す
//!
//! decrease-key が要らないので `BinaryHeap` だけで済む。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::{LineSelector, Selection};
use crate::domain::LineId;

/// Heap が `lines * COMPACT_FACTOR` 件を超えたら live な Snapshot だけで作り直す。
const COMPACT_FACTOR: usize = 4;

/// The state of one line at the moment it was pushed into the heap.
///
/// A snapshot is live iff its `generation` equals the line's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub len: usize,
    pub index: usize,
    pub generation: u64,
}

impl PartialOrd for Snapshot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Snapshot {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering: BinaryHeap acts as a min-heap on (len, index)
        other
            .len
            .cmp(&self.len)
            .then_with(|| other.index.cmp(&self.index))
            .then_with(|| other.generation.cmp(&self.generation))
    }
}

pub struct LazyHeapSelector {
    heap: BinaryHeap<Snapshot>,

    /// Current generation per line. Bumping it marks every older snapshot stale.
    generations: Vec<u64>,

    /// Last known length per line (used when compacting).
    lens: Vec<usize>,
}

impl LazyHeapSelector {
    fn is_live(&self, snapshot: &Snapshot) -> bool {
        self.generations[snapshot.index] == snapshot.generation
    }

    /// Number of stale snapshots still sitting in the heap.
    pub fn stale_entries(&self) -> usize {
        self.heap.iter().filter(|s| !self.is_live(s)).count()
    }

    fn live_snapshot(&self, index: usize) -> Snapshot {
        Snapshot {
            len: self.lens[index],
            index,
            generation: self.generations[index],
        }
    }

    fn compact(&mut self) {
        let before = self.heap.len();
        self.heap = (0..self.generations.len())
            .map(|index| self.live_snapshot(index))
            .collect();
        debug!(before, after = self.heap.len(), "compacted line heap");
    }
}

impl LineSelector for LazyHeapSelector {
    fn with_lines(lines: usize) -> Self {
        let mut selector = Self {
            heap: BinaryHeap::with_capacity(lines),
            generations: vec![0; lines],
            lens: vec![0; lines],
        };
        for index in 0..lines {
            let snapshot = selector.live_snapshot(index);
            selector.heap.push(snapshot);
        }
        selector
    }

    fn select_shortest(&mut self) -> Option<Selection> {
        while let Some(top) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            trace!(line = top.index, len = top.len, "dropping stale snapshot");
            self.heap.pop();
        }

        let live = self.heap.pop()?;
        Some(Selection {
            line: LineId::new(live.index),
            len: live.len,
        })
    }

    fn line_resized(&mut self, line: LineId, _old_len: usize, new_len: usize) {
        let index = line.index();
        self.generations[index] += 1;
        self.lens[index] = new_len;
        let snapshot = self.live_snapshot(index);
        self.heap.push(snapshot);

        if self.heap.len() > self.generations.len() * COMPACT_FACTOR {
            self.compact();
        }
    }

    fn entries(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_ordering_is_min_first_by_len_then_index() {
        let mut heap = BinaryHeap::new();
        for (len, index) in [(2, 0), (1, 2), (1, 1)] {
            heap.push(Snapshot {
                len,
                index,
                generation: 0,
            });
        }

        assert_eq!(heap.pop().map(|s| s.index), Some(1));
        assert_eq!(heap.pop().map(|s| s.index), Some(2));
        assert_eq!(heap.pop().map(|s| s.index), Some(0));
    }

    #[test]
    fn fresh_selector_picks_lowest_index() {
        let mut selector = LazyHeapSelector::with_lines(3);
        let selection = selector.select_shortest().unwrap();
        assert_eq!((selection.line.index(), selection.len), (0, 0));
    }

    #[test]
    fn stale_snapshots_are_skipped() {
        let mut selector = LazyHeapSelector::with_lines(2);

        // line 0 grows to 1 through an enqueue
        let first = selector.select_shortest().unwrap();
        selector.line_resized(first.line, 0, 1);

        // line 1 is resized without being selected (e.g. a dequeue on an empty line);
        // its old (len 0) snapshot becomes stale
        selector.line_resized(LineId::new(1), 0, 0);
        assert_eq!(selector.stale_entries(), 1);

        let next = selector.select_shortest().unwrap();
        assert_eq!((next.line.index(), next.len), (1, 0));
        assert_eq!(selector.stale_entries(), 0);
    }

    #[test]
    fn selection_reports_latest_length() {
        let mut selector = LazyHeapSelector::with_lines(1);
        let s = selector.select_shortest().unwrap();
        selector.line_resized(s.line, 0, 1);
        selector.line_resized(LineId::new(0), 1, 2);
        selector.line_resized(LineId::new(0), 2, 1);

        let s = selector.select_shortest().unwrap();
        assert_eq!(s.len, 1);
    }

    #[test]
    fn heap_is_compacted_when_stale_entries_pile_up() {
        let lines = 3;
        let mut selector = LazyHeapSelector::with_lines(lines);
        for _ in 0..100 {
            selector.line_resized(LineId::new(2), 0, 0);
        }
        assert!(selector.entries() <= lines * COMPACT_FACTOR);

        // one live snapshot per line survives compaction
        let mut seen = Vec::new();
        while let Some(s) = selector.select_shortest() {
            seen.push(s.line.index());
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
