//! BankBranch: a fixed set of service lines with shortest-line placement.
//!
//! Design:
//! - `lines` is the single source of truth for customers (indexed by LineId).
//! - `selector` is an ordering index over line lengths only.
//! - Every mutation of a line is reported to the selector, so the selector
//!   never hands out a line whose recorded length differs from the real one.

mod line;
mod status;

pub use line::Line;
pub use status::{BranchStatus, LineStatus};

use std::fmt;

use tracing::debug;

use crate::domain::LineId;
use crate::error::BranchError;
use crate::select::{LazyHeapSelector, LineSelector};

pub struct BankBranch<T, S = LazyHeapSelector> {
    lines: Vec<Line<T>>,
    selector: S,
}

impl<T> BankBranch<T> {
    /// Create a branch with `tellers` empty lines, using the lazy heap selector.
    pub fn new(tellers: usize) -> Result<Self, BranchError> {
        Self::with_selector(tellers)
    }
}

impl<T, S: LineSelector> BankBranch<T, S> {
    pub fn with_selector(tellers: usize) -> Result<Self, BranchError> {
        Self::with_selector_from(tellers, S::with_lines)
    }

    /// Create a branch whose selector is built by `make` for `tellers` lines.
    pub fn with_selector_from(
        tellers: usize,
        make: impl FnOnce(usize) -> S,
    ) -> Result<Self, BranchError> {
        if tellers == 0 {
            return Err(BranchError::NoTellers);
        }
        let lines = (0..tellers).map(|i| Line::new(LineId::new(i))).collect();
        Ok(Self {
            lines,
            selector: make(tellers),
        })
    }

    /// Put `item` at the back of the currently shortest line.
    ///
    /// Ties go to the lowest line index. Returns the chosen line.
    pub fn enqueue(&mut self, item: T) -> LineId {
        let selection = self
            .selector
            .select_shortest()
            .expect("every line always has one live entry in the selector");
        let line = &mut self.lines[selection.line.index()];
        debug_assert_eq!(
            selection.len,
            line.len(),
            "selector handed out a stale length for {}",
            selection.line
        );

        let old_len = line.len();
        line.push(item);
        let new_len = line.len();
        self.selector.line_resized(selection.line, old_len, new_len);

        debug!(line = %selection.line, waiting = new_len, "customer joined line");
        selection.line
    }

    /// Take the front customer of line `index`.
    ///
    /// `Ok(None)` means the line is empty; nothing is mutated on `Err`.
    pub fn dequeue_from(&mut self, index: usize) -> Result<Option<T>, BranchError> {
        let count = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| BranchError::out_of_range(index, count))?;

        let old_len = line.len();
        let served = line.pop();
        let new_len = line.len();
        let id = line.id();
        self.selector.line_resized(id, old_len, new_len);

        debug!(
            line = %id,
            waiting = new_len,
            served = served.is_some(),
            "teller called next customer"
        );
        Ok(served)
    }

    /// Validate a signed line number coming from an outer layer.
    pub fn line_id(&self, index: i64) -> Result<LineId, BranchError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.lines.len())
            .map(LineId::new)
            .ok_or(BranchError::OutOfRange {
                index,
                lines: self.lines.len(),
            })
    }

    /// Length and front customer of every line, in line order.
    pub fn describe(&self) -> Vec<LineStatus<&T>> {
        self.lines
            .iter()
            .map(|line| LineStatus {
                line: line.id(),
                waiting: line.len(),
                next: line.front(),
            })
            .collect()
    }

    pub fn status(&self) -> BranchStatus<T>
    where
        T: Clone,
    {
        BranchStatus::new(self.describe().iter().map(|s| s.cloned()).collect())
    }

    pub fn peek(&self, index: usize) -> Option<&T> {
        self.lines.get(index).and_then(Line::front)
    }

    /// Number of customers waiting in line `index` (0 for an unknown line).
    pub fn len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, Line::len)
    }

    /// Number of lines (fixed at construction).
    pub fn lines(&self) -> usize {
        self.lines.len()
    }

    pub fn total_waiting(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Line::is_empty)
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }
}

impl<T: fmt::Display, S> fmt::Display for BankBranch<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        status::render_lines(
            f,
            self.lines.iter().map(|l| (l.id(), l.len(), l.front())),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    use super::*;
    use crate::config::SelectorKind;
    use crate::select::ConfiguredSelector;

    fn branch_of<T>(tellers: usize, kind: SelectorKind) -> BankBranch<T, ConfiguredSelector> {
        BankBranch::with_selector_from(tellers, |n| ConfiguredSelector::for_kind(kind, n)).unwrap()
    }

    #[test]
    fn zero_tellers_is_rejected() {
        let branch = BankBranch::<&str>::new(0);
        assert!(matches!(branch, Err(BranchError::NoTellers)));
    }

    #[rstest]
    #[case::lazy(SelectorKind::Lazy)]
    #[case::indexed(SelectorKind::Indexed)]
    fn customers_spread_round_robin_then_serve_in_order(#[case] kind: SelectorKind) {
        let mut branch = branch_of(3, kind);

        let placed: Vec<usize> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|c| branch.enqueue(c).index())
            .collect();
        assert_eq!(placed, vec![0, 1, 2, 0, 1]);

        assert_eq!(branch.dequeue_from(0), Ok(Some("A")));
        assert_eq!(branch.dequeue_from(0), Ok(Some("D")));
        assert_eq!(branch.dequeue_from(1), Ok(Some("B")));
        assert_eq!(branch.total_waiting(), 2);
        assert!(!branch.is_empty());

        assert_eq!(branch.dequeue_from(2), Ok(Some("C")));
        assert_eq!(branch.dequeue_from(1), Ok(Some("E")));
        assert!(branch.is_empty());
    }

    #[rstest]
    #[case::lazy(SelectorKind::Lazy)]
    #[case::indexed(SelectorKind::Indexed)]
    fn empty_line_yields_none(#[case] kind: SelectorKind) {
        let mut branch = branch_of::<&str>(2, kind);
        assert_eq!(branch.dequeue_from(1), Ok(None));
        assert_eq!(branch.dequeue_from(1), Ok(None));

        // the emptied line is still selectable afterwards
        assert_eq!(branch.enqueue("A").index(), 0);
        assert_eq!(branch.enqueue("B").index(), 1);
    }

    #[test]
    fn out_of_range_lines_are_rejected_without_mutation() {
        let mut branch = BankBranch::new(3).unwrap();
        branch.enqueue("A");

        assert_eq!(
            branch.dequeue_from(3),
            Err(BranchError::OutOfRange { index: 3, lines: 3 })
        );
        assert_eq!(
            branch.line_id(-1),
            Err(BranchError::OutOfRange { index: -1, lines: 3 })
        );
        assert!(branch.line_id(3).is_err());
        assert_eq!(branch.line_id(2), Ok(LineId::new(2)));

        assert_eq!(branch.total_waiting(), 1);
        assert_eq!(branch.peek(0), Some(&"A"));
    }

    #[test]
    fn dequeue_shortens_line_for_later_placement() {
        let mut branch = BankBranch::new(2).unwrap();
        for c in ["A", "B", "C", "D"] {
            branch.enqueue(c);
        }
        // line 0: A C, line 1: B D
        assert_eq!(branch.dequeue_from(1), Ok(Some("B")));
        assert_eq!(branch.dequeue_from(1), Ok(Some("D")));

        // line 1 is now empty, so the next two customers go there
        assert_eq!(branch.enqueue("E").index(), 1);
        assert_eq!(branch.enqueue("F").index(), 1);
        assert_eq!(branch.enqueue("G").index(), 0);
    }

    #[test]
    fn describe_reads_live_state() {
        let mut branch = BankBranch::new(2).unwrap();
        branch.enqueue("A");
        branch.enqueue("B");
        branch.enqueue("C");
        branch.dequeue_from(0).unwrap();

        let view = branch.describe();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].waiting, 1);
        assert_eq!(view[0].next, Some(&"C"));
        assert_eq!(view[1].waiting, 1);
        assert_eq!(view[1].next, Some(&"B"));

        let status = branch.status();
        assert_eq!(status.total_waiting, 2);
        assert_eq!(status.lines[0].next, Some("C"));
    }

    #[test]
    fn display_lists_every_line() {
        let mut branch = BankBranch::new(2).unwrap();
        branch.enqueue("Ada");

        let rendered = branch.to_string();
        assert_eq!(
            rendered,
            "Line 0\n\t Number waiting: 1\n\t Next customer: Ada\n\
             Line 1\n\t Number waiting: 0\n\t Empty\n"
        );
        assert_eq!(branch.status().to_string(), rendered);
    }

    #[test]
    fn lazy_heap_stays_bounded_under_repeated_dequeues() {
        let mut branch = BankBranch::<u32>::new(4).unwrap();
        for _ in 0..1_000 {
            branch.dequeue_from(3).unwrap();
        }
        assert!(branch.selector().entries() <= 4 * 4);
        assert_eq!(branch.enqueue(1).index(), 0);
    }

    /// Random mix of operations checked against a plain model of the lines.
    #[rstest]
    #[case::lazy(SelectorKind::Lazy, 7)]
    #[case::indexed(SelectorKind::Indexed, 7)]
    #[case::lazy_other_seed(SelectorKind::Lazy, 42)]
    fn random_operations_keep_invariants(#[case] kind: SelectorKind, #[case] seed: u64) {
        let tellers = 5;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut branch = branch_of::<u32>(tellers, kind);
        let mut model: Vec<VecDeque<u32>> = vec![VecDeque::new(); tellers];
        let (mut enqueued, mut served) = (0usize, 0usize);

        for next_item in 0..2_000u32 {
            if rng.gen_bool(0.55) {
                let shortest = model.iter().map(VecDeque::len).min().unwrap();
                let line = branch.enqueue(next_item).index();
                assert_eq!(model[line].len(), shortest, "joined a line that was not shortest");
                assert_eq!(
                    model.iter().position(|q| q.len() == shortest),
                    Some(line),
                    "ties go to the lowest index"
                );
                model[line].push_back(next_item);
                enqueued += 1;
            } else {
                let line = rng.gen_range(0..tellers);
                let got = branch.dequeue_from(line).unwrap();
                assert_eq!(got, model[line].pop_front(), "line {line} broke FIFO order");
                if got.is_some() {
                    served += 1;
                }
            }
            assert_eq!(branch.total_waiting(), enqueued - served);
        }

        for (i, q) in model.iter().enumerate() {
            assert_eq!(branch.len(i), q.len());
            assert_eq!(branch.peek(i), q.front());
        }
    }
}
