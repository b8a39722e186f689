//! Status views for display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::LineId;

/// One line as seen by a display layer.
///
/// `BankBranch::describe()` hands out `LineStatus<&T>`; `cloned()` turns it
/// into an owned view that can outlive the branch lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStatus<T> {
    pub line: LineId,
    pub waiting: usize,
    pub next: Option<T>,
}

impl<T: Clone> LineStatus<&T> {
    pub fn cloned(&self) -> LineStatus<T> {
        LineStatus {
            line: self.line,
            waiting: self.waiting,
            next: self.next.cloned(),
        }
    }
}

/// Owned snapshot of every line, in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchStatus<T> {
    pub lines: Vec<LineStatus<T>>,
    pub total_waiting: usize,
}

impl<T> BranchStatus<T> {
    pub fn new(lines: Vec<LineStatus<T>>) -> Self {
        let total_waiting = lines.iter().map(|l| l.waiting).sum();
        Self {
            lines,
            total_waiting,
        }
    }
}

pub(crate) fn render_lines<'a, T, I>(f: &mut fmt::Formatter<'_>, lines: I) -> fmt::Result
where
    T: fmt::Display + 'a,
    I: IntoIterator<Item = (LineId, usize, Option<&'a T>)>,
{
    for (line, waiting, next) in lines {
        writeln!(f, "Line {}", line.index())?;
        writeln!(f, "\t Number waiting: {waiting}")?;
        match next {
            Some(customer) => writeln!(f, "\t Next customer: {customer}")?,
            None => writeln!(f, "\t Empty")?,
        }
    }
    Ok(())
}

impl<T: fmt::Display> fmt::Display for BranchStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_lines(
            f,
            self.lines.iter().map(|l| (l.line, l.waiting, l.next.as_ref())),
        )
    }
}
