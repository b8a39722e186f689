use thiserror::Error;

/// BranchError は列の集合に対する操作のエラー
///
/// 列が空であることはエラーではない（`Ok(None)` で表す）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BranchError {
    #[error("a branch needs at least one teller")]
    NoTellers,

    #[error("line {index} is out of range (branch has {lines} lines)")]
    OutOfRange { index: i64, lines: usize },
}

impl BranchError {
    pub(crate) fn out_of_range(index: usize, lines: usize) -> Self {
        Self::OutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            lines,
        }
    }
}
