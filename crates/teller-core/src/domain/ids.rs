//! Domain identifiers (strongly-typed IDs).
//!
//! - `LineId`: 列（窓口）の番号。構築時に 0..N-1 が割り当てられ、以後変わらない
//! - `CustomerId`: 客の識別子。ULID なので発行順にソートできる

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of a service line (one teller).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(usize);

impl LineId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 内部の index を取得
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for LineId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

/// Identifier of a customer waiting in a line.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Ulid);

impl CustomerId {
    /// 新しい ID を発行
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cust-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_id_display_has_prefix() {
        assert_eq!(LineId::new(3).to_string(), "line-3");
        assert_eq!(LineId::from(0).index(), 0);
    }

    #[test]
    fn line_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&LineId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: LineId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LineId::new(7));
    }

    #[test]
    fn customer_ids_are_sortable() {
        // ULID は時刻ベースなので、生成順序でソート可能
        let id1 = CustomerId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = CustomerId::generate();

        assert!(id1 < id2);
        assert!(id1.as_ulid() < id2.as_ulid());
        assert_eq!(id1.to_string(), format!("cust-{}", id1.as_ulid()));
    }
}
