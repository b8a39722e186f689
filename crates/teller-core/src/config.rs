//! Config - 設定と Builder
//!
//! # 学習ポイント
//! - serde による設定ファイル（JSON）の読み込み
//! - Builder パターン + 起動時検証（Fail-fast 設計）

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::branch::BankBranch;
use crate::error::BranchError;
use crate::select::ConfiguredSelector;
use crate::shared::SharedBranch;

/// Which `LineSelector` a configured branch uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Binary heap with lazily discarded stale snapshots.
    #[default]
    Lazy,
    /// Ordered set keyed on (len, index) with in-place updates.
    Indexed,
}

impl FromStr for SelectorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lazy" => Ok(Self::Lazy),
            "indexed" => Ok(Self::Indexed),
            other => Err(ConfigError::UnknownSelector(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown selector {0:?} (expected \"lazy\" or \"indexed\")")]
    UnknownSelector(String),

    #[error("invalid config: {0}")]
    Invalid(#[from] BranchError),
}

/// Branch settings as they appear in a config file.
///
/// ```json
/// { "tellers": 3, "selector": "indexed" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    pub tellers: usize,

    #[serde(default)]
    pub selector: SelectorKind,
}

impl BranchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), BranchError> {
        if self.tellers == 0 {
            return Err(BranchError::NoTellers);
        }
        Ok(())
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            tellers: 3,
            selector: SelectorKind::default(),
        }
    }
}

/// BranchBuilder はブランチを構築
///
/// # 使用例
/// ```ignore
/// let branch = BranchBuilder::new()
///     .tellers(4)
///     .selector(SelectorKind::Indexed)
///     .build::<Customer>()?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に teller 数を検証し、0 なら BranchError::NoTellers を返す
#[derive(Debug, Clone, Default)]
pub struct BranchBuilder {
    config: BranchConfig,
}

impl BranchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: BranchConfig) -> Self {
        Self { config }
    }

    pub fn tellers(mut self, tellers: usize) -> Self {
        self.config.tellers = tellers;
        self
    }

    pub fn selector(mut self, selector: SelectorKind) -> Self {
        self.config.selector = selector;
        self
    }

    pub fn config(&self) -> &BranchConfig {
        &self.config
    }

    pub fn build<T>(&self) -> Result<BankBranch<T, ConfiguredSelector>, BranchError> {
        self.config.validate()?;
        let kind = self.config.selector;
        BankBranch::with_selector_from(self.config.tellers, |lines| {
            ConfiguredSelector::for_kind(kind, lines)
        })
    }

    pub fn build_shared<T>(&self) -> Result<SharedBranch<T, ConfiguredSelector>, BranchError> {
        self.build().map(SharedBranch::new)
    }
}
