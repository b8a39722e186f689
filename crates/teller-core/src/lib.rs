//! teller-core
//!
//! Core building blocks for the Teller branch model.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（LineId, CustomerId, Customer）
//! - **select**: 最短の列を選ぶ仕組み（LineSelector, LazyHeapSelector, IndexedSelector）
//! - **branch**: 列の集合そのもの（BankBranch, LineStatus, BranchStatus）
//! - **shared**: 複数タスクから使うための非同期ハンドル（SharedBranch, CustomerQueue）
//! - **config**: 設定と Builder（BranchConfig, BranchBuilder）
//! - **error**: エラー型

pub mod branch;
pub mod config;
pub mod domain;
pub mod error;
pub mod select;
pub mod shared;

pub use branch::{BankBranch, BranchStatus, LineStatus};
pub use config::{BranchBuilder, BranchConfig, ConfigError, SelectorKind};
pub use domain::{Customer, CustomerId, LineId};
pub use error::BranchError;
pub use select::{ConfiguredSelector, IndexedSelector, LazyHeapSelector, LineSelector, Selection};
pub use shared::{CustomerQueue, SharedBranch};
