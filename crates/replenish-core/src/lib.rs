//! # Replenish Core
//!
//! 補貨引擎的核心資料模型與類型定義

pub mod config;
pub mod demand;
pub mod inventory;
pub mod key;
pub mod plan;

// Re-export 主要類型
pub use config::{PolicyConfig, RoundingMode};
pub use demand::{DemandSummary, SalesRecord};
pub use inventory::InventoryState;
pub use key::PairKey;
pub use plan::OrderLine;

/// 補貨錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplenishError {
    /// 成本或週期參數無效，整批計算在處理任何配對前中止
    #[error("配置錯誤: {0}")]
    Configuration(String),

    /// 索引中的配對缺少現況（庫存）資料
    #[error("缺少現況資料: {0}")]
    MissingData(PairKey),

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, ReplenishError>;
