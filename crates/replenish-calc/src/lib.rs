//! # Replenishment Calculation Engine
//!
//! 週期盤點 base-stock 補貨計算引擎

pub mod base_stock;
pub mod calculator;
pub mod demand_estimator;
pub mod order_resolver;
pub mod service_level;

// Re-export 主要類型
pub use base_stock::BaseStockCalculator;
pub use calculator::ReplenishmentCalculator;
pub use demand_estimator::DemandEstimator;
pub use order_resolver::OrderResolver;
pub use service_level::{ServiceLevel, ServiceLevelResolver};

use replenish_core::{OrderLine, PairKey};
use serde::Serialize;

/// 補貨計算結果（依索引順序）
#[derive(Debug, Clone, Serialize)]
pub struct OrderPlan {
    /// 訂購結果
    pub lines: Vec<OrderLine>,

    /// 本次使用的服務水準
    pub service_level: ServiceLevel,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl OrderPlan {
    /// 創建計算結果
    pub fn new(lines: Vec<OrderLine>, service_level: ServiceLevel) -> Self {
        Self {
            lines,
            service_level,
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }

    /// 配對數量
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 訂購總量
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| l.order_qty).sum()
    }

    /// 需要下單的配對數量
    pub fn ordered_count(&self) -> usize {
        self.lines.iter().filter(|l| l.needs_order()).count()
    }
}

/// 計算警告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanWarning {
    pub key: PairKey,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(key: PairKey, message: String, severity: WarningSeverity) -> Self {
        Self {
            key,
            message,
            severity,
        }
    }

    pub fn info(key: PairKey, message: String) -> Self {
        Self::new(key, message, WarningSeverity::Info)
    }

    pub fn warning(key: PairKey, message: String) -> Self {
        Self::new(key, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
