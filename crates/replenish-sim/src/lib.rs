//! # Replenish Simulator
//!
//! 以週為單位重播需求，評估補貨策略的持有與缺貨成本

pub mod simulator;

// Re-export 主要類型
pub use simulator::{InventorySimulator, SimulationCosts};

use serde::Serialize;

/// 單週成本紀錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekCost {
    /// 週次（從 1 開始）
    pub week: usize,

    /// 本週持有成本
    pub holding_cost: f64,

    /// 本週缺貨成本
    pub shortage_cost: f64,

    /// 累計總成本
    pub cumulative_cost: f64,
}

impl WeekCost {
    /// 本週總成本
    pub fn round_cost(&self) -> f64 {
        self.holding_cost + self.shortage_cost
    }
}

/// 模擬結果
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// 每週成本
    pub weeks: Vec<WeekCost>,

    /// 累計持有成本
    pub total_holding_cost: f64,

    /// 累計缺貨成本
    pub total_shortage_cost: f64,
}

impl SimulationResult {
    /// 總成本
    pub fn total_cost(&self) -> f64 {
        self.total_holding_cost + self.total_shortage_cost
    }
}
