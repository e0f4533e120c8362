//! # Replenish
//!
//! 週期盤點 base-stock 補貨系統：計算引擎、模擬器與表格輸入輸出

pub mod cli;
pub mod logging;

pub use replenish_calc::{OrderPlan, ReplenishmentCalculator};
pub use replenish_core::{
    InventoryState, OrderLine, PairKey, PolicyConfig, ReplenishError, RoundingMode, SalesRecord,
};
pub use replenish_io::{ColumnMapping, RunConfig, TableLoader};
pub use replenish_sim::{InventorySimulator, SimulationCosts};
