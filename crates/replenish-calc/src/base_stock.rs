//! 目標庫存水準（base-stock level）

use replenish_core::{DemandSummary, ReplenishError, Result};

/// 目標庫存計算器
pub struct BaseStockCalculator;

impl BaseStockCalculator {
    /// 計算目標庫存水準
    ///
    /// S = 平均需求·P + z·需求標準差·√P，結果小於 0 時取 0。
    pub fn calculate(summary: &DemandSummary, z: f64, protection_period: u32) -> Result<f64> {
        if protection_period == 0 {
            return Err(ReplenishError::Configuration(
                "保護期必須為正整數週".to_string(),
            ));
        }

        let weeks = f64::from(protection_period);
        let mean_p = summary.mean_demand.max(0.0) * weeks;
        let std_p = summary.std_demand.max(0.0) * weeks.sqrt();

        let base_stock = mean_p + z * std_p;
        if base_stock.is_finite() && base_stock > 0.0 {
            Ok(base_stock)
        } else {
            Ok(0.0)
        }
    }

    /// 安全庫存部分 z·σ·√P
    pub fn safety_stock(summary: &DemandSummary, z: f64, protection_period: u32) -> f64 {
        z * summary.std_demand.max(0.0) * f64::from(protection_period).sqrt()
    }
}
