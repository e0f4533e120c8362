//! 需求模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PairKey;

/// 歷史銷售紀錄（每列一週）
///
/// 上游需保證每個配對在每個觀測週都有一列，無銷售的週以 0 填補；
/// 否則平均需求會因資料稀疏而偏高。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 配對鍵
    pub key: PairKey,

    /// 銷售週（可選；沒有週欄位時整批視為無序樣本）
    pub week: Option<NaiveDate>,

    /// 銷售數量
    pub quantity: Decimal,
}

impl SalesRecord {
    /// 創建新的銷售紀錄
    pub fn new(key: PairKey, quantity: Decimal) -> Self {
        Self {
            key,
            week: None,
            quantity,
        }
    }

    /// 建構器模式：設置銷售週
    pub fn with_week(mut self, week: NaiveDate) -> Self {
        self.week = Some(week);
        self
    }
}

/// 週需求統計摘要
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandSummary {
    /// 平均週需求
    pub mean_demand: f64,

    /// 週需求樣本標準差（n-1）
    pub std_demand: f64,

    /// 樣本數
    pub observations: usize,
}

impl DemandSummary {
    /// 無歷史資料的摘要
    pub fn zero() -> Self {
        Self {
            mean_demand: 0.0,
            std_demand: 0.0,
            observations: 0,
        }
    }

    /// 是否有任何觀測值
    pub fn has_history(&self) -> bool {
        self.observations > 0
    }
}

impl Default for DemandSummary {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_record_builder() {
        let week = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let record = SalesRecord::new(PairKey::new("S1", "P1"), Decimal::from(7)).with_week(week);

        assert_eq!(record.week, Some(week));
        assert_eq!(record.quantity, Decimal::from(7));
    }

    #[test]
    fn test_zero_summary() {
        let summary = DemandSummary::default();
        assert_eq!(summary.mean_demand, 0.0);
        assert_eq!(summary.std_demand, 0.0);
        assert!(!summary.has_history());
    }
}
