//! 需求統計估計

use replenish_core::{DemandSummary, PairKey, SalesRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 需求估計器
///
/// 從歷史週銷售量計算平均值與樣本標準差。不做缺週補 0，
/// 補 0 是上游資料的責任。
pub struct DemandEstimator;

impl DemandEstimator {
    /// 計算單一配對的需求摘要
    ///
    /// 空序列回傳 (0, 0)；少於 2 筆或數值全部相同時標準差為 0。
    pub fn estimate(samples: &[Decimal]) -> DemandSummary {
        let values: Vec<f64> = samples
            .iter()
            .map(|q| q.to_f64().unwrap_or(0.0).max(0.0))
            .collect();

        let n = values.len();
        if n == 0 {
            return DemandSummary::zero();
        }

        let mean = values.iter().sum::<f64>() / n as f64;

        let is_constant = values.windows(2).all(|w| w[0] == w[1]);
        let std = if n < 2 || is_constant {
            0.0
        } else {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        };

        DemandSummary {
            mean_demand: if mean.is_finite() { mean } else { 0.0 },
            std_demand: if std.is_finite() { std } else { 0.0 },
            observations: n,
        }
    }

    /// 按配對分組銷售紀錄
    ///
    /// 有週欄位時序列依週排序；沒有週欄位的紀錄保持輸入順序。
    pub fn series_by_pair(records: &[SalesRecord]) -> HashMap<PairKey, Vec<Decimal>> {
        let mut grouped: HashMap<PairKey, Vec<&SalesRecord>> = HashMap::new();
        for record in records {
            grouped
                .entry(record.key.clone())
                .or_insert_with(Vec::new)
                .push(record);
        }

        grouped
            .into_iter()
            .map(|(key, mut rows)| {
                rows.sort_by_key(|r| r.week);
                let series = rows.into_iter().map(|r| r.quantity).collect();
                (key, series)
            })
            .collect()
    }

    /// 計算所有配對的需求摘要
    pub fn estimate_all(records: &[SalesRecord]) -> HashMap<PairKey, DemandSummary> {
        Self::series_by_pair(records)
            .into_iter()
            .map(|(key, series)| (key, Self::estimate(&series)))
            .collect()
    }
}
