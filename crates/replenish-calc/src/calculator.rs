//! 補貨主計算器

use rayon::prelude::*;
use replenish_core::{
    InventoryState, OrderLine, PairKey, PolicyConfig, ReplenishError, Result, SalesRecord,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::base_stock::BaseStockCalculator;
use crate::demand_estimator::DemandEstimator;
use crate::order_resolver::OrderResolver;
use crate::service_level::{ServiceLevel, ServiceLevelResolver};
use crate::{OrderPlan, PlanWarning};

/// 補貨計算器
///
/// 每個配對獨立求解，互不共享狀態。
pub struct ReplenishmentCalculator {
    /// 策略配置
    config: PolicyConfig,
}

/// 單次計算的前置資料
struct PreparedRun {
    service_level: ServiceLevel,
    series: HashMap<PairKey, Vec<Decimal>>,
    states: HashMap<PairKey, InventoryState>,
    warnings: Vec<PlanWarning>,
}

impl ReplenishmentCalculator {
    /// 創建新的補貨計算器
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// 主計算入口（單執行緒）
    pub fn calculate(
        &self,
        index: &[PairKey],
        history: &[SalesRecord],
        states: &[InventoryState],
    ) -> Result<OrderPlan> {
        tracing::info!(
            "開始補貨計算：索引 {} 筆，銷售 {} 筆，現況 {} 筆",
            index.len(),
            history.len(),
            states.len()
        );
        let start_time = std::time::Instant::now();

        let prepared = self.prepare(index, history, states)?;

        // Step 4: 逐配對計算目標庫存
        tracing::debug!("Step 4: 計算目標庫存");
        let base_stocks = index
            .iter()
            .map(|key| {
                let s = self.base_stock_for(key, &prepared)?;
                Ok((key.clone(), s))
            })
            .collect::<Result<HashMap<PairKey, f64>>>()?;

        // Step 5: 依索引順序計算訂購量
        tracing::debug!("Step 5: 計算訂購量");
        let lines = OrderResolver::resolve(index, &base_stocks, &prepared.states, &self.config)?;

        Ok(self.finish(lines, prepared, start_time))
    }

    /// 並行計算入口
    ///
    /// 以 rayon 按配對分工，結果依索引順序合併，與 [`Self::calculate`] 相同。
    pub fn calculate_parallel(
        &self,
        index: &[PairKey],
        history: &[SalesRecord],
        states: &[InventoryState],
    ) -> Result<OrderPlan> {
        tracing::info!(
            "開始並行補貨計算：索引 {} 筆，執行緒 {} 個",
            index.len(),
            rayon::current_num_threads()
        );
        let start_time = std::time::Instant::now();

        let prepared = self.prepare(index, history, states)?;

        let lines = index
            .par_iter()
            .map(|key| {
                let state = prepared
                    .states
                    .get(key)
                    .ok_or_else(|| ReplenishError::MissingData(key.clone()))?;
                let series = prepared.series.get(key).map(Vec::as_slice).unwrap_or(&[]);
                self.solve_pair(key, series, state, prepared.service_level.z)
            })
            .collect::<Result<Vec<OrderLine>>>()?;

        Ok(self.finish(lines, prepared, start_time))
    }

    /// 單一配對求解：歷史 → 需求摘要 → S → 訂購量
    ///
    /// 純函數，不讀取其他配對的資料。
    pub fn solve_pair(
        &self,
        key: &PairKey,
        series: &[Decimal],
        state: &InventoryState,
        z: f64,
    ) -> Result<OrderLine> {
        let summary = DemandEstimator::estimate(series);
        let base_stock =
            BaseStockCalculator::calculate(&summary, z, self.config.protection_period())?;
        Ok(OrderResolver::resolve_line(key, base_stock, state, &self.config))
    }

    /// 驗證配置並整理輸入資料
    fn prepare(
        &self,
        index: &[PairKey],
        history: &[SalesRecord],
        states: &[InventoryState],
    ) -> Result<PreparedRun> {
        // Step 1: 驗證配置（任何配對處理前）
        tracing::debug!("Step 1: 驗證配置");
        self.config.validate()?;
        let service_level = ServiceLevelResolver::from_config(&self.config)?;
        tracing::debug!(
            "臨界比率 {:.6}，z = {:.4}，保護期 {} 週",
            service_level.critical_ratio,
            service_level.z,
            self.config.protection_period()
        );

        // Step 2: 按配對分組
        tracing::debug!("Step 2: 配對分組");
        let series = DemandEstimator::series_by_pair(history);
        let mut warnings = Vec::new();
        let state_map = self.create_state_map(states, &mut warnings);
        tracing::debug!("歷史配對數量: {}", series.len());

        // Step 3: 檢查現況資料完整性
        tracing::debug!("Step 3: 檢查現況資料");
        if let Some(missing) = index.iter().find(|key| !state_map.contains_key(*key)) {
            tracing::error!("配對 {} 缺少現況資料", missing);
            return Err(ReplenishError::MissingData(missing.clone()));
        }

        for key in index {
            if !series.contains_key(key) {
                warnings.push(PlanWarning::info(
                    key.clone(),
                    "無銷售歷史，目標庫存為 0".to_string(),
                ));
            }
        }

        Ok(PreparedRun {
            service_level,
            series,
            states: state_map,
            warnings,
        })
    }

    fn base_stock_for(&self, key: &PairKey, prepared: &PreparedRun) -> Result<f64> {
        let series = prepared.series.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let summary = DemandEstimator::estimate(series);
        let base_stock = BaseStockCalculator::calculate(
            &summary,
            prepared.service_level.z,
            self.config.protection_period(),
        )?;

        if summary.has_history() {
            tracing::debug!(
                "配對 {}: 平均 {:.3}，標準差 {:.3}，S = {:.3}",
                key,
                summary.mean_demand,
                summary.std_demand,
                base_stock
            );
        } else {
            tracing::debug!("配對 {}: 無銷售歷史，S = 0", key);
        }
        Ok(base_stock)
    }

    /// 建立現況對照表；重複配對以最後一筆為準
    fn create_state_map(
        &self,
        states: &[InventoryState],
        warnings: &mut Vec<PlanWarning>,
    ) -> HashMap<PairKey, InventoryState> {
        let mut map = HashMap::with_capacity(states.len());
        for state in states {
            if map.insert(state.key.clone(), state.clone()).is_some() {
                tracing::warn!("配對 {} 有重複現況資料，使用最後一筆", state.key);
                warnings.push(PlanWarning::warning(
                    state.key.clone(),
                    "重複現況資料，使用最後一筆".to_string(),
                ));
            }
        }
        map
    }

    fn finish(
        &self,
        lines: Vec<OrderLine>,
        prepared: PreparedRun,
        start_time: std::time::Instant,
    ) -> OrderPlan {
        let mut plan = OrderPlan::new(lines, prepared.service_level);
        for warning in prepared.warnings {
            plan.add_warning(warning);
        }
        plan.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("補貨計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "配對數量: {}，需下單: {}，訂購總量: {}",
            plan.len(),
            plan.ordered_count(),
            plan.total_units()
        );

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningSeverity;

    fn sales(key: &PairKey, quantities: &[i64]) -> Vec<SalesRecord> {
        quantities
            .iter()
            .map(|q| SalesRecord::new(key.clone(), Decimal::from(*q)))
            .collect()
    }

    #[test]
    fn test_solve_pair_newsvendor_scenario() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::new(2, 1, 9.0, 1.0));
        let key = PairKey::new("S1", "P1");
        let state = InventoryState::new(key.clone(), Decimal::from(5))
            .with_in_transit(vec![Decimal::from(5), Decimal::from(5)]);
        let series: Vec<Decimal> = vec![Decimal::from(10); 8];

        let line = calculator.solve_pair(&key, &series, &state, 1.2816).unwrap();

        assert_eq!(line.base_stock, 30.0);
        assert_eq!(line.inventory_position, Decimal::from(15));
        assert_eq!(line.order_qty, 15);
    }

    #[test]
    fn test_invalid_config_fails_before_pairs() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::new(2, 1, -1.0, 1.0));
        let key = PairKey::new("S1", "P1");

        // 同時缺少現況資料，但配置錯誤優先
        let err = calculator.calculate(&[key], &[], &[]).unwrap_err();
        assert!(matches!(err, ReplenishError::Configuration(_)));
    }

    #[test]
    fn test_first_missing_pair_reported() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::default());
        let a = PairKey::new("S1", "A");
        let b = PairKey::new("S1", "B");
        let c = PairKey::new("S1", "C");
        let states = vec![InventoryState::new(a.clone(), Decimal::ZERO)];

        let err = calculator
            .calculate_parallel(&[a, b.clone(), c], &[], &states)
            .unwrap_err();
        assert_eq!(err, ReplenishError::MissingData(b));
    }

    #[test]
    fn test_no_history_warning() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::default());
        let a = PairKey::new("S1", "A");
        let b = PairKey::new("S1", "B");
        let history = sales(&a, &[3, 5]);
        let states = vec![
            InventoryState::new(a.clone(), Decimal::ZERO),
            InventoryState::new(b.clone(), Decimal::from(4)),
        ];

        let plan = calculator
            .calculate(&[a, b.clone()], &history, &states)
            .unwrap();

        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].key, b);
        assert_eq!(plan.warnings[0].severity, WarningSeverity::Info);
        assert_eq!(plan.lines[1].order_qty, 0);
    }

    #[test]
    fn test_duplicate_state_last_row_wins() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::new(0, 1, 1.0, 1.0));
        let a = PairKey::new("S1", "A");
        let history = sales(&a, &[10, 10]);
        let states = vec![
            InventoryState::new(a.clone(), Decimal::from(100)),
            InventoryState::new(a.clone(), Decimal::from(2)),
        ];

        let plan = calculator.calculate(&[a], &history, &states).unwrap();

        // CR = 0.5 → z = 0，S = 10
        assert_eq!(plan.lines[0].order_qty, 8);
        assert_eq!(plan.warnings[0].severity, WarningSeverity::Warning);
    }

    #[test]
    fn test_duplicate_index_keys_emitted_per_occurrence() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::default());
        let a = PairKey::new("S1", "A");
        let states = vec![InventoryState::new(a.clone(), Decimal::ZERO)];
        let history = sales(&a, &[4, 4, 4]);

        let plan = calculator
            .calculate(&[a.clone(), a.clone()], &history, &states)
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.lines[0], plan.lines[1]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let calculator = ReplenishmentCalculator::new(PolicyConfig::new(2, 1, 1.0, 0.2));
        let mut index = Vec::new();
        let mut history = Vec::new();
        let mut states = Vec::new();

        for i in 0..200_i64 {
            let key = PairKey::new(format!("S{}", i % 7), format!("P{}", i));
            history.extend(sales(&key, &[i % 5, (i * 3) % 11, i % 13, 2]));
            states.push(
                InventoryState::new(key.clone(), Decimal::from(i % 9))
                    .with_in_transit(vec![Decimal::from(i % 4)]),
            );
            index.push(key);
        }
        index.reverse();

        let sequential = calculator.calculate(&index, &history, &states).unwrap();
        let parallel = calculator
            .calculate_parallel(&index, &history, &states)
            .unwrap();

        assert_eq!(sequential.lines, parallel.lines);
        assert_eq!(sequential.service_level, parallel.service_level);
    }
}
