//! 週庫存狀態轉移模擬（缺貨即流失）

use replenish_core::{InventoryState, PairKey, ReplenishError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::{SimulationResult, WeekCost};

/// 模擬成本參數
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationCosts {
    /// 持有成本（每單位每週）
    pub holding_per_unit: f64,

    /// 缺貨成本（每單位）
    pub shortage_per_unit: f64,
}

impl Default for SimulationCosts {
    fn default() -> Self {
        Self {
            holding_per_unit: 0.2,
            shortage_per_unit: 1.0,
        }
    }
}

/// 單一配對的模擬狀態
#[derive(Debug, Clone)]
struct PairState {
    key: PairKey,
    end_inventory: Decimal,
    /// 第 0 格為下週到貨
    pipeline: VecDeque<Decimal>,
    demand: Vec<Decimal>,
}

/// 庫存模擬器
///
/// 每週轉移：
/// - 期初 = 上週期末 + 本週到貨
/// - 銷售 = min(期初, 需求)，未滿足需求直接流失
/// - 期末 = 期初 - 銷售
/// - 在途前移一格，新訂單進入第 `lead_time` 格
pub struct InventorySimulator {
    costs: SimulationCosts,
    lead_time: usize,
    pairs: Vec<PairState>,
    horizon: usize,
    week: usize,
    cumulative_holding: f64,
    cumulative_shortage: f64,
}

impl InventorySimulator {
    /// 創建模擬器
    ///
    /// `demand` 為每個配對的逐週需求，缺少的週視為 0。提前期 0 週
    /// 視為 1 週（訂單最早在下週期初到貨）。
    pub fn new(
        initial: &[InventoryState],
        demand: &HashMap<PairKey, Vec<Decimal>>,
        lead_time_weeks: u32,
        costs: SimulationCosts,
    ) -> Result<Self> {
        let horizon = demand.values().map(Vec::len).max().unwrap_or(0);
        if horizon == 0 {
            return Err(ReplenishError::Configuration(
                "模擬需求期間不可為空".to_string(),
            ));
        }

        let lead_time = (lead_time_weeks as usize).max(1);
        let pairs = initial
            .iter()
            .map(|state| {
                let mut pipeline: VecDeque<Decimal> = state
                    .in_transit
                    .iter()
                    .map(|q| (*q).max(Decimal::ZERO))
                    .collect();
                while pipeline.len() < lead_time {
                    pipeline.push_back(Decimal::ZERO);
                }

                PairState {
                    key: state.key.clone(),
                    end_inventory: state.on_hand.max(Decimal::ZERO),
                    pipeline,
                    demand: demand.get(&state.key).cloned().unwrap_or_default(),
                }
            })
            .collect();

        Ok(Self {
            costs,
            lead_time,
            pairs,
            horizon,
            week: 0,
            cumulative_holding: 0.0,
            cumulative_shortage: 0.0,
        })
    }

    pub fn is_done(&self) -> bool {
        self.week >= self.horizon
    }

    /// 目前各配對的庫存現況（可直接作為補貨計算的輸入）
    pub fn current_states(&self) -> Vec<InventoryState> {
        self.pairs
            .iter()
            .map(|p| {
                InventoryState::new(p.key.clone(), p.end_inventory)
                    .with_in_transit(p.pipeline.iter().copied().collect())
            })
            .collect()
    }

    /// 指定配對的庫存部位
    pub fn inventory_position(&self, key: &PairKey) -> Option<Decimal> {
        self.pairs
            .iter()
            .find(|p| &p.key == key)
            .map(|p| p.end_inventory + p.pipeline.iter().copied().sum::<Decimal>())
    }

    /// 推進一週
    ///
    /// 未出現在 `orders` 中的配對本週不下單；負訂單視為 0。
    pub fn step(&mut self, orders: &HashMap<PairKey, Decimal>) -> Result<WeekCost> {
        if self.is_done() {
            return Err(ReplenishError::CalculationError(format!(
                "模擬已結束（共 {} 週）",
                self.horizon
            )));
        }

        let t = self.week;
        let mut holding_units = Decimal::ZERO;
        let mut missed_units = Decimal::ZERO;

        for pair in &mut self.pairs {
            let arriving = pair.pipeline.pop_front().unwrap_or(Decimal::ZERO);
            let start = pair.end_inventory + arriving;
            let demand = pair.demand.get(t).copied().unwrap_or(Decimal::ZERO).max(Decimal::ZERO);

            let sales = start.min(demand);
            missed_units += demand - sales;
            pair.end_inventory = start - sales;
            holding_units += pair.end_inventory;

            while pair.pipeline.len() < self.lead_time {
                pair.pipeline.push_back(Decimal::ZERO);
            }
            let order = orders
                .get(&pair.key)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO);
            pair.pipeline[self.lead_time - 1] += order;
        }

        let holding_cost = holding_units.to_f64().unwrap_or(0.0) * self.costs.holding_per_unit;
        let shortage_cost = missed_units.to_f64().unwrap_or(0.0) * self.costs.shortage_per_unit;
        self.cumulative_holding += holding_cost;
        self.cumulative_shortage += shortage_cost;
        self.week += 1;

        let cost = WeekCost {
            week: self.week,
            holding_cost,
            shortage_cost,
            cumulative_cost: self.cumulative_holding + self.cumulative_shortage,
        };
        tracing::debug!(
            "模擬第 {} 週：持有 {:.2}，缺貨 {:.2}，本週合計 {:.2}",
            cost.week,
            cost.holding_cost,
            cost.shortage_cost,
            cost.round_cost()
        );

        Ok(cost)
    }

    /// 以策略驅動整個模擬期間
    ///
    /// 每週先以目前庫存現況呼叫 `policy` 取得訂單，再推進一週。
    pub fn run<F>(&mut self, mut policy: F) -> Result<SimulationResult>
    where
        F: FnMut(usize, &[InventoryState]) -> Result<HashMap<PairKey, Decimal>>,
    {
        tracing::info!(
            "開始模擬：配對 {} 個，期間 {} 週，提前期 {} 週",
            self.pairs.len(),
            self.horizon,
            self.lead_time
        );

        let mut weeks = Vec::with_capacity(self.horizon - self.week);
        while !self.is_done() {
            let states = self.current_states();
            let orders = policy(self.week, &states)?;
            weeks.push(self.step(&orders)?);
        }

        tracing::info!(
            "模擬完成：持有成本 {:.2}，缺貨成本 {:.2}",
            self.cumulative_holding,
            self.cumulative_shortage
        );

        Ok(SimulationResult {
            weeks,
            total_holding_cost: self.cumulative_holding,
            total_shortage_cost: self.cumulative_shortage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key() -> PairKey {
        PairKey::new("S1", "P1")
    }

    fn qty(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    fn simulator(
        on_hand: i64,
        in_transit: &[i64],
        demand: &[i64],
        lead: u32,
    ) -> InventorySimulator {
        let initial = vec![
            InventoryState::new(key(), Decimal::from(on_hand)).with_in_transit(qty(in_transit)),
        ];
        let demand = HashMap::from([(key(), qty(demand))]);
        InventorySimulator::new(&initial, &demand, lead, SimulationCosts::default()).unwrap()
    }

    #[test]
    fn test_empty_horizon_rejected() {
        let initial = vec![InventoryState::new(key(), Decimal::ZERO)];
        let costs = SimulationCosts::default();
        let result = InventorySimulator::new(&initial, &HashMap::new(), 2, costs);
        assert!(matches!(result, Err(ReplenishError::Configuration(_))));
    }

    #[test]
    fn test_week_transition_and_costs() {
        let mut sim = simulator(5, &[3, 4], &[10, 2], 2);

        // 期初 8，需求 10 → 銷售 8，流失 2，期末 0
        let week1 = sim.step(&HashMap::from([(key(), Decimal::from(6))])).unwrap();
        assert_eq!(week1.week, 1);
        assert_eq!(week1.holding_cost, 0.0);
        assert_eq!(week1.shortage_cost, 2.0);
        assert_eq!(sim.inventory_position(&key()), Some(Decimal::from(10)));

        // 期初 4，需求 2 → 期末 2
        let week2 = sim.step(&HashMap::new()).unwrap();
        assert!((week2.holding_cost - 0.4).abs() < 1e-12);
        assert_eq!(week2.shortage_cost, 0.0);
        assert!((week2.cumulative_cost - 2.4).abs() < 1e-12);
        assert!((week1.round_cost() + week2.round_cost() - week2.cumulative_cost).abs() < 1e-12);
        assert!(sim.is_done());
    }

    #[test]
    fn test_order_arrives_after_lead_time() {
        let mut sim = simulator(0, &[], &[0, 0, 0, 0], 2);

        sim.step(&HashMap::from([(key(), Decimal::from(7))])).unwrap();
        assert_eq!(sim.current_states()[0].on_hand, Decimal::ZERO);
        sim.step(&HashMap::new()).unwrap();
        assert_eq!(sim.current_states()[0].on_hand, Decimal::ZERO);
        sim.step(&HashMap::new()).unwrap();
        assert_eq!(sim.current_states()[0].on_hand, Decimal::from(7));
    }

    #[test]
    fn test_step_after_horizon_fails() {
        let mut sim = simulator(1, &[], &[1], 1);
        sim.step(&HashMap::new()).unwrap();
        assert!(sim.step(&HashMap::new()).is_err());
    }

    #[test]
    fn test_run_with_constant_policy() {
        let mut sim = simulator(0, &[], &[2, 2, 2, 2], 1);
        let result = sim
            .run(|_, _| Ok(HashMap::from([(key(), Decimal::from(2))])))
            .unwrap();

        assert_eq!(result.weeks.len(), 4);
        // 第 1 週無庫存：流失 2
        assert_eq!(result.weeks[0].shortage_cost, 2.0);
        assert_eq!(result.total_shortage_cost, 2.0);
        assert_eq!(result.total_holding_cost, 0.0);
        assert_eq!(result.total_cost(), 2.0);
    }

    proptest! {
        #[test]
        fn units_are_conserved(
            on_hand in 0_i64..50,
            demand in proptest::collection::vec(0_i64..20, 1..12),
            order in 0_i64..20,
        ) {
            let mut sim = simulator(on_hand, &[], &demand, 2);
            let weeks = demand.len() as i64;
            let result = sim
                .run(|_, _| Ok(HashMap::from([(key(), Decimal::from(order))])))
                .unwrap();

            // 期初 + 全部訂單 = 已售 + 期末庫存 + 在途
            let missed: f64 = result.weeks.iter().map(|w| w.shortage_cost).sum();
            let total_demand: i64 = demand.iter().sum();
            let sold = Decimal::from(total_demand) - Decimal::try_from(missed).unwrap();
            let position = sim.inventory_position(&key()).unwrap();
            prop_assert_eq!(Decimal::from(on_hand + order * weeks), sold + position);
        }
    }
}
