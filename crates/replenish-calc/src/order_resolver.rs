//! 訂購量計算與索引對齊

use replenish_core::{InventoryState, OrderLine, PairKey, PolicyConfig, ReplenishError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 訂購量解析器
pub struct OrderResolver;

impl OrderResolver {
    /// 計算訂購量 = round(max(0, S - 庫存部位))
    ///
    /// 有最大訂購量時在捨入前截斷；捨入規則取自配置。
    /// 超出 `u64` 範圍的訂購量飽和為 `u64::MAX`。
    pub fn order_quantity(
        base_stock: f64,
        inventory_position: Decimal,
        config: &PolicyConfig,
    ) -> u64 {
        // S 已保證為有限非負數；超出 Decimal 範圍時取上限
        let target = Decimal::from_f64(base_stock.max(0.0)).unwrap_or(Decimal::MAX);

        let mut raw = (target - inventory_position.max(Decimal::ZERO)).max(Decimal::ZERO);

        if let Some(max_qty) = config.max_order_per_item {
            raw = raw.min(max_qty.max(Decimal::ZERO));
        }

        let raw = raw.min(Decimal::from(u64::MAX));
        config.rounding.round(raw).to_u64().unwrap_or(u64::MAX)
    }

    /// 計算單一配對的訂購結果
    pub fn resolve_line(
        key: &PairKey,
        base_stock: f64,
        state: &InventoryState,
        config: &PolicyConfig,
    ) -> OrderLine {
        let inventory_position = state.inventory_position();
        let order_qty = Self::order_quantity(base_stock, inventory_position, config);

        OrderLine::new(key.clone(), base_stock, inventory_position, order_qty)
    }

    /// 依索引順序計算所有配對的訂購結果
    ///
    /// 沒有目標庫存的配對視為 S = 0；沒有現況資料的配對回傳 `MissingData`。
    pub fn resolve(
        index: &[PairKey],
        base_stocks: &HashMap<PairKey, f64>,
        states: &HashMap<PairKey, InventoryState>,
        config: &PolicyConfig,
    ) -> Result<Vec<OrderLine>> {
        let mut lines = Vec::with_capacity(index.len());

        for key in index {
            let state = states
                .get(key)
                .ok_or_else(|| ReplenishError::MissingData(key.clone()))?;
            let base_stock = base_stocks.get(key).copied().unwrap_or(0.0);

            lines.push(Self::resolve_line(key, base_stock, state, config));
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use replenish_core::RoundingMode;
    use rstest::rstest;

    fn state(key: &PairKey, on_hand: i64, in_transit: &[i64]) -> InventoryState {
        InventoryState::new(key.clone(), Decimal::from(on_hand))
            .with_in_transit(in_transit.iter().map(|q| Decimal::from(*q)).collect())
    }

    #[test]
    fn test_order_up_to_base_stock() {
        let config = PolicyConfig::default();
        let qty = OrderResolver::order_quantity(30.0, Decimal::from(15), &config);
        assert_eq!(qty, 15);
    }

    #[test]
    fn test_no_order_when_position_covers_target() {
        let config = PolicyConfig::default();
        assert_eq!(OrderResolver::order_quantity(12.0, Decimal::from(20), &config), 0);
        assert_eq!(OrderResolver::order_quantity(20.0, Decimal::from(20), &config), 0);
    }

    #[rstest]
    #[case(RoundingMode::HalfEven, 12.5, 12)]
    #[case(RoundingMode::HalfEven, 13.5, 14)]
    #[case(RoundingMode::HalfUp, 12.5, 13)]
    #[case(RoundingMode::HalfUp, 12.49, 12)]
    fn test_rounding_policy(
        #[case] mode: RoundingMode,
        #[case] base_stock: f64,
        #[case] expected: u64,
    ) {
        let config = PolicyConfig::default().with_rounding(mode);
        let qty = OrderResolver::order_quantity(base_stock, Decimal::ZERO, &config);
        assert_eq!(qty, expected);
    }

    #[test]
    fn test_max_order_caps_before_rounding() {
        let config = PolicyConfig::default().with_max_order_per_item(Decimal::from(10));
        assert_eq!(OrderResolver::order_quantity(100.0, Decimal::ZERO, &config), 10);
    }

    #[test]
    fn test_huge_base_stock_saturates() {
        let config = PolicyConfig::default();
        assert_eq!(OrderResolver::order_quantity(1e20, Decimal::ZERO, &config), u64::MAX);
        assert_eq!(OrderResolver::order_quantity(1e300, Decimal::ZERO, &config), u64::MAX);

        let capped = config.with_max_order_per_item(Decimal::from(500));
        assert_eq!(OrderResolver::order_quantity(1e20, Decimal::ZERO, &capped), 500);
    }

    #[test]
    fn test_resolve_keeps_index_order() {
        let a = PairKey::new("S1", "A");
        let b = PairKey::new("S1", "B");
        let c = PairKey::new("S2", "A");
        let index = vec![c.clone(), a.clone(), b.clone()];

        let base_stocks = HashMap::from([(a.clone(), 10.0), (c.clone(), 7.0)]);
        let states = HashMap::from([
            (a.clone(), state(&a, 4, &[])),
            (b.clone(), state(&b, 3, &[1])),
            (c.clone(), state(&c, 0, &[2, 1])),
        ]);

        let config = PolicyConfig::default();
        let lines = OrderResolver::resolve(&index, &base_stocks, &states, &config).unwrap();

        let keys: Vec<_> = lines.iter().map(|l| l.key.clone()).collect();
        assert_eq!(keys, index);
        assert_eq!(lines[0].order_qty, 4);
        assert_eq!(lines[1].order_qty, 6);
        // 無歷史：S = 0
        assert_eq!(lines[2].base_stock, 0.0);
        assert_eq!(lines[2].order_qty, 0);
    }

    #[test]
    fn test_missing_state_names_pair() {
        let a = PairKey::new("S1", "A");
        let missing = PairKey::new("S9", "Z");
        let index = vec![a.clone(), missing.clone()];
        let states = HashMap::from([(a.clone(), state(&a, 1, &[]))]);

        let err = OrderResolver::resolve(&index, &HashMap::new(), &states, &PolicyConfig::default())
            .unwrap_err();

        assert_eq!(err, ReplenishError::MissingData(missing));
        assert!(err.to_string().contains("S9"));
    }

    proptest! {
        #[test]
        fn order_is_zero_when_position_covers_target(
            base_stock in 0.0_f64..1e5,
            surplus in 0_i64..1000,
        ) {
            let position = Decimal::from_f64(base_stock.ceil()).unwrap() + Decimal::from(surplus);
            let qty = OrderResolver::order_quantity(base_stock, position, &PolicyConfig::default());
            prop_assert_eq!(qty, 0);
        }

        #[test]
        fn order_never_exceeds_gap_by_more_than_half(
            base_stock in 0.0_f64..1e5,
            position in 0_i64..100_000,
        ) {
            let config = PolicyConfig::default();
            let qty = OrderResolver::order_quantity(base_stock, Decimal::from(position), &config);
            let gap = (base_stock - position as f64).max(0.0);
            prop_assert!((qty as f64 - gap).abs() <= 0.5 + 1e-9);
        }
    }
}
