//! 庫存現況模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PairKey;

/// 配對的庫存現況
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    /// 配對鍵
    pub key: PairKey,

    /// 現有庫存
    pub on_hand: Decimal,

    /// 在途數量（依到貨週排列，第 0 筆為下週到貨）
    pub in_transit: Vec<Decimal>,
}

impl InventoryState {
    /// 創建新的庫存現況（無在途）
    pub fn new(key: PairKey, on_hand: Decimal) -> Self {
        Self {
            key,
            on_hand,
            in_transit: Vec::new(),
        }
    }

    /// 建構器模式：設置在途數量
    pub fn with_in_transit(mut self, in_transit: Vec<Decimal>) -> Self {
        self.in_transit = in_transit;
        self
    }

    /// 在途總量（負值視為 0）
    pub fn on_order(&self) -> Decimal {
        self.in_transit
            .iter()
            .map(|q| (*q).max(Decimal::ZERO))
            .sum()
    }

    /// 庫存部位 = 現有庫存 + 在途總量
    pub fn inventory_position(&self) -> Decimal {
        self.on_hand.max(Decimal::ZERO) + self.on_order()
    }
}
