//! 訂購結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PairKey;

/// 單一配對的訂購結果（輸出表的一列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// 配對鍵
    pub key: PairKey,

    /// 目標庫存水準 S
    pub base_stock: f64,

    /// 庫存部位
    pub inventory_position: Decimal,

    /// 訂購量（非負整數）
    pub order_qty: u64,
}

impl OrderLine {
    /// 創建新的訂購結果
    pub fn new(key: PairKey, base_stock: f64, inventory_position: Decimal, order_qty: u64) -> Self {
        Self {
            key,
            base_stock,
            inventory_position,
            order_qty,
        }
    }

    /// 是否需要下單
    pub fn needs_order(&self) -> bool {
        self.order_qty > 0
    }
}
