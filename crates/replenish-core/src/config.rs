//! 補貨策略配置

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{ReplenishError, Result};

/// 週期盤點 base-stock 策略參數
///
/// 同一次計算中所有配對共用一份配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// 提前期（週）
    pub lead_time_weeks: u32,

    /// 盤點週期（週）
    pub review_period_weeks: u32,

    /// 缺貨成本（每單位）
    #[serde(alias = "shortage_cost_per_unit")]
    pub shortage_cost: f64,

    /// 持有成本（每單位每週）
    #[serde(alias = "holding_cost_per_unit_per_week")]
    pub holding_cost: f64,

    /// 最低服務水準（臨界比率的下限）
    pub min_service_level: Option<f64>,

    /// 單品最大訂購量（捨入前套用）
    pub max_order_per_item: Option<Decimal>,

    /// 訂購量捨入規則
    pub rounding: RoundingMode,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            lead_time_weeks: 2,
            review_period_weeks: 1,
            shortage_cost: 1.0,
            holding_cost: 0.2,
            min_service_level: None,
            max_order_per_item: None,
            rounding: RoundingMode::HalfEven,
        }
    }
}

impl PolicyConfig {
    /// 創建新的策略配置
    pub fn new(
        lead_time_weeks: u32,
        review_period_weeks: u32,
        shortage_cost: f64,
        holding_cost: f64,
    ) -> Self {
        Self {
            lead_time_weeks,
            review_period_weeks,
            shortage_cost,
            holding_cost,
            ..Self::default()
        }
    }

    /// 建構器模式：設置最低服務水準
    pub fn with_min_service_level(mut self, level: f64) -> Self {
        self.min_service_level = Some(level);
        self
    }

    /// 建構器模式：設置單品最大訂購量
    pub fn with_max_order_per_item(mut self, qty: Decimal) -> Self {
        self.max_order_per_item = Some(qty);
        self
    }

    /// 建構器模式：設置捨入規則
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// 保護期 P = 提前期 + 盤點週期（週）
    pub fn protection_period(&self) -> u32 {
        self.lead_time_weeks.saturating_add(self.review_period_weeks)
    }

    /// 驗證配置
    ///
    /// 任何錯誤都會在處理第一個配對之前回報。
    pub fn validate(&self) -> Result<()> {
        if self.review_period_weeks == 0 {
            return Err(ReplenishError::Configuration(
                "盤點週期必須至少為 1 週".to_string(),
            ));
        }

        validate_costs(self.shortage_cost, self.holding_cost)?;

        if let Some(level) = self.min_service_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ReplenishError::Configuration(format!(
                    "最低服務水準必須介於 0 與 1 之間: {}",
                    level
                )));
            }
        }

        if let Some(max_qty) = self.max_order_per_item {
            if max_qty < Decimal::ZERO {
                return Err(ReplenishError::Configuration(format!(
                    "最大訂購量不可為負: {}",
                    max_qty
                )));
            }
        }

        Ok(())
    }
}

/// 驗證成本參數：兩者皆須為有限非負數，且不可同時為 0
pub fn validate_costs(shortage_cost: f64, holding_cost: f64) -> Result<()> {
    for (name, value) in [("缺貨成本", shortage_cost), ("持有成本", holding_cost)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ReplenishError::Configuration(format!(
                "{}必須為非負有限數: {}",
                name, value
            )));
        }
    }

    if shortage_cost == 0.0 && holding_cost == 0.0 {
        return Err(ReplenishError::Configuration(
            "缺貨成本與持有成本不可同時為 0".to_string(),
        ));
    }

    Ok(())
}

/// 訂購量捨入規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 四捨六入五成雙（銀行家捨入）
    #[default]
    HalfEven,

    /// 四捨五入（遠離零）
    HalfUp,
}

impl RoundingMode {
    /// 對應的 Decimal 捨入策略
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// 捨入到整數
    pub fn round(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(0, self.strategy())
    }
}
