//! 服務水準（臨界比率與常態分位數）

use replenish_core::config::validate_costs;
use replenish_core::{PolicyConfig, ReplenishError, Result};
use serde::Serialize;

/// 臨界比率夾限：避免 0 或 1 產生無窮大的分位數
pub const SERVICE_LEVEL_EPSILON: f64 = 1e-6;

/// 解析後的服務水準
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceLevel {
    /// 目標不缺貨機率（已夾限）
    pub critical_ratio: f64,

    /// 標準常態分位數
    pub z: f64,
}

/// 服務水準解析器
pub struct ServiceLevelResolver;

impl ServiceLevelResolver {
    /// 計算原始臨界比率 CR = 缺貨成本 / (缺貨成本 + 持有成本)
    pub fn critical_ratio(shortage_cost: f64, holding_cost: f64) -> Result<f64> {
        validate_costs(shortage_cost, holding_cost)?;
        Ok(shortage_cost / (shortage_cost + holding_cost))
    }

    /// 解析服務水準
    ///
    /// 若設置最低服務水準，臨界比率不會低於該值；最後夾限到 [ε, 1-ε]。
    pub fn resolve(
        shortage_cost: f64,
        holding_cost: f64,
        min_service_level: Option<f64>,
    ) -> Result<ServiceLevel> {
        let mut ratio = Self::critical_ratio(shortage_cost, holding_cost)?;

        if let Some(level) = min_service_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ReplenishError::Configuration(format!(
                    "最低服務水準必須介於 0 與 1 之間: {}",
                    level
                )));
            }
            ratio = ratio.max(level);
        }

        let critical_ratio = ratio.clamp(SERVICE_LEVEL_EPSILON, 1.0 - SERVICE_LEVEL_EPSILON);

        Ok(ServiceLevel {
            critical_ratio,
            z: inverse_normal_cdf(critical_ratio),
        })
    }

    /// 依策略配置解析服務水準
    pub fn from_config(config: &PolicyConfig) -> Result<ServiceLevel> {
        Self::resolve(
            config.shortage_cost,
            config.holding_cost,
            config.min_service_level,
        )
    }
}

// Acklam 有理逼近係數
const A: [f64; 6] = [
    -3.969683028665376e1,
    2.209460984245205e2,
    -2.759285104469687e2,
    1.383577518672690e2,
    -3.066479806614716e1,
    2.506628277459239e0,
];
const B: [f64; 5] = [
    -5.447609879822406e1,
    1.615858368580409e2,
    -1.556989798598866e2,
    6.680131188771972e1,
    -1.328068155288572e1,
];
const C: [f64; 6] = [
    -7.784894002430293e-3,
    -3.223964580411365e-1,
    -2.400758277161838e0,
    -2.549732539343734e0,
    4.374664141464968e0,
    2.938163982698783e0,
];
const D: [f64; 4] = [
    7.784695709041462e-3,
    3.224671290700398e-1,
    2.445134137142996e0,
    3.754408661907416e0,
];

const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// 標準常態分佈的反累積分佈函數（Acklam 演算法）
///
/// 相對誤差約 1.15e-9。`p <= 0` 回傳負無窮，`p >= 1` 回傳正無窮。
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        return tail(q);
    }

    if p > P_HIGH {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        return -tail(q);
    }

    let q = p - 0.5;
    let r = q * q;
    (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
        / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
}

fn tail(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}
