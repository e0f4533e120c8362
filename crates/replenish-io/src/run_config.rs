//! 執行配置（JSON）

use replenish_core::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::columns::ColumnMapping;
use crate::error::IoResult;

/// 輸出欄位設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubmissionConfig {
    /// 訂購量欄位名稱
    pub column_name: String,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            column_name: "order_qty".to_string(),
        }
    }
}

/// 一次補貨計算的完整配置
///
/// ```json
/// {
///   "columns": { "store_id": "Store", "product_id": "Product" },
///   "policy": { "lead_time_weeks": 2, "shortage_cost": 1.0 },
///   "submission": { "column_name": "0" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub columns: ColumnMapping,
    pub policy: PolicyConfig,
    pub submission: SubmissionConfig,

    /// 載入銷售表時對缺週補 0
    pub zero_fill_missing_weeks: bool,
}

impl RunConfig {
    /// 從 JSON 檔案載入
    pub fn load(path: &Path) -> IoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::debug!("已載入配置 '{}'", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> IoResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
