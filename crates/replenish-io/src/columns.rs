//! 欄位角色對應

use serde::{Deserialize, Serialize};

/// 邏輯欄位 → 檔案欄位名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    /// 門市欄位
    pub store_id: String,

    /// 商品欄位
    pub product_id: String,

    /// 銷售數量欄位
    pub sales_qty: String,

    /// 銷售週欄位（可選）
    pub sales_date: Option<String>,

    /// 現有庫存欄位
    pub on_hand: String,

    /// 在途欄位（依到貨週排列）
    pub in_transit_cols: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            store_id: "store".to_string(),
            product_id: "product".to_string(),
            sales_qty: "qty".to_string(),
            sales_date: None,
            on_hand: "on_hand".to_string(),
            in_transit_cols: Vec::new(),
        }
    }
}

impl ColumnMapping {
    /// 解析逗號分隔的在途欄位清單
    pub fn parse_column_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let mapping = ColumnMapping::default();
        assert_eq!(mapping.store_id, "store");
        assert_eq!(mapping.sales_qty, "qty");
        assert!(mapping.sales_date.is_none());
        assert!(mapping.in_transit_cols.is_empty());
    }

    #[test]
    fn test_parse_column_list() {
        assert_eq!(
            ColumnMapping::parse_column_list(" In Transit W+1, In Transit W+2 ,,"),
            vec!["In Transit W+1".to_string(), "In Transit W+2".to_string()]
        );
    }
}
