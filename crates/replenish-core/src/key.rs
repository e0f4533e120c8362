//! 配對鍵（門市 × 商品）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 規劃單位：(門市, 商品)
///
/// 輸出順序由索引表決定，鍵本身只負責識別。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    /// 門市/地點ID
    pub location: String,

    /// 商品ID
    pub item: String,
}

impl PairKey {
    /// 創建新的配對鍵
    pub fn new(location: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            item: item.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.location, self.item)
    }
}
