//! 輸入輸出錯誤類型

use replenish_core::ReplenishError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("檔案讀寫失敗: {0}")]
    FileError(#[from] std::io::Error),

    #[error("CSV 解析失敗: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON 解析失敗: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{table} 缺少欄位: {column}")]
    MissingColumn { table: String, column: String },

    #[error("{table} 第 {row} 列日期格式錯誤: {value}")]
    InvalidDate {
        table: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Engine(#[from] ReplenishError),
}

/// Result 類型別名
pub type IoResult<T> = Result<T, IoError>;
