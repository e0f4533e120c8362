//! # Replenish IO
//!
//! 表格輸入輸出：CSV 載入、欄位對應、結果輸出與執行配置

pub mod columns;
pub mod error;
pub mod loader;
pub mod run_config;
pub mod writer;

// Re-export 主要類型
pub use columns::ColumnMapping;
pub use error::{IoError, IoResult};
pub use loader::TableLoader;
pub use run_config::{RunConfig, SubmissionConfig};
pub use writer::OrderWriter;
