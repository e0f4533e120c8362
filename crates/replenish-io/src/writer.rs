//! 訂購結果輸出

use replenish_core::OrderLine;
use std::io::Write;
use std::path::Path;

use crate::columns::ColumnMapping;
use crate::error::IoResult;

/// 訂購結果 CSV 輸出器
pub struct OrderWriter<'a> {
    mapping: &'a ColumnMapping,
    submission_col: &'a str,
}

impl<'a> OrderWriter<'a> {
    pub fn new(mapping: &'a ColumnMapping, submission_col: &'a str) -> Self {
        Self {
            mapping,
            submission_col,
        }
    }

    /// 寫入檔案
    pub fn write_path(&self, path: &Path, lines: &[OrderLine]) -> IoResult<()> {
        let file = std::fs::File::create(path)?;
        self.write(file, lines)?;
        tracing::info!("已輸出 {} 筆訂購結果至 '{}'", lines.len(), path.display());
        Ok(())
    }

    /// 依傳入順序寫出 門市,商品,訂購量
    pub fn write<W: Write>(&self, writer: W, lines: &[OrderLine]) -> IoResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            self.mapping.store_id.as_str(),
            self.mapping.product_id.as_str(),
            self.submission_col,
        ])?;

        for line in lines {
            wtr.write_record([
                line.key.location.as_str(),
                line.key.item.as_str(),
                line.order_qty.to_string().as_str(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
