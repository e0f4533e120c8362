//! CSV 表格載入
//!
//! 將索引、銷售歷史與庫存現況三張表轉換為引擎的類型化資料。

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use replenish_core::{InventoryState, PairKey, SalesRecord};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::columns::ColumnMapping;
use crate::error::{IoError, IoResult};

const INDEX_TABLE: &str = "索引表";
const SALES_TABLE: &str = "銷售表";
const STATE_TABLE: &str = "現況表";

/// 已讀入的 CSV 表格
struct RawTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn column(&self, name: &str, table: &str) -> IoResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::MissingColumn {
                table: table.to_string(),
                column: name.to_string(),
            })
    }
}

/// 表格載入器
pub struct TableLoader {
    mapping: ColumnMapping,
    zero_fill_missing_weeks: bool,
}

impl TableLoader {
    /// 創建新的載入器
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping,
            zero_fill_missing_weeks: false,
        }
    }

    /// 建構器模式：缺週補 0（僅在有週欄位時生效）
    pub fn with_zero_fill(mut self, enabled: bool) -> Self {
        self.zero_fill_missing_weeks = enabled;
        self
    }

    /// 載入索引表
    pub fn load_index(&self, path: &Path) -> IoResult<Vec<PairKey>> {
        self.read_index(File::open(path)?)
    }

    /// 載入銷售歷史
    pub fn load_sales_history(&self, path: &Path) -> IoResult<Vec<SalesRecord>> {
        self.read_sales_history(File::open(path)?)
    }

    /// 載入庫存現況
    pub fn load_current_state(&self, path: &Path) -> IoResult<Vec<InventoryState>> {
        self.read_current_state(File::open(path)?)
    }

    /// 從任意來源讀取索引表
    pub fn read_index<R: Read>(&self, reader: R) -> IoResult<Vec<PairKey>> {
        let table = read_table(reader)?;
        let store = table.column(&self.mapping.store_id, INDEX_TABLE)?;
        let product = table.column(&self.mapping.product_id, INDEX_TABLE)?;

        let keys: Vec<PairKey> = table
            .rows
            .iter()
            .map(|row| pair_key(row, store, product))
            .collect();

        tracing::debug!("索引表載入 {} 筆", keys.len());
        Ok(keys)
    }

    /// 從任意來源讀取銷售歷史
    ///
    /// 有週欄位時，同一配對同一週的多列加總為一筆。
    pub fn read_sales_history<R: Read>(&self, reader: R) -> IoResult<Vec<SalesRecord>> {
        let table = read_table(reader)?;
        let store = table.column(&self.mapping.store_id, SALES_TABLE)?;
        let product = table.column(&self.mapping.product_id, SALES_TABLE)?;
        let qty = table.column(&self.mapping.sales_qty, SALES_TABLE)?;
        let week = match &self.mapping.sales_date {
            // 未出現的週欄位視為沒有週資訊
            Some(name) => table.headers.iter().position(|h| h == name),
            None => None,
        };

        let mut records = Vec::with_capacity(table.rows.len());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let key = pair_key(row, store, product);
            let mut record = SalesRecord::new(key, parse_quantity(field(row, qty)));
            if let Some(week_col) = week {
                let value = field(row, week_col);
                let date = parse_week(value).ok_or_else(|| IoError::InvalidDate {
                    table: SALES_TABLE.to_string(),
                    row: row_idx + 1,
                    value: value.to_string(),
                })?;
                record = record.with_week(date);
            }
            records.push(record);
        }

        let records = if week.is_some() {
            aggregate_weekly(records, self.zero_fill_missing_weeks)
        } else {
            records
        };

        tracing::debug!("銷售表載入 {} 筆", records.len());
        Ok(records)
    }

    /// 從任意來源讀取庫存現況
    pub fn read_current_state<R: Read>(&self, reader: R) -> IoResult<Vec<InventoryState>> {
        let table = read_table(reader)?;
        let store = table.column(&self.mapping.store_id, STATE_TABLE)?;
        let product = table.column(&self.mapping.product_id, STATE_TABLE)?;
        let on_hand = table.column(&self.mapping.on_hand, STATE_TABLE)?;
        let in_transit = self
            .mapping
            .in_transit_cols
            .iter()
            .map(|name| table.column(name, STATE_TABLE))
            .collect::<IoResult<Vec<usize>>>()?;

        let states: Vec<InventoryState> = table
            .rows
            .iter()
            .map(|row| {
                let on_hand_qty = parse_quantity(field(row, on_hand));
                let pipeline = in_transit
                    .iter()
                    .map(|col| parse_quantity(field(row, *col)))
                    .collect();
                InventoryState::new(pair_key(row, store, product), on_hand_qty)
                    .with_in_transit(pipeline)
            })
            .collect();

        tracing::debug!("現況表載入 {} 筆", states.len());
        Ok(states)
    }
}

fn read_table<R: Read>(reader: R) -> IoResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允許行長度不一致
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // 跳過完全空白的行
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        rows.push(record);
    }

    Ok(RawTable { headers, rows })
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).map(str::trim).unwrap_or("")
}

fn pair_key(row: &StringRecord, store: usize, product: usize) -> PairKey {
    PairKey::new(field(row, store), field(row, product))
}

/// 解析數量；無法解析時視為 0
fn parse_quantity(value: &str) -> Decimal {
    if value.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(value)
        .ok()
        .or_else(|| value.parse::<f64>().ok().and_then(Decimal::from_f64))
        .unwrap_or_else(|| {
            tracing::warn!("無法解析數量 '{}'，以 0 處理", value);
            Decimal::ZERO
        })
}

fn parse_week(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok()
}

/// 同週加總，並可選擇對所有觀測週補 0
fn aggregate_weekly(records: Vec<SalesRecord>, zero_fill: bool) -> Vec<SalesRecord> {
    let mut weekly: BTreeMap<(PairKey, NaiveDate), Decimal> = BTreeMap::new();
    for record in records {
        if let Some(week) = record.week {
            *weekly.entry((record.key, week)).or_insert(Decimal::ZERO) += record.quantity;
        }
    }

    if zero_fill {
        let weeks: BTreeSet<NaiveDate> = weekly.keys().map(|(_, w)| *w).collect();
        let keys: BTreeSet<PairKey> = weekly.keys().map(|(k, _)| k.clone()).collect();
        for key in &keys {
            for week in &weeks {
                weekly
                    .entry((key.clone(), *week))
                    .or_insert(Decimal::ZERO);
            }
        }
    }

    weekly
        .into_iter()
        .map(|((key, week), quantity)| SalesRecord::new(key, quantity).with_week(week))
        .collect()
}
