//! 命令列：`replenish order ...`

use anyhow::{bail, Context};
use replenish_calc::ReplenishmentCalculator;
use replenish_io::{ColumnMapping, OrderWriter, RunConfig, TableLoader};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

pub const USAGE: &str = "\
用法: replenish order --sales <CSV> --current <CSV> --index <CSV> --out <CSV> [選項]

選項:
  --config <JSON>            欄位與策略配置檔
  --store-col <NAME>         門市欄位
  --product-col <NAME>       商品欄位
  --sales-qty-col <NAME>     銷售數量欄位
  --sales-date-col <NAME>    銷售週欄位
  --on-hand-col <NAME>       現有庫存欄位
  --in-transit-cols <A,B>    在途欄位（逗號分隔）
  --lead <WEEKS>             提前期
  --review <WEEKS>           盤點週期
  --shortage-cost <X>        缺貨成本
  --holding-cost <X>         持有成本
  --min-service <X>          最低服務水準
  --max-order <X>            單品最大訂購量
  --submission-col <NAME>    輸出欄位名稱
  --zero-fill                銷售表缺週補 0
  --parallel                 並行計算";

/// `order` 子命令參數；未指定的選項沿用配置檔或預設值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderArgs {
    pub sales: PathBuf,
    pub current: PathBuf,
    pub index: PathBuf,
    pub out: PathBuf,
    pub config: Option<PathBuf>,

    pub store_col: Option<String>,
    pub product_col: Option<String>,
    pub sales_qty_col: Option<String>,
    pub sales_date_col: Option<String>,
    pub on_hand_col: Option<String>,
    pub in_transit_cols: Option<Vec<String>>,

    pub lead_time_weeks: Option<u32>,
    pub review_period_weeks: Option<u32>,
    pub shortage_cost: Option<f64>,
    pub holding_cost: Option<f64>,
    pub min_service_level: Option<f64>,
    pub max_order: Option<f64>,
    pub submission_col: Option<String>,

    pub zero_fill: bool,
    pub parallel: bool,
}

impl OrderArgs {
    /// 解析命令列（不含程式名稱）
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        match args.next().as_deref() {
            Some("order") => {}
            Some(other) => bail!("未知的子命令: {}\n\n{}", other, USAGE),
            None => bail!("{}", USAGE),
        }

        let mut parsed = OrderArgs::default();
        let (mut sales, mut current, mut index, mut out) = (None, None, None, None);

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--zero-fill" => parsed.zero_fill = true,
                "--parallel" => parsed.parallel = true,
                _ => {
                    let value = args
                        .next()
                        .with_context(|| format!("選項 {} 缺少值", flag))?;
                    match flag.as_str() {
                        "--sales" => sales = Some(PathBuf::from(value)),
                        "--current" => current = Some(PathBuf::from(value)),
                        "--index" => index = Some(PathBuf::from(value)),
                        "--out" => out = Some(PathBuf::from(value)),
                        "--config" => parsed.config = Some(PathBuf::from(value)),
                        "--store-col" => parsed.store_col = Some(value),
                        "--product-col" => parsed.product_col = Some(value),
                        "--sales-qty-col" => parsed.sales_qty_col = Some(value),
                        "--sales-date-col" => parsed.sales_date_col = Some(value),
                        "--on-hand-col" => parsed.on_hand_col = Some(value),
                        "--in-transit-cols" => {
                            parsed.in_transit_cols =
                                Some(ColumnMapping::parse_column_list(&value))
                        }
                        "--lead" => {
                            parsed.lead_time_weeks = Some(parse_number(&flag, &value)?)
                        }
                        "--review" => {
                            parsed.review_period_weeks = Some(parse_number(&flag, &value)?)
                        }
                        "--shortage-cost" => {
                            parsed.shortage_cost = Some(parse_number(&flag, &value)?)
                        }
                        "--holding-cost" => {
                            parsed.holding_cost = Some(parse_number(&flag, &value)?)
                        }
                        "--min-service" => {
                            parsed.min_service_level = Some(parse_number(&flag, &value)?)
                        }
                        "--max-order" => {
                            parsed.max_order = Some(parse_number(&flag, &value)?)
                        }
                        "--submission-col" => parsed.submission_col = Some(value),
                        _ => bail!("未知的選項: {}\n\n{}", flag, USAGE),
                    }
                }
            }
        }

        parsed.sales = sales.context("缺少 --sales")?;
        parsed.current = current.context("缺少 --current")?;
        parsed.index = index.context("缺少 --index")?;
        parsed.out = out.context("缺少 --out")?;
        Ok(parsed)
    }

    /// 合併配置檔與命令列覆寫
    pub fn resolve_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("無法載入配置 '{}'", path.display()))?,
            None => RunConfig::default(),
        };

        let columns = &mut config.columns;
        override_with(&mut columns.store_id, &self.store_col);
        override_with(&mut columns.product_id, &self.product_col);
        override_with(&mut columns.sales_qty, &self.sales_qty_col);
        override_with(&mut columns.on_hand, &self.on_hand_col);
        if self.sales_date_col.is_some() {
            columns.sales_date = self.sales_date_col.clone();
        }
        override_with(&mut columns.in_transit_cols, &self.in_transit_cols);

        let policy = &mut config.policy;
        override_with(&mut policy.lead_time_weeks, &self.lead_time_weeks);
        override_with(&mut policy.review_period_weeks, &self.review_period_weeks);
        override_with(&mut policy.shortage_cost, &self.shortage_cost);
        override_with(&mut policy.holding_cost, &self.holding_cost);
        if self.min_service_level.is_some() {
            policy.min_service_level = self.min_service_level;
        }
        if let Some(max_order) = self.max_order {
            let max_order = Decimal::from_f64(max_order)
                .with_context(|| format!("最大訂購量無效: {}", max_order))?;
            policy.max_order_per_item = Some(max_order);
        }

        override_with(&mut config.submission.column_name, &self.submission_col);
        config.zero_fill_missing_weeks |= self.zero_fill;

        Ok(config)
    }
}

/// 執行摘要（輸出到 stdout）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub items: usize,
    pub ordered_items: usize,
    pub total_units: u64,
    pub lead_time_weeks: u32,
    pub review_period_weeks: u32,
    pub submission: String,
}

/// 執行 `order` 子命令：載入 → 計算 → 輸出
pub fn run_order(args: &OrderArgs) -> anyhow::Result<RunSummary> {
    let config = args.resolve_config()?;
    let loader =
        TableLoader::new(config.columns.clone()).with_zero_fill(config.zero_fill_missing_weeks);

    let history = loader
        .load_sales_history(&args.sales)
        .with_context(|| format!("無法載入銷售表 '{}'", args.sales.display()))?;
    let states = loader
        .load_current_state(&args.current)
        .with_context(|| format!("無法載入現況表 '{}'", args.current.display()))?;
    let index = loader
        .load_index(&args.index)
        .with_context(|| format!("無法載入索引表 '{}'", args.index.display()))?;

    let calculator = ReplenishmentCalculator::new(config.policy);
    let plan = if args.parallel {
        calculator.calculate_parallel(&index, &history, &states)?
    } else {
        calculator.calculate(&index, &history, &states)?
    };

    for warning in &plan.warnings {
        tracing::debug!("{}: {}", warning.key, warning.message);
    }

    OrderWriter::new(&config.columns, &config.submission.column_name)
        .write_path(&args.out, &plan.lines)
        .with_context(|| format!("無法寫入 '{}'", args.out.display()))?;

    let policy = calculator.config();
    Ok(RunSummary {
        items: plan.len(),
        ordered_items: plan.ordered_count(),
        total_units: plan.total_units(),
        lead_time_weeks: policy.lead_time_weeks,
        review_period_weeks: policy.review_period_weeks,
        submission: args.out.display().to_string(),
    })
}

fn override_with<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

fn parse_number<T>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("選項 {} 的值無效: {}", flag, value))
}
