//! 日誌系統初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// # 環境變數
/// - RUST_LOG: 日誌級別過濾器（預設: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=replenish_calc=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 日誌寫到 stderr，stdout 留給 JSON 摘要
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// 初始化測試環境的日誌系統
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
