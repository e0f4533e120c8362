//! 補貨訂購量計算命令列

use replenish::cli::{self, OrderArgs};
use replenish::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    let args = OrderArgs::parse(std::env::args().skip(1))?;
    let summary = cli::run_order(&args)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
