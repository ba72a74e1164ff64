//! # latscan - 晶格常数能量扫描
//!
//! 用 EMT 经验势计算简单立方晶体在一系列晶格常数下的势能，
//! 二次拟合能量曲线，给出极小值并绘图。
//!
//! ## 子命令
//! - `scan`   - 扫描 + 拟合 + 绘图（默认）
//! - `energy` - 单点能量计算
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── analysis/  (扫描、拟合、绘图)
//!   │     ├── potential/ (EMT 势与近邻表)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod cli;
mod commands;
mod error;
mod models;
mod potential;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(Commands::or_default(cli.command)) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
