//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `scan`: 晶格常数扫描 + 二次拟合 + 绘图（无子命令时的默认行为）
//! - `energy`: 单点能量计算
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: scan, energy

pub mod energy;
pub mod scan;

use crate::models::{CrystalStructure, Element};

use clap::{Parser, Subcommand, ValueEnum};

/// latscan - 晶格常数能量扫描
#[derive(Parser, Debug)]
#[command(name = "latscan")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Lattice constant energy scans with the EMT potential", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep lattice constants, fit a quadratic and plot the energy curve (default)
    Scan(scan::ScanArgs),

    /// Evaluate the potential energy at one or more lattice constants
    Energy(energy::EnergyArgs),
}

impl Commands {
    /// 未给出子命令时执行默认扫描
    pub fn or_default(command: Option<Commands>) -> Commands {
        command.unwrap_or_else(|| Commands::Scan(scan::ScanArgs::default()))
    }
}

// ─────────────────────────────────────────────────────────────
// 共享参数
// ─────────────────────────────────────────────────────────────

/// 晶体结构类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum StructureArg {
    /// Simple cubic
    #[default]
    Sc,
}

impl From<StructureArg> for CrystalStructure {
    fn from(arg: StructureArg) -> Self {
        match arg {
            StructureArg::Sc => CrystalStructure::SimpleCubic,
        }
    }
}

impl std::fmt::Display for StructureArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", CrystalStructure::from(*self))
    }
}

/// 解析元素符号
pub fn parse_element(input: &str) -> Result<Element, String> {
    input.parse::<Element>().map_err(|_| {
        let known = Element::ALL
            .iter()
            .map(|el| el.symbol())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Unknown element '{}'. Elements with EMT parameters: {}", input, known)
    })
}
