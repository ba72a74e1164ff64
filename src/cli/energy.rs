//! # energy 子命令 CLI 定义
//!
//! 在给定晶格常数上做单点势能计算（不弛豫）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/energy.rs`

use crate::cli::{parse_element, StructureArg};
use crate::models::Element;

use clap::Args;

/// energy 子命令参数
#[derive(Args, Debug, Clone, PartialEq)]
pub struct EnergyArgs {
    /// Lattice constants in Å
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub lattice_constants: Vec<f64>,

    /// Element (one of the elements with EMT parameters)
    #[arg(short, long, default_value = "Cu", value_parser = parse_element)]
    pub element: Element,

    /// Crystal structure
    #[arg(short, long, value_enum, default_value_t = StructureArg::Sc)]
    pub structure: StructureArg,

    /// Also report per-atom energy and volume
    #[arg(long, default_value_t = false)]
    pub per_atom: bool,

    /// Print CSV to stdout instead of a table
    #[arg(long, default_value_t = false)]
    pub csv: bool,
}
