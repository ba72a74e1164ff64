//! # scan 子命令 CLI 定义
//!
//! 晶格常数扫描、二次拟合与绘图的参数。默认值即为铜简单立方
//! 在 1.0-4.0 Å 上 20 个点的扫描。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use crate::analysis::plot::DEFAULT_LABEL_POSITION;
use crate::analysis::sweep::{DEFAULT_END, DEFAULT_POINTS, DEFAULT_START};
use crate::cli::{parse_element, StructureArg};
use crate::models::Element;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG image
    #[default]
    Png,
    /// SVG vector image
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// scan 子命令参数
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ScanArgs {
    /// Element (one of the elements with EMT parameters)
    #[arg(short, long, default_value = "Cu", value_parser = parse_element)]
    pub element: Element,

    /// Crystal structure
    #[arg(short, long, value_enum, default_value_t = StructureArg::Sc)]
    pub structure: StructureArg,

    /// Lattice constant range in Å (e.g., "1-4")
    #[arg(short, long, default_value = "1-4")]
    pub range: String,

    /// Number of evenly spaced sample points (both ends included)
    #[arg(short = 'n', long, default_value_t = DEFAULT_POINTS)]
    pub points: usize,

    /// Directory the plot is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image format
    #[arg(short, long, value_enum, default_value_t = ImageFormat::Png)]
    pub format: ImageFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// x data coordinate of the (l0, W0) annotation
    #[arg(long, default_value_t = DEFAULT_LABEL_POSITION.0, allow_negative_numbers = true)]
    pub label_x: f64,

    /// y data coordinate of the (l0, W0) annotation
    #[arg(long, default_value_t = DEFAULT_LABEL_POSITION.1, allow_negative_numbers = true)]
    pub label_y: f64,

    /// Do not open the plot in an image viewer
    #[arg(long, default_value_t = false)]
    pub no_show: bool,

    /// Do not print the sample table
    #[arg(long, default_value_t = false)]
    pub no_table: bool,
}

impl Default for ScanArgs {
    fn default() -> Self {
        ScanArgs {
            element: Element::Cu,
            structure: StructureArg::Sc,
            range: format!("{}-{}", DEFAULT_START, DEFAULT_END),
            points: DEFAULT_POINTS,
            output_dir: PathBuf::from("."),
            format: ImageFormat::Png,
            width: 600,
            height: 600,
            label_x: DEFAULT_LABEL_POSITION.0,
            label_y: DEFAULT_LABEL_POSITION.1,
            no_show: false,
            no_table: false,
        }
    }
}
