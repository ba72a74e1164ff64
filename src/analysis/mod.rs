//! # 能量扫描分析模块
//!
//! 晶格常数扫描、二次拟合与绘图。
//!
//! ## 子模块
//! - `sweep`: 等间距晶格常数扫描
//! - `fit`: 二次多项式最小二乘拟合与顶点
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs` 使用
//! - 使用 `potential/` 和 `models/`

pub mod fit;
pub mod plot;
pub mod sweep;

pub use fit::QuadraticFit;
pub use sweep::Sweep;
