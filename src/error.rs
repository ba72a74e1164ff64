//! # 统一错误处理模块
//!
//! 定义 latscan 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// latscan 统一错误类型
#[derive(Error, Debug)]
pub enum LatscanError {
    // ─────────────────────────────────────────────────────────────
    // 结构与势函数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid lattice constant: {value} Å (must be finite and > 0)")]
    InvalidLatticeConstant { value: f64 },

    #[error("No EMT parameters for element '{0}'")]
    UnsupportedElement(String),

    // ─────────────────────────────────────────────────────────────
    // 拟合错误
    // ─────────────────────────────────────────────────────────────
    #[error("Quadratic fit needs at least {required} samples, found {found}")]
    InsufficientSamples { found: usize, required: usize },

    #[error("Degenerate quadratic fit: leading coefficient {quadratic:e} is too close to zero")]
    DegenerateFit { quadratic: f64 },

    #[error("Least-squares fit failed: {0}")]
    FitFailed(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to render plot: {0}")]
    PlotError(String),

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LatscanError>;
