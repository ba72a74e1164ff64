//! # 工具函数模块
//!
//! 提供美化输出、进度条、图像查看等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, viewer

pub mod output;
pub mod progress;
pub mod viewer;
