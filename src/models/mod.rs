//! # 数据模型模块
//!
//! 定义晶体结构与能量扫描样本的数据模型。
//!
//! ## 依赖关系
//! - 被 `potential/`, `analysis/` 和 `commands/` 使用
//! - 子模块: structure, sample

pub mod sample;
pub mod structure;

pub use sample::{EnergySample, SampleSet};
pub use structure::{Crystal, CrystalStructure, Element};
