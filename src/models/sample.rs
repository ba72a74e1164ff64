//! # 能量扫描样本数据模型
//!
//! 存储 (晶格常数, 能量) 样本对及其所属的扫描。
//!
//! ## 依赖关系
//! - 被 `analysis/sweep.rs` 生成
//! - 被 `analysis/fit.rs`, `analysis/plot.rs` 和 `commands/` 使用

use crate::models::{CrystalStructure, Element};

use serde::{Deserialize, Serialize};

/// 单个能量样本
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    /// 晶格常数 (Å)
    #[serde(rename = "lattice_constant_A")]
    pub lattice_constant: f64,

    /// 势能 (eV)
    #[serde(rename = "energy_eV")]
    pub energy: f64,
}

impl EnergySample {
    pub fn new(lattice_constant: f64, energy: f64) -> Self {
        EnergySample {
            lattice_constant,
            energy,
        }
    }
}

/// 有序样本集合（晶格常数按扫描顺序排列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    /// 元素
    pub element: Element,

    /// 晶体结构
    pub structure: CrystalStructure,

    /// 样本列表
    pub samples: Vec<EnergySample>,
}

impl SampleSet {
    pub fn new(element: Element, structure: CrystalStructure, samples: Vec<EnergySample>) -> Self {
        SampleSet {
            element,
            structure,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnergySample> {
        self.samples.iter()
    }

    pub fn lattice_constants(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.lattice_constant).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy).collect()
    }

    /// 能量最低的原始样本
    pub fn lowest(&self) -> Option<&EnergySample> {
        self.samples.iter().min_by(|a, b| {
            a.energy
                .partial_cmp(&b.energy)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
