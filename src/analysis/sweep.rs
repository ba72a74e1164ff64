//! # 晶格常数扫描
//!
//! 在线性等间距的晶格常数上逐点计算势能，得到有序样本集合。
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs` 调用
//! - 使用 `potential/` 计算能量
//! - 生成 `models/sample.rs` 的 SampleSet

use crate::error::{LatscanError, Result};
use crate::models::{CrystalStructure, Element, EnergySample, SampleSet};
use crate::potential::{self, Potential};

/// 默认扫描起点 (Å)
pub const DEFAULT_START: f64 = 1.0;
/// 默认扫描终点 (Å)
pub const DEFAULT_END: f64 = 4.0;
/// 默认采样点数
pub const DEFAULT_POINTS: usize = 20;

/// 二次拟合所需的最少点数
pub const MIN_POINTS: usize = 3;

/// 闭区间 [start, end] 上的 n 个等间距点，最后一个点严格等于 end
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// 扫描设置
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// 起点 (Å)
    pub start: f64,
    /// 终点 (Å)
    pub end: f64,
    /// 采样点数
    pub points: usize,
    /// 元素
    pub element: Element,
    /// 晶体结构
    pub structure: CrystalStructure,
}

impl Default for Sweep {
    fn default() -> Self {
        Sweep {
            start: DEFAULT_START,
            end: DEFAULT_END,
            points: DEFAULT_POINTS,
            element: Element::Cu,
            structure: CrystalStructure::SimpleCubic,
        }
    }
}

impl Sweep {
    pub fn new(start: f64, end: f64, points: usize) -> Self {
        Sweep {
            start,
            end,
            points,
            ..Default::default()
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_structure(mut self, structure: CrystalStructure) -> Self {
        self.structure = structure;
        self
    }

    /// 检查扫描区间与点数
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(LatscanError::InvalidRange(format!(
                "{}-{} (bounds must be finite)",
                self.start, self.end
            )));
        }
        if self.start <= 0.0 || self.end <= self.start {
            return Err(LatscanError::InvalidRange(format!(
                "{}-{} (must be 0 < start < end)",
                self.start, self.end
            )));
        }
        if self.points < MIN_POINTS {
            return Err(LatscanError::InvalidArgument(format!(
                "at least {} sample points are required, got {}",
                MIN_POINTS, self.points
            )));
        }
        Ok(())
    }

    /// 扫描的晶格常数
    pub fn lattice_constants(&self) -> Vec<f64> {
        linspace(self.start, self.end, self.points)
    }

    /// 执行扫描，每得到一个样本调用一次 `inspect`
    pub fn run<P, F>(&self, potential: &P, mut inspect: F) -> Result<SampleSet>
    where
        P: Potential + ?Sized,
        F: FnMut(&EnergySample),
    {
        self.validate()?;

        let mut samples = Vec::with_capacity(self.points);
        for lattice_constant in self.lattice_constants() {
            let energy =
                potential::calculate_energy(potential, self.element, self.structure, lattice_constant)?;
            let sample = EnergySample::new(lattice_constant, energy);
            inspect(&sample);
            samples.push(sample);
        }

        Ok(SampleSet::new(self.element, self.structure, samples))
    }
}
