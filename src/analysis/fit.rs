//! # 二次多项式拟合与极小值
//!
//! 对 (晶格常数, 能量) 样本做最小二乘拟合 E = a·l² + b·l + c，
//! 并由抛物线顶点给出平衡晶格常数。
//!
//! ## 算法概述
//! 1. 构造 Vandermonde 矩阵 [l², l, 1]
//! 2. 按列范数缩放以改善条件数
//! 3. SVD 求解最小二乘问题，再还原缩放
//! 4. 顶点 l_min = -b / (2a)
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs` 调用
//! - 使用 `models/sample.rs` 的 SampleSet
//! - 使用 `nalgebra` 做 SVD

use crate::error::{LatscanError, Result};
use crate::models::SampleSet;

use nalgebra::{DMatrix, DVector};

/// 二次项系数相对 max(|b|, 1) 低于此值时视为退化
pub const DEGENERATE_TOLERANCE: f64 = 1e-12;

/// 多项式次数
const DEGREE: usize = 2;

/// 拟合得到的抛物线顶点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumPoint {
    /// l_min (Å)
    pub lattice_constant: f64,
    /// W_0 (eV)
    pub energy: f64,
}

/// E = a·l² + b·l + c
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFit {
    /// 二次项
    pub a: f64,
    /// 一次项
    pub b: f64,
    /// 常数项
    pub c: f64,
}

impl QuadraticFit {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        QuadraticFit { a, b, c }
    }

    /// 对样本集合做最小二乘拟合
    pub fn fit(samples: &SampleSet) -> Result<Self> {
        Self::fit_points(&samples.lattice_constants(), &samples.energies())
    }

    /// 对任意 (x, y) 点做最小二乘拟合
    pub fn fit_points(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(LatscanError::InvalidArgument(format!(
                "x and y must have the same length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        let n = x.len();
        if n < DEGREE + 1 {
            return Err(LatscanError::InsufficientSamples {
                found: n,
                required: DEGREE + 1,
            });
        }

        // 列缩放系数
        let mut scales = [0.0; DEGREE + 1];
        for (j, scale) in scales.iter_mut().enumerate() {
            let power = (DEGREE - j) as i32;
            *scale = x.iter().map(|xi| xi.powi(power).powi(2)).sum::<f64>().sqrt();
            if !scale.is_finite() || *scale == 0.0 {
                return Err(LatscanError::FitFailed(format!(
                    "column x^{} of the design matrix is degenerate",
                    power
                )));
            }
        }

        let lhs = DMatrix::from_fn(n, DEGREE + 1, |i, j| {
            x[i].powi((DEGREE - j) as i32) / scales[j]
        });
        let rhs = DVector::from_column_slice(y);

        let svd = lhs.svd(true, true);
        let eps = n as f64 * f64::EPSILON * svd.singular_values.max();
        if svd.rank(eps) < DEGREE + 1 {
            return Err(LatscanError::FitFailed(
                "design matrix is rank deficient (need at least 3 distinct lattice constants)"
                    .to_string(),
            ));
        }

        let solution = svd
            .solve(&rhs, eps)
            .map_err(|e| LatscanError::FitFailed(e.to_string()))?;

        Ok(QuadraticFit::new(
            solution[0] / scales[0],
            solution[1] / scales[1],
            solution[2] / scales[2],
        ))
    }

    /// 多项式取值
    pub fn evaluate(&self, l: f64) -> f64 {
        (self.a * l + self.b) * l + self.c
    }

    /// 每个样本处的拟合能量
    pub fn fitted(&self, samples: &SampleSet) -> Vec<f64> {
        samples
            .iter()
            .map(|s| self.evaluate(s.lattice_constant))
            .collect()
    }

    /// 决定系数 R²
    pub fn r_squared(&self, samples: &SampleSet) -> f64 {
        if samples.is_empty() {
            return f64::NAN;
        }
        let mean = samples.iter().map(|s| s.energy).sum::<f64>() / samples.len() as f64;
        let ss_tot: f64 = samples.iter().map(|s| (s.energy - mean).powi(2)).sum();
        let ss_res: f64 = samples
            .iter()
            .map(|s| (s.energy - self.evaluate(s.lattice_constant)).powi(2))
            .sum();

        if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                f64::NAN
            }
        } else {
            1.0 - ss_res / ss_tot
        }
    }

    /// 顶点是否为极小值
    pub fn is_convex(&self) -> bool {
        self.a > 0.0
    }

    /// 抛物线顶点 (l_min, W_0)
    ///
    /// 二次项接近零时拟合退化为直线，没有有限的顶点，返回 `DegenerateFit`。
    pub fn minimum(&self) -> Result<MinimumPoint> {
        if !self.a.is_finite() || self.a.abs() < DEGENERATE_TOLERANCE * self.b.abs().max(1.0) {
            return Err(LatscanError::DegenerateFit { quadratic: self.a });
        }

        let lattice_constant = -self.b / (2.0 * self.a);
        Ok(MinimumPoint {
            lattice_constant,
            energy: self.evaluate(lattice_constant),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sweep::{linspace, Sweep};
    use crate::models::{CrystalStructure, Element, EnergySample};
    use crate::potential::Emt;

    fn samples_from(x: &[f64], f: impl Fn(f64) -> f64) -> SampleSet {
        SampleSet::new(
            Element::Cu,
            CrystalStructure::SimpleCubic,
            x.iter().map(|&l| EnergySample::new(l, f(l))).collect(),
        )
    }

    #[test]
    fn test_toy_minimum() {
        let fit = QuadraticFit::new(1.0, -2.0, 5.0);
        let min = fit.minimum().unwrap();

        assert!((min.lattice_constant - 1.0).abs() < 1e-12);
        assert!((min.energy - 4.0).abs() < 1e-12);
        assert!(fit.is_convex());
    }

    #[test]
    fn test_recovers_exact_parabola() {
        let x = linspace(1.0, 4.0, 20);
        let samples = samples_from(&x, |l| 1.0 * l * l - 2.0 * l + 5.0);
        let fit = QuadraticFit::fit(&samples).unwrap();

        assert!((fit.a - 1.0).abs() < 1e-9);
        assert!((fit.b + 2.0).abs() < 1e-9);
        assert!((fit.c - 5.0).abs() < 1e-9);
        assert!((fit.r_squared(&samples) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fitted_matches_polynomial() {
        let samples = Sweep::default().run(&Emt::new(), |_| {}).unwrap();
        let fit = QuadraticFit::fit(&samples).unwrap();
        let fitted = fit.fitted(&samples);

        assert_eq!(fitted.len(), samples.len());
        for (s, e) in samples.iter().zip(&fitted) {
            let l = s.lattice_constant;
            let expected = fit.a * l * l + fit.b * l + fit.c;
            assert!((e - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn test_copper_simple_cubic_minimum() {
        let samples = Sweep::default().run(&Emt::new(), |_| {}).unwrap();
        let fit = QuadraticFit::fit(&samples).unwrap();
        let min = fit.minimum().unwrap();

        assert!(fit.is_convex());
        assert!(
            min.lattice_constant > 2.5 && min.lattice_constant < 3.5,
            "l_min = {}",
            min.lattice_constant
        );
        assert!((min.lattice_constant - 2.951).abs() < 0.01);
        assert!((min.energy + 4.831).abs() < 0.05);
        assert!((fit.a - 14.93).abs() < 0.05);
    }

    #[test]
    fn test_least_squares_residuals_are_orthogonal() {
        // 最小二乘解的残差与每一列正交
        let x = linspace(0.5, 3.0, 11);
        let samples = samples_from(&x, |l| (2.0 * l).sin() + 0.3 * l);
        let fit = QuadraticFit::fit(&samples).unwrap();

        for power in 0..3 {
            let dot: f64 = samples
                .iter()
                .map(|s| {
                    (s.energy - fit.evaluate(s.lattice_constant)) * s.lattice_constant.powi(power)
                })
                .sum();
            assert!(dot.abs() < 1e-9, "power {power}: {dot}");
        }
    }

    #[test]
    fn test_linear_data_is_degenerate() {
        let x = linspace(1.0, 4.0, 20);
        let samples = samples_from(&x, |l| 2.0 * l + 1.0);
        let fit = QuadraticFit::fit(&samples).unwrap();

        assert!(matches!(
            fit.minimum(),
            Err(LatscanError::DegenerateFit { .. })
        ));
        assert!(matches!(
            QuadraticFit::new(0.0, 1.0, 0.0).minimum(),
            Err(LatscanError::DegenerateFit { .. })
        ));
    }

    #[test]
    fn test_concave_fit_reports_maximum() {
        let fit = QuadraticFit::new(-1.0, 4.0, 0.0);
        let vertex = fit.minimum().unwrap();

        assert!(!fit.is_convex());
        assert!((vertex.lattice_constant - 2.0).abs() < 1e-12);
        assert!((vertex.energy - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_and_repeated_points() {
        assert!(matches!(
            QuadraticFit::fit_points(&[1.0, 2.0], &[0.0, 1.0]),
            Err(LatscanError::InsufficientSamples {
                found: 2,
                required: 3
            })
        ));
        assert!(matches!(
            QuadraticFit::fit_points(
                &[2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0],
                &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
            ),
            Err(LatscanError::FitFailed(_))
        ));
        assert!(matches!(
            QuadraticFit::fit_points(&[1.0, 2.0, 3.0], &[0.0, 1.0]),
            Err(LatscanError::InvalidArgument(_))
        ));
    }
}
