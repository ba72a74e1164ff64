//! # EMT 势函数
//!
//! 有效介质理论 (Effective Medium Theory) 经验势的能量计算。
//!
//! ## 算法概述
//! 1. 以整张参数表中最大的 s0 确定全局截断半径与 Fermi 截断函数
//! 2. 对每种元素用 fcc 前三个壳层归一化 (γ1, γ2)
//! 3. 遍历近邻累加中性球电子密度 σ1 与对势修正
//! 4. 由 σ1 反推中性球半径 ds，得到每原子的内聚能
//!
//! 不做任何结构弛豫，只给出当前几何的势能。
//!
//! ## 参考
//! - K. W. Jacobsen, P. Stoltze, J. K. Nørskov, Surf. Sci. 366, 394 (1996)
//! - ase.calculators.emt
//!
//! ## 依赖关系
//! - 被 `potential/mod.rs` 与 `commands/` 使用
//! - 使用 `potential/neighbor.rs` 构建近邻表
//! - 使用 `models/structure.rs` 的 Crystal, Element

use crate::error::Result;
use crate::models::{Crystal, Element};
use crate::potential::neighbor::NeighborList;
use crate::potential::Potential;

use std::collections::HashMap;

/// Bohr 半径 (Å)
pub const BOHR: f64 = 0.5291772105638411;

/// (16π/3)^(1/3) / √2，保留历史取值
const BETA: f64 = 1.809;

/// fcc 前三个壳层的配位数
const FCC_SHELLS: [f64; 3] = [12.0, 6.0, 24.0];

/// 原始参数表中的一行（Bohr 单位）
#[derive(Debug, Clone, Copy)]
struct RawParameters {
    /// 内聚能 (eV)
    e0: f64,
    /// 中性球半径 (bohr)
    s0: f64,
    /// 对势强度 (eV)
    v0: f64,
    /// 密度衰减 (1/bohr)
    eta2: f64,
    /// 对势衰减 (1/bohr)
    kappa: f64,
    /// 内聚函数衰减 (1/bohr)
    lambda: f64,
    /// 参考电子密度 (1/bohr³)
    n0: f64,
}

fn raw_parameters(element: Element) -> RawParameters {
    let (e0, s0, v0, eta2, kappa, lambda, n0) = match element {
        Element::Al => (-3.28, 3.00, 1.493, 1.240, 2.000, 1.169, 0.00700),
        Element::Cu => (-3.51, 2.67, 2.476, 1.652, 2.740, 1.906, 0.00910),
        Element::Ag => (-2.96, 3.01, 2.132, 1.652, 2.790, 1.892, 0.00547),
        Element::Au => (-3.80, 3.00, 2.321, 1.674, 2.873, 2.182, 0.00703),
        Element::Ni => (-4.44, 2.60, 3.673, 1.669, 2.757, 1.948, 0.01030),
        Element::Pd => (-3.90, 2.87, 2.773, 1.818, 3.107, 2.155, 0.00688),
        Element::Pt => (-5.85, 2.90, 4.067, 1.812, 3.145, 2.192, 0.00802),
        Element::H => (-3.21, 1.31, 0.132, 2.652, 2.790, 3.892, 0.00547),
        Element::C => (-3.50, 1.81, 0.332, 1.652, 2.790, 1.892, 0.01322),
        Element::N => (-5.10, 1.88, 0.132, 1.652, 2.790, 1.892, 0.01222),
        Element::O => (-4.60, 1.95, 0.332, 1.652, 2.790, 1.892, 0.00850),
    };
    RawParameters {
        e0,
        s0,
        v0,
        eta2,
        kappa,
        lambda,
        n0,
    }
}

/// 换算到 Å 单位并带归一化因子的参数
#[derive(Debug, Clone, Copy)]
struct Parameters {
    e0: f64,
    s0: f64,
    v0: f64,
    eta2: f64,
    kappa: f64,
    lambda: f64,
    n0: f64,
    gamma1: f64,
    gamma2: f64,
}

/// EMT 计算结果
#[derive(Debug, Clone)]
pub struct EmtResult {
    /// 总势能 (eV)
    pub energy: f64,
    /// 每原子势能 (eV)
    pub energies: Vec<f64>,
}

/// EMT 计算器
#[derive(Debug, Clone)]
pub struct Emt {
    /// Fermi 截断中心 (Å)
    rc: f64,
    /// 近邻表半径 (Å)
    rc_list: f64,
    /// Fermi 截断陡度 (1/Å)
    acut: f64,
}

impl Default for Emt {
    fn default() -> Self {
        Self::new()
    }
}

impl Emt {
    /// 创建新的 EMT 计算器
    pub fn new() -> Self {
        let max_s0 = Element::ALL
            .iter()
            .map(|&el| raw_parameters(el).s0)
            .fold(f64::NEG_INFINITY, f64::max)
            * BOHR;

        // 截断位于 fcc 第三与第四壳层之间
        let rc = BETA * max_s0 * 0.5 * (3.0_f64.sqrt() + 2.0);
        let rr = rc * 2.0 * 2.0 / (3.0_f64.sqrt() + 2.0);
        let acut = 9999.0_f64.ln() / (rr - rc);

        Emt {
            rc,
            rc_list: rc + 0.5,
            acut,
        }
    }

    /// 近邻表半径 (Å)
    pub fn cutoff(&self) -> f64 {
        self.rc_list
    }

    /// Fermi 截断函数 θ(r)
    fn theta(&self, r: f64) -> f64 {
        1.0 / (1.0 + (self.acut * (r - self.rc)).exp())
    }

    fn parameters(&self, element: Element) -> Parameters {
        let raw = raw_parameters(element);
        let s0 = raw.s0 * BOHR;
        let eta2 = raw.eta2 / BOHR;
        let kappa = raw.kappa / BOHR;

        let mut gamma1 = 0.0;
        let mut gamma2 = 0.0;
        for (i, n) in FCC_SHELLS.iter().enumerate() {
            let r = s0 * BETA * ((i + 1) as f64).sqrt();
            let weight = n / 12.0 * self.theta(r);
            gamma1 += weight * (-eta2 * (r - BETA * s0)).exp();
            gamma2 += weight * (-kappa / BETA * (r - BETA * s0)).exp();
        }

        Parameters {
            e0: raw.e0,
            s0,
            v0: raw.v0,
            eta2,
            kappa,
            lambda: raw.lambda / BOHR,
            n0: raw.n0 / BOHR.powi(3),
            gamma1,
            gamma2,
        }
    }

    /// 计算晶体的总势能与每原子势能
    pub fn calculate(&self, crystal: &Crystal) -> Result<EmtResult> {
        let elements = crystal
            .atoms
            .iter()
            .map(|atom| atom.element.parse::<Element>())
            .collect::<Result<Vec<_>>>()?;

        let mut table: HashMap<Element, Parameters> = HashMap::new();
        for &el in &elements {
            table.entry(el).or_insert_with(|| self.parameters(el));
        }
        let params: Vec<Parameters> = elements.iter().map(|el| table[el]).collect();

        let list = NeighborList::build(crystal, self.cutoff());

        let natoms = list.len();
        let mut energies = vec![0.0; natoms];
        let mut sigma1 = vec![0.0; natoms];

        for a1 in 0..natoms {
            let p1 = &params[a1];
            for neighbor in list.neighbors(a1) {
                let p2 = &params[neighbor.index];
                let r = neighbor.distance;
                let ksi = p2.n0 / p1.n0;
                let theta = self.theta(r);

                let y1 = 0.5 * p1.v0 * (-p2.kappa * (r / BETA - p2.s0)).exp() * ksi / p1.gamma2
                    * theta;
                let y2 = 0.5 * p2.v0 * (-p1.kappa * (r / BETA - p1.s0)).exp() / ksi / p2.gamma2
                    * theta;

                // 完整近邻表中每对出现两次，各分一半
                energies[a1] -= 0.5 * (y1 + y2);
                sigma1[a1] += (-p2.eta2 * (r - BETA * p2.s0)).exp() * ksi * theta / p1.gamma1;
            }
        }

        for (a, p) in params.iter().enumerate() {
            if sigma1[a] <= 0.0 {
                // 孤立原子
                energies[a] -= p.e0;
                continue;
            }
            let ds = -(sigma1[a] / 12.0).ln() / (BETA * p.eta2);
            let x = p.lambda * ds;
            let y = (-x).exp();
            let z = 6.0 * p.v0 * (-p.kappa * ds).exp();
            energies[a] += p.e0 * ((1.0 + x) * y - 1.0) + z;
        }

        Ok(EmtResult {
            energy: energies.iter().sum(),
            energies,
        })
    }
}

impl Potential for Emt {
    fn name(&self) -> &'static str {
        "EMT"
    }

    fn potential_energy(&self, crystal: &Crystal) -> Result<f64> {
        Ok(self.calculate(crystal)?.energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatscanError;
    use crate::models::structure::{Atom, Lattice};
    use crate::models::CrystalStructure;

    fn sc_energy(a: f64) -> f64 {
        let crystal = Crystal::bulk(Element::Cu, CrystalStructure::SimpleCubic, a).unwrap();
        Emt::new().calculate(&crystal).unwrap().energy
    }

    fn fcc_cu(a: f64) -> Crystal {
        Crystal::new(
            Lattice::from_vectors([
                [0.0, 0.5 * a, 0.5 * a],
                [0.5 * a, 0.0, 0.5 * a],
                [0.5 * a, 0.5 * a, 0.0],
            ]),
            vec![Atom::new("Cu", [0.0, 0.0, 0.0])],
        )
    }

    #[test]
    fn test_cutoff_constants() {
        let emt = Emt::new();
        // 最大 s0 来自 Ag (3.01 bohr)
        assert!((emt.rc - 5.3768).abs() < 1e-3);
        assert!((emt.cutoff() - 5.8768).abs() < 1e-3);
        assert!((emt.acut - 23.858).abs() < 1e-2);
    }

    #[test]
    fn test_fcc_copper_reference() {
        // EMT 以 fcc 平衡态为能量零点，Cu 的平衡晶格常数约 3.59 Å
        let emt = Emt::new();
        let e_eq = emt.calculate(&fcc_cu(3.59)).unwrap().energy;
        assert!(e_eq.abs() < 0.02, "fcc Cu energy {e_eq}");

        let e_compressed = emt.calculate(&fcc_cu(3.4)).unwrap().energy;
        let e_expanded = emt.calculate(&fcc_cu(3.8)).unwrap().energy;
        assert!(e_compressed > e_eq);
        assert!(e_expanded > e_eq);
    }

    #[test]
    fn test_simple_cubic_energy_curve() {
        // 1 Å 处强烈压缩
        assert!((sc_energy(1.0) - 63.897).abs() < 0.05);

        // 扫描范围内的最低样本接近 2.42 Å
        let e_low = sc_energy(2.421);
        assert!((e_low - 0.446).abs() < 0.01);
        assert!(sc_energy(2.263) > e_low);
        assert!(sc_energy(2.579) > e_low);
    }

    #[test]
    fn test_energy_is_deterministic() {
        let first = sc_energy(2.7);
        for _ in 0..5 {
            assert_eq!(sc_energy(2.7).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_per_atom_energies_sum_to_total() {
        // 同一 sc 晶格的 2x1x1 超胞，每原子能量应与原胞一致
        let a = 2.5;
        let supercell = Crystal::new(
            Lattice::from_vectors([[2.0 * a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]),
            vec![
                Atom::new("Cu", [0.0, 0.0, 0.0]),
                Atom::new("Cu", [0.5, 0.0, 0.0]),
            ],
        );
        let result = Emt::new().calculate(&supercell).unwrap();

        assert_eq!(result.energies.len(), 2);
        let total: f64 = result.energies.iter().sum();
        assert!((total - result.energy).abs() < 1e-12);
        assert!((result.energies[0] - sc_energy(a)).abs() < 1e-9);
        assert!((result.energies[1] - sc_energy(a)).abs() < 1e-9);
    }

    #[test]
    fn test_isolated_atom() {
        // 晶胞远大于截断半径时没有近邻
        let crystal = Crystal::bulk(Element::Cu, CrystalStructure::SimpleCubic, 20.0).unwrap();
        let energy = Emt::new().calculate(&crystal).unwrap().energy;
        assert!((energy - 3.51).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_element() {
        let crystal = Crystal::new(Lattice::cubic(2.8), vec![Atom::new("Fe", [0.0, 0.0, 0.0])]);
        let result = Emt::new().calculate(&crystal);
        assert!(matches!(result, Err(LatscanError::UnsupportedElement(_))));
    }
}
