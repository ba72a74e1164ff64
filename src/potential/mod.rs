//! # 势函数模块
//!
//! 提供经验势能量计算。
//!
//! ## 子模块
//! - `neighbor`: 周期性近邻表
//! - `emt`: EMT 势
//!
//! ## 依赖关系
//! - 被 `analysis/sweep.rs` 和 `commands/` 使用
//! - 使用 `models/structure.rs`

pub mod emt;
pub mod neighbor;

pub use emt::Emt;

use crate::error::Result;
use crate::models::{Crystal, CrystalStructure, Element};

/// 几何结构 → 势能 (eV) 的无状态映射
pub trait Potential {
    /// 势函数名称
    fn name(&self) -> &'static str;

    /// 计算结构的总势能 (eV)，不做弛豫
    fn potential_energy(&self, crystal: &Crystal) -> Result<f64>;
}

/// 生成给定晶格常数的体相结构并计算其势能
pub fn calculate_energy<P: Potential + ?Sized>(
    potential: &P,
    element: Element,
    structure: CrystalStructure,
    lattice_constant: f64,
) -> Result<f64> {
    let crystal = Crystal::bulk(element, structure, lattice_constant)?;
    potential.potential_energy(&crystal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatscanError;

    #[test]
    fn test_calculate_energy_matches_calculator() {
        let emt = Emt::new();
        let crystal = Crystal::bulk(Element::Cu, CrystalStructure::SimpleCubic, 3.0).unwrap();
        let direct = emt.calculate(&crystal).unwrap().energy;
        let via_helper =
            calculate_energy(&emt, Element::Cu, CrystalStructure::SimpleCubic, 3.0).unwrap();

        assert_eq!(direct, via_helper);
        assert_eq!(emt.name(), "EMT");
    }

    #[test]
    fn test_calculate_energy_propagates_invalid_lattice_constant() {
        let result = calculate_energy(&Emt::new(), Element::Cu, CrystalStructure::SimpleCubic, -2.0);
        assert!(matches!(
            result,
            Err(LatscanError::InvalidLatticeConstant { .. })
        ));
    }
}
