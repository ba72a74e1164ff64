//! # 周期性近邻表
//!
//! 在三维周期性边界下枚举截断半径内的全部近邻（含周期像）。
//!
//! ## 算法概述
//! 1. 用晶面间距确定每个方向需要平移的晶胞数
//! 2. 遍历所有原子对与平移向量
//! 3. 保留距离小于截断半径的近邻，排除原子自身的零平移像
//!
//! 返回的是完整近邻表：每个有序原子对 (i, j) 都会出现。
//!
//! ## 依赖关系
//! - 被 `potential/emt.rs` 使用
//! - 使用 `models/structure.rs` 的 Crystal

use crate::models::Crystal;

/// 近邻
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// 近邻原子索引
    pub index: usize,
    /// 距离 (Å)
    pub distance: f64,
}

/// 完整近邻表
#[derive(Debug, Clone)]
pub struct NeighborList {
    neighbors: Vec<Vec<Neighbor>>,
}

impl NeighborList {
    /// 构建截断半径 `cutoff` (Å) 内的近邻表
    pub fn build(crystal: &Crystal, cutoff: f64) -> Self {
        let positions = crystal.cartesian_positions();
        let matrix = crystal.lattice.matrix;

        // 分数坐标已折回 [0, 1)，因此多平移一个晶胞即可覆盖
        let images = crystal
            .lattice
            .perpendicular_heights()
            .map(|h| (cutoff / h).ceil() as i64 + 1);

        let mut neighbors = vec![Vec::new(); positions.len()];

        for n0 in -images[0]..=images[0] {
            for n1 in -images[1]..=images[1] {
                for n2 in -images[2]..=images[2] {
                    let zero_offset = n0 == 0 && n1 == 0 && n2 == 0;
                    let (f0, f1, f2) = (n0 as f64, n1 as f64, n2 as f64);
                    let offset = [
                        f0 * matrix[0][0] + f1 * matrix[1][0] + f2 * matrix[2][0],
                        f0 * matrix[0][1] + f1 * matrix[1][1] + f2 * matrix[2][1],
                        f0 * matrix[0][2] + f1 * matrix[1][2] + f2 * matrix[2][2],
                    ];

                    for (i, ri) in positions.iter().enumerate() {
                        for (j, rj) in positions.iter().enumerate() {
                            if zero_offset && i == j {
                                continue;
                            }

                            let d = [
                                rj[0] + offset[0] - ri[0],
                                rj[1] + offset[1] - ri[1],
                                rj[2] + offset[2] - ri[2],
                            ];
                            let r = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();

                            if r < cutoff {
                                neighbors[i].push(Neighbor {
                                    index: j,
                                    distance: r,
                                });
                            }
                        }
                    }
                }
            }
        }

        NeighborList { neighbors }
    }

    /// 第 `atom` 个原子的近邻
    pub fn neighbors(&self, atom: usize) -> &[Neighbor] {
        &self.neighbors[atom]
    }

    /// 原子数
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::structure::{Atom, Lattice};
    use crate::models::{CrystalStructure, Element};

    fn sc(a: f64) -> Crystal {
        Crystal::bulk(Element::Cu, CrystalStructure::SimpleCubic, a).unwrap()
    }

    fn count_within(list: &NeighborList, atom: usize, r: f64) -> usize {
        list.neighbors(atom)
            .iter()
            .filter(|n| n.distance < r + 1e-9)
            .count()
    }

    #[test]
    fn test_simple_cubic_shells() {
        let a = 2.0;
        // 截断取在第三壳层 (√3 a) 与第四壳层 (2a) 之间
        let list = NeighborList::build(&sc(a), 1.9 * a);

        assert_eq!(list.len(), 1);
        assert_eq!(count_within(&list, 0, a), 6);
        assert_eq!(count_within(&list, 0, 2.0_f64.sqrt() * a), 18);
        assert_eq!(count_within(&list, 0, 3.0_f64.sqrt() * a), 26);
        assert_eq!(list.neighbors(0).len(), 26);
    }

    #[test]
    fn test_excludes_self_and_respects_cutoff() {
        let list = NeighborList::build(&sc(1.0), 5.0);

        assert!(list.neighbors(0).iter().all(|n| n.distance > 0.0));
        assert!(list.neighbors(0).iter().all(|n| n.distance < 5.0));
        // 1 Å 晶胞、5 Å 截断: 半径 5 的球内整数格点数减去原点
        assert_eq!(list.neighbors(0).len(), 484);
    }

    #[test]
    fn test_full_list_is_symmetric() {
        // 双原子晶胞 (CsCl 型排列)
        let crystal = Crystal::new(
            Lattice::cubic(3.0),
            vec![
                Atom::new("Cu", [0.0, 0.0, 0.0]),
                Atom::new("Cu", [0.5, 0.5, 0.5]),
            ],
        );
        let list = NeighborList::build(&crystal, 4.0);

        let from_0 = list.neighbors(0).iter().filter(|n| n.index == 1).count();
        let from_1 = list.neighbors(1).iter().filter(|n| n.index == 0).count();
        assert_eq!(from_0, from_1);
        // 体心到 8 个顶角
        let nearest = 0.5 * 3.0_f64.sqrt() * 3.0;
        assert_eq!(count_within(&list, 0, nearest), 8);
    }
}
