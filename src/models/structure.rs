//! # 晶体结构数据模型
//!
//! 定义晶格、原子与晶体结构，并提供按结构标签和晶格常数生成体相结构的构造器。
//!
//! ## 依赖关系
//! - 被 `potential/` 和 `analysis/` 使用
//! - 无外部模块依赖

use crate::error::{LatscanError, Result};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 结构标签与元素
// ─────────────────────────────────────────────────────────────

/// 晶体结构类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalStructure {
    /// 简单立方 (sc)
    SimpleCubic,
}

impl CrystalStructure {
    /// 结构标签，用于输出文件名
    pub fn tag(&self) -> &'static str {
        match self {
            CrystalStructure::SimpleCubic => "sc",
        }
    }
}

impl std::fmt::Display for CrystalStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// 具有 EMT 参数的元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Al,
    Cu,
    Ag,
    Au,
    Ni,
    Pd,
    Pt,
    H,
    C,
    N,
    O,
}

impl Element {
    /// 全部元素（EMT 截断半径由整张参数表决定）
    pub const ALL: [Element; 11] = [
        Element::Al,
        Element::Cu,
        Element::Ag,
        Element::Au,
        Element::Ni,
        Element::Pd,
        Element::Pt,
        Element::H,
        Element::C,
        Element::N,
        Element::O,
    ];

    /// 元素符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::Al => "Al",
            Element::Cu => "Cu",
            Element::Ag => "Ag",
            Element::Au => "Au",
            Element::Ni => "Ni",
            Element::Pd => "Pd",
            Element::Pt => "Pt",
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = LatscanError;

    /// 大小写不敏感地解析元素符号
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Element::ALL
            .iter()
            .copied()
            .find(|el| el.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LatscanError::UnsupportedElement(wanted.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────
// 晶格
// ─────────────────────────────────────────────────────────────

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 边长为 a 的立方晶胞
    pub fn cubic(a: f64) -> Self {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(&a, &cross(&b, &c))
    }

    /// 三个方向上相对晶面之间的垂直距离
    ///
    /// 周期性近邻搜索需要知道每个方向最多要平移多少个晶胞。
    pub fn perpendicular_heights(&self) -> [f64; 3] {
        let [a, b, c] = self.matrix;
        let volume = self.volume().abs();
        [
            volume / norm(&cross(&b, &c)),
            volume / norm(&cross(&c, &a)),
            volume / norm(&cross(&a, &b)),
        ]
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: &[f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

// ─────────────────────────────────────────────────────────────
// 原子与晶体
// ─────────────────────────────────────────────────────────────

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 晶体结构（三个方向均为周期性边界）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Crystal {
    pub fn new(lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal { lattice, atoms }
    }

    /// 按结构标签和晶格常数生成单元素体相结构
    pub fn bulk(element: Element, structure: CrystalStructure, a: f64) -> Result<Self> {
        if !a.is_finite() || a <= 0.0 {
            return Err(LatscanError::InvalidLatticeConstant { value: a });
        }

        let (lattice, atoms) = match structure {
            CrystalStructure::SimpleCubic => (
                Lattice::cubic(a),
                vec![Atom::new(element.symbol(), [0.0, 0.0, 0.0])],
            ),
        };

        Ok(Crystal::new(lattice, atoms))
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 笛卡尔坐标（分数坐标先折回 [0, 1)）
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|atom| {
                let wrapped = atom.position.map(|x| x - x.floor());
                self.lattice.frac_to_cart(&wrapped)
            })
            .collect()
    }

    /// 计算每原子体积
    pub fn volume_per_atom(&self) -> f64 {
        self.lattice.volume().abs() / self.atoms.len() as f64
    }
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
