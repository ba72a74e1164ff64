//! # energy 子命令实现
//!
//! 对给定晶格常数逐个生成体相结构并计算 EMT 势能。
//!
//! ## 功能
//! - 终端表格或 stdout CSV 输出
//! - 可选每原子能量与体积
//!
//! ## 依赖关系
//! - 使用 `cli/energy.rs` 定义的参数
//! - 使用 `potential/emt.rs`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::energy::EnergyArgs;
use crate::error::{LatscanError, Result};
use crate::models::{Crystal, CrystalStructure, EnergySample};
use crate::potential::Emt;
use crate::utils::output;

use serde::Serialize;
use tabled::{Table, Tabled};

/// 单点计算结果
#[derive(Debug, Clone, Serialize)]
struct EnergyRecord {
    #[serde(rename = "lattice_constant_A")]
    lattice_constant: f64,
    formula: String,
    #[serde(rename = "energy_eV")]
    energy: f64,
    #[serde(rename = "energy_per_atom_eV")]
    energy_per_atom: f64,
    #[serde(rename = "volume_per_atom_A3")]
    volume_per_atom: f64,
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "a (Å)")]
    lattice_constant: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "E (eV)")]
    energy: String,
}

/// 带每原子量的表格行
#[derive(Debug, Clone, Tabled)]
struct EnergyPerAtomRow {
    #[tabled(rename = "a (Å)")]
    lattice_constant: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "E (eV)")]
    energy: String,
    #[tabled(rename = "E/atom (eV)")]
    energy_per_atom: String,
    #[tabled(rename = "V/atom (Å³)")]
    volume_per_atom: String,
}

/// 执行单点能量计算
pub fn execute(args: EnergyArgs) -> Result<()> {
    let structure = CrystalStructure::from(args.structure);
    let records = evaluate_all(&args, structure)?;

    if args.csv {
        return write_csv(&records, args.per_atom);
    }

    output::print_header(&format!(
        "EMT Energies: {} ({})",
        args.element, structure
    ));

    if args.per_atom {
        let rows: Vec<EnergyPerAtomRow> = records
            .iter()
            .map(|r| EnergyPerAtomRow {
                lattice_constant: format!("{:.4}", r.lattice_constant),
                formula: r.formula.clone(),
                energy: format!("{:.6}", r.energy),
                energy_per_atom: format!("{:.6}", r.energy_per_atom),
                volume_per_atom: format!("{:.4}", r.volume_per_atom),
            })
            .collect();
        println!("{}", Table::new(&rows));
    } else {
        let rows: Vec<EnergyRow> = records
            .iter()
            .map(|r| EnergyRow {
                lattice_constant: format!("{:.4}", r.lattice_constant),
                formula: r.formula.clone(),
                energy: format!("{:.6}", r.energy),
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    output::print_done(&format!("Evaluated {} structures", records.len()));
    Ok(())
}

/// 逐个计算，遇到非法晶格常数立即返回错误
fn evaluate_all(args: &EnergyArgs, structure: CrystalStructure) -> Result<Vec<EnergyRecord>> {
    let emt = Emt::new();

    args.lattice_constants
        .iter()
        .map(|&a| -> Result<EnergyRecord> {
            let crystal = Crystal::bulk(args.element, structure, a)?;
            let result = emt.calculate(&crystal)?;
            Ok(EnergyRecord {
                lattice_constant: a,
                formula: crystal.formula(),
                energy: result.energy,
                energy_per_atom: result.energy / result.energies.len() as f64,
                volume_per_atom: crystal.volume_per_atom(),
            })
        })
        .collect()
}

/// 以 CSV 写到 stdout
fn write_csv(records: &[EnergyRecord], per_atom: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());

    for record in records {
        if per_atom {
            wtr.serialize(record)?;
        } else {
            wtr.serialize(EnergySample::new(record.lattice_constant, record.energy))?;
        }
    }

    wtr.flush().map_err(|e| LatscanError::FileWriteError {
        path: "<stdout>".to_string(),
        source: e,
    })?;

    Ok(())
}
