//! # scan 子命令实现
//!
//! 扫描晶格常数、拟合二次曲线、寻找极小值并绘图。
//!
//! ## 功能
//! - 等间距晶格常数上的 EMT 能量扫描（带进度条）
//! - 二次多项式最小二乘拟合与顶点 (l₀, W₀)
//! - 终端表格与拟合摘要
//! - 输出 PNG/SVG 图像并用系统查看器打开
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `analysis/` 进行扫描、拟合和绘图
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/viewer.rs`

use crate::analysis::plot::{self, PlotOptions};
use crate::analysis::{QuadraticFit, Sweep};
use crate::cli::scan::{ImageFormat, ScanArgs};
use crate::error::{LatscanError, Result};
use crate::models::{CrystalStructure, SampleSet};
use crate::potential::{Emt, Potential};
use crate::utils::{output, progress, viewer};

use std::fs;
use tabled::{Table, Tabled};

/// 样本表格行
#[derive(Debug, Clone, Tabled)]
struct SampleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "a (Å)")]
    lattice_constant: String,
    #[tabled(rename = "E (eV)")]
    energy: String,
    #[tabled(rename = "Fit (eV)")]
    fitted: String,
    #[tabled(rename = "Residual (eV)")]
    residual: String,
}

/// 执行扫描
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Lattice Constant Energy Scan");

    let (start, end) = parse_range(&args.range)?;
    let structure = CrystalStructure::from(args.structure);

    let sweep = Sweep::new(start, end, args.points)
        .with_element(args.element)
        .with_structure(structure);
    sweep.validate()?;

    let options = PlotOptions {
        width: args.width,
        height: args.height,
        label_position: (args.label_x, args.label_y),
        use_svg: args.format == ImageFormat::Svg,
    };
    options.validate()?;

    let potential = Emt::new();
    output::print_info(&format!(
        "{} ({}) with {} potential, {} points over {:.3}-{:.3} Å",
        args.element,
        structure,
        potential.name(),
        sweep.points,
        start,
        end
    ));

    // 扫描
    let pb = progress::create_progress_bar(sweep.points as u64, "Evaluating");
    let result = sweep.run(&potential, |_| pb.inc(1));
    pb.finish_and_clear();
    let samples = result?;

    output::print_success(&format!("Evaluated {} samples", samples.len()));

    // 拟合
    let fit = QuadraticFit::fit(&samples)?;
    let minimum = fit.minimum()?;

    if !fit.is_convex() {
        output::print_warning("Fitted parabola opens downward; the reported vertex is a maximum");
    }

    if !args.no_table {
        print_sample_table(&samples, &fit);
    }

    output::print_header("Quadratic Fit  E(l) = a·l² + b·l + c");
    output::print_result("a (eV/Å²)", &format!("{:.6}", fit.a));
    output::print_result("b (eV/Å)", &format!("{:.6}", fit.b));
    output::print_result("c (eV)", &format!("{:.6}", fit.c));
    output::print_result("R²", &format!("{:.6}", fit.r_squared(&samples)));
    if let Some(lowest) = samples.lowest() {
        output::print_result(
            "Lowest sample",
            &format!("{:.3} Å, {:.4} eV", lowest.lattice_constant, lowest.energy),
        );
    }
    output::print_result("l₀ (Å)", &format!("{:.2}", minimum.lattice_constant));
    output::print_result("W₀ (eV)", &format!("{:.3}", minimum.energy));
    println!();

    // 绘图
    fs::create_dir_all(&args.output_dir).map_err(|e| LatscanError::FileWriteError {
        path: args.output_dir.display().to_string(),
        source: e,
    })?;

    let output_path = args
        .output_dir
        .join(plot::output_filename(structure, args.format.extension()));

    plot::generate_energy_plot(&samples, &fit, &minimum, &output_path, &options)?;
    output::print_success(&format!("Plot saved to '{}'", output_path.display()));

    if !args.no_show {
        if let Err(e) = viewer::open_image(&output_path) {
            output::print_warning(&format!("Could not open the plot: {}", e));
        }
    }

    output::print_done("Scan complete");
    Ok(())
}

/// 打印样本表格
fn print_sample_table(samples: &SampleSet, fit: &QuadraticFit) {
    let rows: Vec<SampleRow> = samples
        .iter()
        .zip(fit.fitted(samples))
        .enumerate()
        .map(|(i, (s, fitted))| SampleRow {
            index: i + 1,
            lattice_constant: format!("{:.4}", s.lattice_constant),
            energy: format!("{:.6}", s.energy),
            fitted: format!("{:.6}", fitted),
            residual: format!("{:+.6}", s.energy - fitted),
        })
        .collect();

    output::print_header(&format!(
        "{} Samples: {} ({})",
        rows.len(),
        samples.element,
        samples.structure
    ));
    println!("{}", Table::new(&rows));
}

/// 解析晶格常数范围 (e.g., "1-4", "1e-1-4")
///
/// 只负责拆分文本，区间是否合法由 `Sweep::validate` 检查。
fn parse_range(range: &str) -> Result<(f64, f64)> {
    let invalid = || LatscanError::InvalidRange(range.to_string());

    // 分隔符是第一个不属于指数部分的 '-'
    let (split, _) = range
        .char_indices()
        .skip(1)
        .find(|&(i, c)| {
            c == '-' && !matches!(range[..i].trim_end().chars().last(), Some('e' | 'E'))
        })
        .ok_or_else(invalid)?;

    let min: f64 = range[..split].trim().parse().map_err(|_| invalid())?;
    let max: f64 = range[split + 1..].trim().parse().map_err(|_| invalid())?;

    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1-4").unwrap(), (1.0, 4.0));
        assert_eq!(parse_range("2.5 - 3.75").unwrap(), (2.5, 3.75));
    }

    #[test]
    fn test_parse_range_scientific_notation() {
        assert_eq!(parse_range("1e-1-4").unwrap(), (0.1, 4.0));
        assert_eq!(parse_range("1E-1 - 4e0").unwrap(), (0.1, 4.0));
        assert_eq!(parse_range("2.5e+0-3").unwrap(), (2.5, 3.0));
    }

    #[test]
    fn test_parse_range_rejects_malformed() {
        for bad in ["1", "a-b", "1-2-3", "-1", "1-", ""] {
            assert!(
                matches!(parse_range(bad), Err(LatscanError::InvalidRange(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_bounds_rejected_before_sweep() {
        for bad in ["4-1", "0-3", "3-3"] {
            let args = ScanArgs {
                range: bad.to_string(),
                no_show: true,
                ..ScanArgs::default()
            };
            assert!(
                matches!(execute(args), Err(LatscanError::InvalidRange(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_plot_size_rejected() {
        let args = ScanArgs {
            width: 0,
            no_show: true,
            ..ScanArgs::default()
        };
        assert!(matches!(
            execute(args),
            Err(LatscanError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_scan_writes_single_png() {
        let dir = std::env::temp_dir().join(format!("latscan_scan_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let args = ScanArgs {
            output_dir: dir.clone(),
            no_show: true,
            no_table: true,
            ..ScanArgs::default()
        };
        execute(args).unwrap();

        let entries: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], "energy_lattice_parameter_sc.png");

        let bytes = fs::read(dir.join("energy_lattice_parameter_sc.png")).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]));

        fs::remove_dir_all(&dir).unwrap();
    }
}
