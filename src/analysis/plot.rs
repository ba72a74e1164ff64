//! # 能量-晶格常数图表生成
//!
//! 使用 `plotters` 库绘制扫描结果。
//!
//! ## 功能
//! - 原始样本以黑色叉号标出
//! - 二次拟合曲线为橙色虚线
//! - 在固定数据坐标处标注 (l₀, W₀)
//! - 无边框图例
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs` 调用
//! - 使用 `analysis/fit.rs` 的 QuadraticFit, MinimumPoint
//! - 使用 `plotters` 渲染图表

use crate::analysis::fit::{MinimumPoint, QuadraticFit};
use crate::error::{LatscanError, Result};
use crate::models::{CrystalStructure, SampleSet};

use plotters::prelude::*;
use std::path::Path;

/// 默认标注位置（数据坐标）
pub const DEFAULT_LABEL_POSITION: (f64, f64) = (1.45, 47.0);

/// 拟合曲线的采样点数
const CURVE_POINTS: usize = 200;

/// 图表设置
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// 宽度（PNG 为像素，SVG 为点）
    pub width: u32,
    /// 高度
    pub height: u32,
    /// (l₀, W₀) 标注位置（数据坐标）
    pub label_position: (f64, f64),
    /// 输出 SVG
    pub use_svg: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            width: 600,
            height: 600,
            label_position: DEFAULT_LABEL_POSITION,
            use_svg: false,
        }
    }
}

impl PlotOptions {
    /// 检查图像尺寸
    ///
    /// 后端在绘制前就会截断目标文件，尺寸必须先于任何绘制检查。
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LatscanError::InvalidArgument(format!(
                "plot size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// 输出文件名，例如 `energy_lattice_parameter_sc.png`
pub fn output_filename(structure: CrystalStructure, extension: &str) -> String {
    format!("energy_lattice_parameter_{}.{}", structure.tag(), extension)
}

/// 极小值标注文本
pub fn annotation_text(minimum: &MinimumPoint) -> String {
    format!(
        "(l₀, W₀) = ({:.2} Å, {:.3} eV)",
        minimum.lattice_constant, minimum.energy
    )
}

/// 生成能量-晶格常数图
pub fn generate_energy_plot(
    samples: &SampleSet,
    fit: &QuadraticFit,
    minimum: &MinimumPoint,
    output_path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    options.validate()?;

    let size = (options.width, options.height);
    if options.use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_energy_chart(&root, samples, fit, minimum, options.label_position)?;
        root.present()
            .map_err(|e| LatscanError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_energy_chart(&root, samples, fit, minimum, options.label_position)?;
        root.present()
            .map_err(|e| LatscanError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 坐标范围：覆盖样本、拟合曲线与标注位置，两侧各留 5% 余量
fn axis_ranges(
    samples: &SampleSet,
    curve: &[(f64, f64)],
    label_position: (f64, f64),
) -> ((f64, f64), (f64, f64)) {
    let xs = samples.iter().map(|s| s.lattice_constant);
    let ys = samples
        .iter()
        .map(|s| s.energy)
        .chain(curve.iter().map(|(_, y)| *y))
        .chain(std::iter::once(label_position.1));

    let (x_min, x_max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });

    let x_margin = ((x_max - x_min) * 0.05).max(1e-3);
    let y_margin = ((y_max - y_min) * 0.05).max(1e-3);

    (
        (x_min - x_margin, x_max + x_margin),
        (y_min - y_margin, y_max + y_margin),
    )
}

/// 绘制图表的核心逻辑
fn draw_energy_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    samples: &SampleSet,
    fit: &QuadraticFit,
    minimum: &MinimumPoint,
    label_position: (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if samples.is_empty() {
        return Err(LatscanError::PlotError("No samples to plot".to_string()));
    }

    root.fill(&WHITE)
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?;

    let ls = samples.lattice_constants();
    let (l_first, l_last) = (ls[0], ls[ls.len() - 1]);
    let curve: Vec<(f64, f64)> = crate::analysis::sweep::linspace(l_first, l_last, CURVE_POINTS)
        .into_iter()
        .map(|l| (l, fit.evaluate(l)))
        .collect();

    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(samples, &curve, label_position);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Lattice Constant (Å)")
        .y_desc("Potential Energy (eV)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?;

    // 原始样本
    chart
        .draw_series(
            samples
                .iter()
                .map(|s| Cross::new((s.lattice_constant, s.energy), 5, BLACK.stroke_width(2))),
        )
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?
        .label("Energies")
        .legend(|(x, y)| Cross::new((x + 10, y), 5, BLACK.stroke_width(2)));

    // 拟合曲线
    let fit_color = RGBColor(255, 165, 0);
    chart
        .draw_series(DashedLineSeries::new(
            curve,
            8,
            5,
            fit_color.stroke_width(2),
        ))
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?
        .label("2nd order polynomial fit")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fit_color.stroke_width(2)));

    // 极小值标注
    chart
        .draw_series(std::iter::once(Text::new(
            annotation_text(minimum),
            label_position,
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&TRANSPARENT)
        .border_style(&TRANSPARENT)
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| LatscanError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, EnergySample};

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename(CrystalStructure::SimpleCubic, "png"),
            "energy_lattice_parameter_sc.png"
        );
        assert_eq!(
            output_filename(CrystalStructure::SimpleCubic, "svg"),
            "energy_lattice_parameter_sc.svg"
        );
    }

    #[test]
    fn test_annotation_text_precision() {
        let minimum = MinimumPoint {
            lattice_constant: 2.950789,
            energy: -4.8306196,
        };
        assert_eq!(annotation_text(&minimum), "(l₀, W₀) = (2.95 Å, -4.831 eV)");
    }

    #[test]
    fn test_axis_ranges_cover_label() {
        let samples = SampleSet::new(
            Element::Cu,
            CrystalStructure::SimpleCubic,
            vec![EnergySample::new(1.0, 10.0), EnergySample::new(4.0, 2.0)],
        );
        let curve = vec![(1.0, 9.0), (4.0, -1.0)];
        let ((x_lo, x_hi), (y_lo, y_hi)) = axis_ranges(&samples, &curve, (1.45, 47.0));

        assert!(x_lo < 1.0 && x_hi > 4.0);
        assert!(y_lo < -1.0);
        assert!(y_hi > 47.0);
    }

    #[test]
    fn test_zero_size_leaves_existing_file_untouched() {
        let samples = SampleSet::new(
            Element::Cu,
            CrystalStructure::SimpleCubic,
            vec![
                EnergySample::new(1.0, 3.0),
                EnergySample::new(2.0, 1.0),
                EnergySample::new(3.0, 3.0),
            ],
        );
        let fit = QuadraticFit::new(2.0, -8.0, 9.0);
        let minimum = fit.minimum().unwrap();

        let path = std::env::temp_dir().join(format!(
            "latscan_zero_size_{}.png",
            std::process::id()
        ));
        std::fs::write(&path, b"existing plot").unwrap();

        for (width, height) in [(0, 600), (600, 0)] {
            let options = PlotOptions {
                width,
                height,
                ..PlotOptions::default()
            };
            let result = generate_energy_plot(&samples, &fit, &minimum, &path, &options);
            assert!(matches!(result, Err(LatscanError::InvalidArgument(_))));
        }

        assert_eq!(std::fs::read(&path).unwrap(), b"existing plot");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_options() {
        let options = PlotOptions::default();
        assert_eq!(options.width, options.height);
        assert_eq!(options.label_position, (1.45, 47.0));
        assert!(!options.use_svg);
        assert!(options.validate().is_ok());
    }
}
