//! # simulate 子命令实现
//!
//! 组合四阶段管线：光源谱 → 入射路径衰减 → 样品发射 → 出射路径衰减
//! → 立体角缩放 → 探测器响应，并写出结果谱。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 SimulateArgs
//! - 使用 `xrf/` 各阶段和 `geometry/` 立体角
//! - 使用 `parsers/` 解析材料与元素
//! - 使用 `utils/output.rs` 终端输出

use crate::cli::simulate::{SimulateArgs, SpectrumFormat};
use crate::error::{Result, XrfSimError};
use crate::geometry;
use crate::models::{GeometryAngles, PathSegment, Spectrum};
use crate::parsers;
use crate::utils::output;
use crate::xrf::{self, TubeSource};

use std::path::Path;

/// 执行 simulate 命令
pub fn execute(args: SimulateArgs) -> Result<()> {
    output::print_header("X-Ray Fluorescence Spectrum Simulation");

    // 边界校验：全部输入在进入核心前解析为值类型
    let anode_z = parsers::parse_element(&args.anode)?;
    let tube_angles = GeometryAngles::new(args.tube_theta_in, args.tube_theta_out)?;
    let sample_angles = GeometryAngles::new(args.theta_in, args.theta_out)?;
    let sample = parsers::parse_material(&args.sample, args.density)?;

    let source = TubeSource::new(anode_z, args.kvp, args.ma, args.exposure, tube_angles)?;
    output::print_info(&format!(
        "Tube: {} anode, {:.1} kVp, {:.2} mA, {:.2} s",
        args.anode, args.kvp, args.ma, args.exposure
    ));
    output::print_info(&format!(
        "Sample: {} ({} elements, {:.3} g/cm3)",
        args.sample,
        sample.n_elements(),
        sample.density()
    ));

    // 阶段 1: 光源谱
    let emitted = source.spectrum(args.de)?;
    output::print_success(&format!(
        "Source spectrum: {} bins up to {:.1} keV",
        emitted.grid().len(),
        emitted.grid().max_energy()
    ));

    // 阶段 2: 入射路径（滤片按给定顺序，再加空气段）
    let incident_path = build_path(&args.filters, args.air_in)?;
    let (beam, _) = xrf::attenuate_path(&emitted, &incident_path);
    if !incident_path.is_empty() {
        output::print_info(&format!(
            "Incident path: {} segment(s), transmitted {:.3e} counts",
            incident_path.len(),
            beam.total()
        ));
    }

    // 阶段 3: 样品发射
    let emission = xrf::emit(&sample, &beam, &sample_angles)?;
    output::print_success(&format!(
        "Emission spectrum: {:.3e} counts/sr",
        emission.total()
    ));

    // 阶段 4: 出射空气路径
    let exit_path = build_path(&[], args.air_out)?;
    let (reaching, _) = xrf::attenuate_path(&emission, &exit_path);

    // 立体角换算为绝对计数
    let omega = solid_angle(&args);
    let scaled = reaching.scaled(omega);
    output::print_info(&format!("Detector solid angle: {:.4e} sr", omega));

    // 阶段 5: 探测器响应
    let detected = if args.no_detector {
        scaled
    } else {
        xrf::detect(&scaled, args.offset_noise, args.gain_noise)
    };

    // 写出
    let format = args.format.unwrap_or_else(|| guess_format(&args.output));
    match format {
        SpectrumFormat::Csv => xrf::export::to_csv(&detected, &args.output)?,
        SpectrumFormat::Spe => xrf::export::to_spe(&detected, &args.output, args.spe_per_line)?,
    }

    print_peak_table(&detected, args.peak_count);
    let (_, peak_kev, peak_counts) = detected.peak_bin();
    output::print_info(&format!(
        "Strongest bin: {:.3} keV ({:.3e} counts)",
        peak_kev, peak_counts
    ));
    output::print_done(&format!(
        "Spectrum ({:.3e} total counts) saved to '{}'",
        detected.total(),
        args.output.display()
    ));

    Ok(())
}

/// 把滤片描述和空气段组合为有序路径
fn build_path(filters: &[String], air_cm: f64) -> Result<Vec<PathSegment>> {
    let mut path = Vec::new();
    for spec in filters {
        path.push(parsers::parse_path_segment(spec)?);
    }
    if air_cm < 0.0 {
        return Err(XrfSimError::InvalidArgument(format!(
            "air path length must be non-negative, got {}",
            air_cm
        )));
    }
    if air_cm > 0.0 {
        let air = parsers::parse_material("air", None)?;
        path.push(PathSegment::new(air, air_cm)?);
    }
    Ok(path)
}

/// 探测器立体角：显式 Ω 优先，其次圆孔/矩形孔几何，否则取 1
fn solid_angle(args: &SimulateArgs) -> f64 {
    if let Some(omega) = args.omega {
        return omega;
    }
    if let (Some(radius), Some(distance)) = (args.detector_radius, args.detector_distance) {
        return geometry::cone_solid_angle(radius, distance);
    }
    if let (Some(a), Some(b), Some(distance)) = (
        args.detector_side_a,
        args.detector_side_b,
        args.detector_distance,
    ) {
        return geometry::pyramid_solid_angle(a, b, distance);
    }
    1.0
}

/// 从文件扩展名推断输出格式
fn guess_format(path: &Path) -> SpectrumFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("spe") => SpectrumFormat::Spe,
        _ => SpectrumFormat::Csv,
    }
}

/// 打印最强峰位表格（局部极大值，按计数降序）
fn print_peak_table(spectrum: &Spectrum, count: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "E (keV)")]
        energy: String,
        #[tabled(rename = "Counts")]
        counts: String,
    }

    let intensities = spectrum.intensities();
    let n = intensities.len();
    let mut maxima: Vec<(usize, f64)> = (1..n - 1)
        .filter(|&i| {
            intensities[i] > intensities[i - 1]
                && intensities[i] >= intensities[i + 1]
                && intensities[i] > 0.0
        })
        .map(|i| (i, intensities[i]))
        .collect();
    maxima.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let rows: Vec<PeakRow> = maxima
        .iter()
        .take(count)
        .map(|&(i, v)| PeakRow {
            energy: format!("{:.3}", spectrum.grid().energy(i)),
            counts: format!("{:.3e}", v),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("Top {} Peaks", rows.len()));
        let table = Table::new(&rows);
        println!("{}", table);
    }
}
